use super::*;
use shared::domain::MessageOrigin;

fn message(label: &str, text: &str, origin: MessageOrigin) -> ChatMessage {
    ChatMessage {
        label: label.to_string(),
        text: text.to_string(),
        color: ColorHint::new("#1e90ff"),
        origin,
        sent_at: Utc::now(),
    }
}

#[test]
fn terminal_renderer_prints_label_and_text_per_line() {
    colored::control::set_override(false);
    let renderer = TerminalRenderer::new(Vec::new());

    renderer.display(&message("PixelPanda7", "GG", MessageOrigin::Simulated));
    renderer.display(&message("You", "thanks chat", MessageOrigin::Operator));

    let output = String::from_utf8(renderer.into_inner()).expect("utf8");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("PixelPanda7: GG"), "{:?}", lines[0]);
    assert!(lines[1].ends_with("You: thanks chat"), "{:?}", lines[1]);
}

#[test]
fn terminal_renderer_clear_wipes_the_screen() {
    let renderer = TerminalRenderer::new(Vec::new());
    renderer.clear();
    assert_eq!(renderer.into_inner(), CLEAR_SCREEN.as_bytes());
}

#[test]
fn labels_without_a_valid_color_still_render() {
    colored::control::set_override(false);
    assert_eq!(colored_label("bot", &ColorHint::new("teal")), "bot");
}

#[test]
fn json_renderer_emits_one_record_per_call() {
    let renderer = JsonLinesRenderer::new(Vec::new());

    renderer.display(&message("You", "hello", MessageOrigin::Operator));
    renderer.clear();

    let output = String::from_utf8(renderer.into_inner()).expect("utf8");
    let records: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["type"], "display");
    assert_eq!(records[0]["label"], "You");
    assert_eq!(records[0]["text"], "hello");
    assert_eq!(records[0]["color"], "#1e90ff");
    assert_eq!(records[0]["user"], true);
    assert!(records[0]["sent_at"].is_string());

    assert_eq!(records[1]["type"], "clear");
}
