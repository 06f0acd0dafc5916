//! Stdout renderers: coloured terminal lines or JSON records for overlay tooling.

use std::{
    io::Write,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;
use shared::domain::{ChatMessage, ColorHint};
use sim_core::Renderer;
use tracing::warn;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, text: &str) {
        let mut out = lock(&self.out);
        if let Err(error) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(%error, "terminal renderer write failed");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn display(&self, message: &ChatMessage) {
        let time = message.sent_at.with_timezone(&Local).format("%H:%M:%S");
        let label = colored_label(&message.label, &message.color);
        let text = if message.is_user_originated() {
            message.text.bold().to_string()
        } else {
            message.text.clone()
        };
        self.write(&format!("{} {label}: {text}\n", format!("[{time}]").dimmed()));
    }

    fn clear(&self) {
        self.write(CLEAR_SCREEN);
    }
}

fn colored_label(label: &str, color: &ColorHint) -> String {
    match color.rgb() {
        Some((r, g, b)) => label.truecolor(r, g, b).bold().to_string(),
        None => label.bold().to_string(),
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RenderRecord<'a> {
    Display {
        label: &'a str,
        text: &'a str,
        color: &'a ColorHint,
        user: bool,
        sent_at: DateTime<Utc>,
    },
    Clear {
        at: DateTime<Utc>,
    },
}

/// One JSON object per line.
pub struct JsonLinesRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, record: &RenderRecord<'_>) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "failed to encode render record");
                return;
            }
        };
        let mut out = lock(&self.out);
        if let Err(error) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(%error, "json renderer write failed");
        }
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn display(&self, message: &ChatMessage) {
        self.emit(&RenderRecord::Display {
            label: &message.label,
            text: &message.text,
            color: &message.color,
            user: message.is_user_originated(),
            sent_at: message.sent_at,
        });
    }

    fn clear(&self) {
        self.emit(&RenderRecord::Clear { at: Utc::now() });
    }
}

fn lock<W>(out: &Mutex<W>) -> MutexGuard<'_, W> {
    out.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
