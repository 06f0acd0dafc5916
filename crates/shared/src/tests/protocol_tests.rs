use super::*;

#[test]
fn control_command_uses_tagged_wire_shape() {
    let json = serde_json::to_value(ControlCommand::SetRate { rate: 42 }).expect("json");
    assert_eq!(
        json,
        serde_json::json!({ "type": "set_rate", "payload": { "rate": 42 } })
    );

    let parsed: ControlCommand =
        serde_json::from_value(serde_json::json!({ "type": "create_moment" })).expect("parse");
    assert_eq!(parsed, ControlCommand::CreateMoment);
}

#[test]
fn ignored_outcome_carries_reason() {
    let outcome = CommandOutcome::Ignored(IgnoredReason::MomentActive);
    assert!(!outcome.is_applied());
    let json = serde_json::to_value(outcome).expect("json");
    assert_eq!(
        json,
        serde_json::json!({ "status": "ignored", "reason": "moment_active" })
    );
}

#[test]
fn snapshot_reports_locked_controls_during_moment() {
    let mut snapshot = SimulationSnapshot {
        mode: SimulationMode::Running,
        rate: RateSetting::clamped(10),
        effective_rate: Some(50),
        moment: Some(MomentSnapshot {
            base_rate: RateSetting::clamped(10),
            spike_rate: 50,
            remaining_ms: 1500,
        }),
    };
    assert!(snapshot.controls_locked());
    snapshot.moment = None;
    assert!(!snapshot.controls_locked());
}
