//! Operator-facing notices: ignored commands, status, and moment toasts.

use serde::Serialize;
use shared::protocol::{IgnoredReason, SimulationEvent, SimulationSnapshot};

use crate::config::OutputFormat;

pub fn ignored_notice(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::AlreadyRunning => "simulation is already running",
        IgnoredReason::NotRunning => "a moment needs a running simulation",
        IgnoredReason::Stopped => "simulation is stopped; use /start",
        IgnoredReason::MomentActive => {
            "controls are locked until the moment ends (/stop still works)"
        }
        IgnoredReason::EmptyMessage => "nothing to send",
    }
}

pub fn status_line(snapshot: &SimulationSnapshot) -> String {
    let mut line = format!("mode: {}, rate: {}", snapshot.mode, snapshot.rate);
    if let Some(moment) = snapshot.moment {
        line.push_str(&format!(
            ", moment: {} mps for another {} ms",
            moment.spike_rate, moment.remaining_ms
        ));
    }
    line
}

#[derive(Serialize)]
struct EventRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    event: &'a SimulationEvent,
}

/// Line announcing a simulation event, or `None` when the event is not shown.
pub fn event_line(format: OutputFormat, event: &SimulationEvent) -> Option<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(&EventRecord {
            kind: "event",
            event,
        })
        .ok(),
        OutputFormat::Terminal => match event {
            SimulationEvent::MomentStarted { spike_rate, .. } => Some(format!(
                "⭐⭐⭐ Big moment! Message rate spiked to {spike_rate} mps ⭐⭐⭐"
            )),
            SimulationEvent::MomentEnded { restored: true } => {
                Some("moment over, back to the usual pace".to_string())
            }
            SimulationEvent::ModeChanged { mode } => Some(format!("simulation {mode}")),
            SimulationEvent::RateChanged { rate } => Some(format!("message rate: {rate}")),
            SimulationEvent::MomentEnded { restored: false } | SimulationEvent::Cleared => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        domain::{RateSetting, SimulationMode},
        protocol::MomentSnapshot,
    };

    #[test]
    fn status_line_mentions_active_moment() {
        let snapshot = SimulationSnapshot {
            mode: SimulationMode::Running,
            rate: RateSetting::clamped(12),
            effective_rate: Some(60),
            moment: Some(MomentSnapshot {
                base_rate: RateSetting::clamped(12),
                spike_rate: 60,
                remaining_ms: 1200,
            }),
        };
        assert_eq!(
            status_line(&snapshot),
            "mode: running, rate: 12 mps, moment: 60 mps for another 1200 ms"
        );
    }

    #[test]
    fn terminal_toast_announces_the_spike() {
        let line = event_line(
            OutputFormat::Terminal,
            &SimulationEvent::MomentStarted {
                base_rate: RateSetting::clamped(20),
                spike_rate: 100,
            },
        )
        .expect("toast");
        assert!(line.contains("spiked to 100 mps"));
        assert_eq!(event_line(OutputFormat::Terminal, &SimulationEvent::Cleared), None);
    }

    #[test]
    fn json_events_are_wrapped_records() {
        let line = event_line(
            OutputFormat::Json,
            &SimulationEvent::MomentEnded { restored: true },
        )
        .expect("record");
        let value: serde_json::Value = serde_json::from_str(&line).expect("json");
        assert_eq!(value["type"], "event");
        assert_eq!(value["event"]["type"], "moment_ended");
        assert_eq!(value["event"]["payload"]["restored"], true);
    }
}
