use serde::{Deserialize, Serialize};

use crate::domain::{RateSetting, SimulationMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControlCommand {
    Start,
    PauseOrResume,
    Stop,
    SetRate { rate: i64 },
    CreateMoment,
    SendUserMessage { text: String },
}

impl ControlCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::Start => "start",
            ControlCommand::PauseOrResume => "pause_or_resume",
            ControlCommand::Stop => "stop",
            ControlCommand::SetRate { .. } => "set_rate",
            ControlCommand::CreateMoment => "create_moment",
            ControlCommand::SendUserMessage { .. } => "send_user_message",
        }
    }
}

/// Why a command left the controller untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    AlreadyRunning,
    NotRunning,
    Stopped,
    MomentActive,
    EmptyMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Ignored(IgnoredReason),
}

impl CommandOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentSnapshot {
    pub base_rate: RateSetting,
    pub spike_rate: u32,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub mode: SimulationMode,
    pub rate: RateSetting,
    /// Rate the emission timer is currently armed at, if any.
    pub effective_rate: Option<u32>,
    pub moment: Option<MomentSnapshot>,
}

impl SimulationSnapshot {
    /// Whether the operator controls other than stop are locked.
    pub fn controls_locked(&self) -> bool {
        self.moment.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SimulationEvent {
    ModeChanged { mode: SimulationMode },
    RateChanged { rate: RateSetting },
    MomentStarted { base_rate: RateSetting, spike_rate: u32 },
    MomentEnded { restored: bool },
    Cleared,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
