use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationMode::Stopped => "stopped",
            SimulationMode::Running => "running",
            SimulationMode::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Operator-facing message rate in messages per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateSetting(u32);

impl RateSetting {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 200;

    /// Clamps any requested value into `[MIN, MAX]`.
    pub fn clamped(requested: i64) -> Self {
        let clamped = requested.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(clamped as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn emission_period(self) -> Duration {
        emission_period(self.0)
    }
}

impl Default for RateSetting {
    fn default() -> Self {
        Self(10)
    }
}

impl fmt::Display for RateSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mps", self.0)
    }
}

/// Period between two emissions at `messages_per_second`, i.e. `1000 / rate` ms.
///
/// Spike rates exceed [`RateSetting::MAX`], so this takes a raw rate. A zero
/// rate is treated as one message per second.
pub fn emission_period(messages_per_second: u32) -> Duration {
    let rate = u64::from(messages_per_second.max(1));
    Duration::from_micros(1_000_000 / rate)
}

/// Hex color hint for a message label, e.g. `#ff4500`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorHint(pub String);

impl ColorHint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses `#rrggbb` (leading `#` optional) into its components.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageOrigin {
    Simulated,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub label: String,
    pub text: String,
    pub color: ColorHint,
    pub origin: MessageOrigin,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn is_user_originated(&self) -> bool {
        self.origin == MessageOrigin::Operator
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
