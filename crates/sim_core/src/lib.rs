//! Chat-room simulation core: the rate controller, its timers, and the runtime task driving it.

use shared::domain::{ChatMessage, ColorHint};

mod controller;
mod runtime;
pub mod source;
mod timer;

pub use controller::{
    ControllerOptions, SimulationController, TimerEvent, MOMENT_DURATION, MOMENT_MULTIPLIER,
};
pub use runtime::{spawn_simulation, SimulationHandle, SimulationRuntime};
pub use source::RandomMessageSource;

/// One synthetic chat line before it is labelled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage {
    pub user_name: String,
    pub text: String,
    pub color: ColorHint,
}

/// Produces synthetic chat lines on demand.
pub trait MessageSource: Send {
    fn next(&mut self) -> GeneratedMessage;
}

/// Display sink for chat lines. Calls are fire-and-forget.
pub trait Renderer: Send + Sync {
    /// Appends a message and keeps the newest line in view.
    fn display(&self, message: &ChatMessage);
    /// Removes everything displayed so far.
    fn clear(&self);
}
