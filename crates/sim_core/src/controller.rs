use std::{sync::Arc, time::Duration};

use chrono::Utc;
use shared::{
    domain::{ChatMessage, ColorHint, MessageOrigin, RateSetting, SimulationMode},
    protocol::{
        CommandOutcome, ControlCommand, IgnoredReason, MomentSnapshot, SimulationEvent,
        SimulationSnapshot,
    },
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    timer::{EmissionTimer, MomentState},
    MessageSource, Renderer,
};

pub const MOMENT_MULTIPLIER: u32 = 5;
pub const MOMENT_DURATION: Duration = Duration::from_millis(2000);

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub initial_rate: RateSetting,
    pub operator_label: String,
    pub operator_color: ColorHint,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            initial_rate: RateSetting::default(),
            operator_label: "You".to_string(),
            operator_color: ColorHint::new("#ff4500"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    MomentDeadline,
}

/// Owns the simulation mode, the emission timer slot and the optional moment.
///
/// Every path that arms a timer goes through the single `emission` slot, so
/// a reschedule always drops the previous schedule before the next one
/// exists. Dropping the controller releases both timers.
pub struct SimulationController {
    mode: SimulationMode,
    rate: RateSetting,
    emission: Option<EmissionTimer>,
    moment: Option<MomentState>,
    source: Box<dyn MessageSource>,
    renderer: Arc<dyn Renderer>,
    options: ControllerOptions,
    events: broadcast::Sender<SimulationEvent>,
}

impl SimulationController {
    pub fn new(
        source: Box<dyn MessageSource>,
        renderer: Arc<dyn Renderer>,
        options: ControllerOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            mode: SimulationMode::Stopped,
            rate: options.initial_rate,
            emission: None,
            moment: None,
            source,
            renderer,
            options,
            events,
        }
    }

    pub fn mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn rate(&self) -> RateSetting {
        self.rate
    }

    pub fn moment_active(&self) -> bool {
        self.moment.is_some()
    }

    pub fn has_emission_timer(&self) -> bool {
        self.emission.is_some()
    }

    /// Period of the armed emission timer, if any.
    pub fn emission_period(&self) -> Option<Duration> {
        self.emission.as_ref().map(EmissionTimer::period)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SimulationEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<SimulationEvent> {
        self.events.clone()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            mode: self.mode,
            rate: self.rate,
            effective_rate: self.emission.as_ref().map(EmissionTimer::rate),
            moment: self.moment.as_ref().map(|moment| MomentSnapshot {
                base_rate: moment.base_rate(),
                spike_rate: moment.spike_rate(),
                remaining_ms: moment.remaining().as_millis() as u64,
            }),
        }
    }

    pub fn apply(&mut self, command: ControlCommand) -> CommandOutcome {
        match command {
            ControlCommand::Start => self.start(),
            ControlCommand::PauseOrResume => self.pause_or_resume(),
            ControlCommand::Stop => self.stop(),
            ControlCommand::SetRate { rate } => self.set_rate(rate),
            ControlCommand::CreateMoment => self.create_moment(),
            ControlCommand::SendUserMessage { text } => self.send_user_message(&text),
        }
    }

    pub fn start(&mut self) -> CommandOutcome {
        if self.moment.is_some() {
            return ignored("start", IgnoredReason::MomentActive);
        }
        match self.mode {
            SimulationMode::Running => ignored("start", IgnoredReason::AlreadyRunning),
            SimulationMode::Stopped | SimulationMode::Paused => {
                self.arm_emission(self.rate.get());
                self.set_mode(SimulationMode::Running);
                CommandOutcome::Applied
            }
        }
    }

    pub fn pause_or_resume(&mut self) -> CommandOutcome {
        if self.moment.is_some() {
            return ignored("pause_or_resume", IgnoredReason::MomentActive);
        }
        match self.mode {
            SimulationMode::Running => {
                self.cancel_emission();
                self.set_mode(SimulationMode::Paused);
                CommandOutcome::Applied
            }
            SimulationMode::Paused => self.start(),
            SimulationMode::Stopped => ignored("pause_or_resume", IgnoredReason::Stopped),
        }
    }

    /// Honored from every mode, including mid-moment; the moment's restoration is discarded.
    pub fn stop(&mut self) -> CommandOutcome {
        self.release_timers();
        self.set_mode(SimulationMode::Stopped);
        self.renderer.clear();
        let _ = self.events.send(SimulationEvent::Cleared);
        CommandOutcome::Applied
    }

    pub fn set_rate(&mut self, requested: i64) -> CommandOutcome {
        if self.moment.is_some() {
            return ignored("set_rate", IgnoredReason::MomentActive);
        }
        let rate = RateSetting::clamped(requested);
        if rate != self.rate {
            debug!(requested, rate = rate.get(), "message rate updated");
            self.rate = rate;
            let _ = self.events.send(SimulationEvent::RateChanged { rate });
        }
        if self.mode == SimulationMode::Running {
            self.arm_emission(rate.get());
        }
        CommandOutcome::Applied
    }

    pub fn create_moment(&mut self) -> CommandOutcome {
        if self.moment.is_some() {
            return ignored("create_moment", IgnoredReason::MomentActive);
        }
        if self.mode != SimulationMode::Running {
            return ignored("create_moment", IgnoredReason::NotRunning);
        }

        let base_rate = self.rate;
        let spike_rate = base_rate.get() * MOMENT_MULTIPLIER;
        self.arm_emission(spike_rate);
        self.moment = Some(MomentState::arm(base_rate, spike_rate, MOMENT_DURATION));

        info!(
            base_rate = base_rate.get(),
            spike_rate,
            duration_ms = MOMENT_DURATION.as_millis() as u64,
            "moment started"
        );
        let _ = self.events.send(SimulationEvent::MomentStarted {
            base_rate,
            spike_rate,
        });
        CommandOutcome::Applied
    }

    pub fn send_user_message(&mut self, text: &str) -> CommandOutcome {
        if self.moment.is_some() {
            return ignored("send_user_message", IgnoredReason::MomentActive);
        }
        let text = text.trim();
        if text.is_empty() {
            return ignored("send_user_message", IgnoredReason::EmptyMessage);
        }

        let message = ChatMessage {
            label: self.options.operator_label.clone(),
            text: text.to_string(),
            color: self.options.operator_color.clone(),
            origin: MessageOrigin::Operator,
            sent_at: Utc::now(),
        };
        self.renderer.display(&message);
        CommandOutcome::Applied
    }

    pub fn on_tick(&mut self) {
        let generated = self.source.next();
        let message = ChatMessage {
            label: generated.user_name,
            text: generated.text,
            color: generated.color,
            origin: MessageOrigin::Simulated,
            sent_at: Utc::now(),
        };
        self.renderer.display(&message);
    }

    /// Ends the active moment, restoring the base rate only if still running.
    pub fn on_moment_deadline(&mut self) {
        let Some(moment) = self.moment.take() else {
            return;
        };

        let restored = self.mode == SimulationMode::Running;
        if restored {
            self.arm_emission(moment.base_rate().get());
        } else {
            self.cancel_emission();
        }

        info!(
            base_rate = moment.base_rate().get(),
            restored, "moment ended"
        );
        let _ = self.events.send(SimulationEvent::MomentEnded { restored });
    }

    /// Resolves when the next timer fires. Pending forever while no timer is armed.
    ///
    /// Cancel-safe: dropping the future leaves both timers armed.
    pub async fn next_timer_event(&mut self) -> TimerEvent {
        let emission = &mut self.emission;
        let moment = &mut self.moment;
        tokio::select! {
            biased;
            () = moment_elapsed(moment) => TimerEvent::MomentDeadline,
            () = emission_tick(emission) => TimerEvent::Tick,
        }
    }

    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick => self.on_tick(),
            TimerEvent::MomentDeadline => self.on_moment_deadline(),
        }
    }

    /// Drops both timers and settles in `Stopped` without touching the renderer.
    pub(crate) fn release(&mut self) {
        self.release_timers();
        self.set_mode(SimulationMode::Stopped);
    }

    fn release_timers(&mut self) {
        self.cancel_emission();
        if let Some(moment) = self.moment.take() {
            info!(
                base_rate = moment.base_rate().get(),
                "moment discarded before its deadline"
            );
            let _ = self
                .events
                .send(SimulationEvent::MomentEnded { restored: false });
        }
    }

    fn arm_emission(&mut self, rate: u32) {
        self.cancel_emission();
        let timer = EmissionTimer::arm(rate);
        debug!(rate, period_us = timer.period().as_micros() as u64, "emission timer armed");
        self.emission = Some(timer);
    }

    fn cancel_emission(&mut self) {
        if let Some(timer) = self.emission.take() {
            debug!(rate = timer.rate(), "emission timer cancelled");
        }
    }

    fn set_mode(&mut self, mode: SimulationMode) {
        if self.mode == mode {
            return;
        }
        info!(from = %self.mode, to = %mode, "simulation mode changed");
        self.mode = mode;
        let _ = self.events.send(SimulationEvent::ModeChanged { mode });
    }
}

fn ignored(command: &'static str, reason: IgnoredReason) -> CommandOutcome {
    debug!(command, ?reason, "command ignored");
    CommandOutcome::Ignored(reason)
}

async fn emission_tick(emission: &mut Option<EmissionTimer>) {
    match emission {
        Some(timer) => timer.tick().await,
        None => std::future::pending().await,
    }
}

async fn moment_elapsed(moment: &mut Option<MomentState>) {
    match moment {
        Some(moment) => moment.elapsed().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
