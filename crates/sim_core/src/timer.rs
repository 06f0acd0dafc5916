use std::{pin::Pin, time::Duration};

use shared::domain::{emission_period, RateSetting};
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};

/// Periodic emission schedule. Dropping it cancels every future tick.
pub(crate) struct EmissionTimer {
    interval: Interval,
    rate: u32,
}

impl EmissionTimer {
    /// First tick lands one full period after arming.
    pub(crate) fn arm(rate: u32) -> Self {
        let period = emission_period(rate);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, rate }
    }

    pub(crate) async fn tick(&mut self) {
        self.interval.tick().await;
    }

    pub(crate) fn rate(&self) -> u32 {
        self.rate
    }

    pub(crate) fn period(&self) -> Duration {
        self.interval.period()
    }
}

/// An armed moment: the spike currently in effect and the one-shot deadline ending it.
pub(crate) struct MomentState {
    base_rate: RateSetting,
    spike_rate: u32,
    deadline_at: Instant,
    deadline: Pin<Box<Sleep>>,
}

impl MomentState {
    pub(crate) fn arm(base_rate: RateSetting, spike_rate: u32, duration: Duration) -> Self {
        let deadline_at = Instant::now() + duration;
        Self {
            base_rate,
            spike_rate,
            deadline_at,
            deadline: Box::pin(time::sleep_until(deadline_at)),
        }
    }

    pub(crate) fn base_rate(&self) -> RateSetting {
        self.base_rate
    }

    pub(crate) fn spike_rate(&self) -> u32 {
        self.spike_rate
    }

    pub(crate) fn remaining(&self) -> Duration {
        self.deadline_at.saturating_duration_since(Instant::now())
    }

    pub(crate) async fn elapsed(&mut self) {
        self.deadline.as_mut().await;
    }
}
