use std::time::Duration;

use thiserror::Error;
use tokio::time::{MissedTickBehavior, interval};

pub const DEFAULT_COUNTDOWN_SECS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("every record is already visible")]
    NothingToUnlock,
    #[error("a gate is already open")]
    AlreadyOpen,
    #[error("no gate is open")]
    NotOpen,
    #[error("gate countdown still running ({remaining_secs}s left)")]
    CountdownRunning { remaining_secs: u32 },
}

/// Countdown shown while a gate is open. The tier may only advance once it hits zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateCountdown {
    remaining_secs: u32,
}

impl GateCountdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining_secs: duration_secs,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn tick(&mut self) -> u32 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    pub fn may_advance(&self) -> bool {
        self.remaining_secs == 0
    }
}

impl Default for GateCountdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

/// Ticks `countdown` once per `period` until it elapses. `on_tick` sees every new value.
pub async fn drive<F>(countdown: &mut GateCountdown, period: Duration, mut on_tick: F)
where
    F: FnMut(u32),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick of a tokio interval completes immediately
    ticker.tick().await;

    while !countdown.may_advance() {
        ticker.tick().await;
        let remaining = countdown.tick();
        tracing::trace!(target: "access.gate", remaining_secs = remaining, "gate_countdown_tick");
        on_tick(remaining);
    }
}
