//! Cosmetic progress simulation.
//!
//! The conversion endpoint reports no upload progress, so the bar is driven
//! by a timer: `step` percent every `interval`, clamped at `cap`. The ticker
//! runs as its own task and is coordinated with the network call through a
//! [`CancellationToken`]: the controller cancels it the moment the call
//! settles and joins it before writing the final value, so every progress
//! event the observer sees from the ticker precedes the 100.

use crate::progress::ObserverHandle;
use crate::state::{self, IntakeState};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Settings for one ticker run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TickerSettings {
    pub interval: Duration,
    pub step: u8,
    pub cap: u8,
}

/// A running ticker. Dropping it cancels the task without waiting.
pub(crate) struct ProgressTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Start ticking `state.progress` on the current runtime.
    pub(crate) fn spawn(
        state: Arc<Mutex<IntakeState>>,
        observer: ObserverHandle,
        settings: TickerSettings,
    ) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(state, observer, settings, token.clone()));
        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Cancel and wait for the task to exit.
    pub(crate) async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("progress ticker ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run(
    state: Arc<Mutex<IntakeState>>,
    observer: ObserverHandle,
    settings: TickerSettings,
    token: CancellationToken,
) {
    let mut ticks = interval_at(Instant::now() + settings.interval, settings.interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticks.tick() => {
                let next = {
                    let mut s = state::lock(&state);
                    // Checked under the lock: once the controller has
                    // cancelled, no further write may land.
                    if token.is_cancelled() {
                        break;
                    }
                    s.advance_progress(settings.step, settings.cap)
                };
                match next {
                    Some(p) => {
                        observer.on_progress(p);
                        if p >= settings.cap {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}
