//! Foreground ticker background task

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::state::AppState;

/// Period between foreground ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owned handle to the recurring one-second timer.
///
/// Dropping the handle aborts the task, so a ticker can never outlive the
/// slot that owns it.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn the ticker; the first tick lands one full period from now
    pub fn spawn(state: Weak<AppState>, period: Duration) -> Self {
        let handle = tokio::spawn(ticker_task(state, period));
        Self { handle }
    }

    /// Stop the ticker
    pub fn cancel(self) {
        debug!("Cancelling foreground ticker");
        // Drop aborts
    }

    /// Whether the task already exited on its own
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Tick the tracker once per period until it stops accepting ticks
async fn ticker_task(state: Weak<AppState>, period: Duration) {
    info!("Starting foreground ticker");

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(state) = state.upgrade() else {
            debug!("Tracker dropped, ticker exiting");
            break;
        };

        if !state.tick() {
            debug!("Tracker no longer ticking, ticker exiting");
            break;
        }
    }
}
