//! Host lifecycle background task
//!
//! A session manager reports suspension with SIGUSR1 and resumption with
//! SIGUSR2.

use std::sync::Arc;
use futures::stream::StreamExt;
use signal_hook::consts::{SIGUSR1, SIGUSR2};
use signal_hook_tokio::Signals;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Lifecycle event carried by a host signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Background,
    Foreground,
}

impl LifecycleEvent {
    pub fn from_signal(signal: i32) -> Option<Self> {
        match signal {
            SIGUSR1 => Some(LifecycleEvent::Background),
            SIGUSR2 => Some(LifecycleEvent::Foreground),
            _ => None,
        }
    }

    /// Deliver the event to the tracker
    pub fn apply(self, state: &AppState) {
        match self {
            LifecycleEvent::Background => {
                state.on_background();
            }
            LifecycleEvent::Foreground => {
                state.on_foreground();
            }
        }
    }
}

/// Background task that forwards lifecycle signals to the tracker
pub async fn lifecycle_task(state: Arc<AppState>) {
    info!("Starting lifecycle signal task");

    let mut signals = match Signals::new([SIGUSR1, SIGUSR2]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to register lifecycle signals: {}", e);
            return;
        }
    };

    while let Some(signal) = signals.next().await {
        match LifecycleEvent::from_signal(signal) {
            Some(event) => {
                info!("Received lifecycle signal {}: {:?}", signal, event);
                event.apply(&state);
            }
            None => warn!("Ignoring unexpected signal: {}", signal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    #[test]
    fn maps_user_signals() {
        assert_eq!(LifecycleEvent::from_signal(SIGUSR1), Some(LifecycleEvent::Background));
        assert_eq!(LifecycleEvent::from_signal(SIGUSR2), Some(LifecycleEvent::Foreground));
        assert_eq!(LifecycleEvent::from_signal(signal_hook::consts::SIGTERM), None);
    }

    #[tokio::test]
    async fn events_drive_reconciliation() {
        let clock = ManualClock::new(0);
        let state = AppState::new(0, "127.0.0.1".to_string(), "10", Arc::new(clock.clone()));
        state.start();

        LifecycleEvent::Background.apply(&state);
        assert!(state.timer_state().is_backgrounded());

        clock.advance(90_000);
        LifecycleEvent::Foreground.apply(&state);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.elapsed, "00:01:30");
        assert_eq!(snapshot.earnings, "0.25");
        state.shutdown();
    }
}
