//! Shared tracker controller
//!
//! Owns the timer state, the hourly-rate field, the injected clock and the
//! ticker handle. Every event takes the state lock once and does its
//! read-then-write under it, so ticks and lifecycle events never interleave.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{
    earnings::format_elapsed, RateInput, TimeFields, TimerState, TrackerError,
};
use crate::{
    tasks::ticker::{Ticker, TICK_PERIOD},
    utils::clock::Clock,
};

/// Everything the display surface needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub elapsed_seconds: u64,
    pub elapsed: String,
    pub earnings: String,
    pub rate: String,
    pub running: bool,
    pub backgrounded: bool,
}

impl TimerSnapshot {
    fn from_parts(state: &TimerState, rate: &RateInput) -> Self {
        Self {
            elapsed_seconds: state.elapsed_seconds,
            elapsed: format_elapsed(state.elapsed_seconds),
            earnings: rate.earnings_for(state.elapsed_seconds),
            rate: rate.text().to_string(),
            running: state.running,
            backgrounded: state.is_backgrounded(),
        }
    }
}

/// Main application state shared by the ticker, signal task and HTTP handlers
pub struct AppState {
    timer_state: Mutex<TimerState>,
    rate: Mutex<RateInput>,
    clock: Arc<dyn Clock>,
    ticker: Mutex<Option<Ticker>>,
    tick_period: Duration,
    me: Weak<AppState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for display updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("timer_state", &self.timer_state)
            .field("rate", &self.rate)
            .field("port", &self.port)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AppState {
    /// Create a stopped tracker with zero elapsed time
    pub fn new(port: u16, host: String, rate: &str, clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::with_tick_period(port, host, rate, clock, TICK_PERIOD)
    }

    /// Same as [`AppState::new`] with a custom ticker period
    pub fn with_tick_period(
        port: u16,
        host: String,
        rate: &str,
        clock: Arc<dyn Clock>,
        tick_period: Duration,
    ) -> Arc<Self> {
        let timer_state = TimerState::new();
        let rate = RateInput::new(rate);
        let (timer_update_tx, _) = watch::channel(TimerSnapshot::from_parts(&timer_state, &rate));

        Arc::new_cyclic(|me| Self {
            timer_state: Mutex::new(timer_state),
            rate: Mutex::new(rate),
            clock,
            ticker: Mutex::new(None),
            tick_period,
            me: me.clone(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
        })
    }

    /// Start tracking time.
    ///
    /// Spawns the foreground ticker, so it must be called from within a
    /// Tokio runtime.
    pub fn start(&self) -> TimerSnapshot {
        let now = self.clock.now_millis();
        self.transition("start", |state| {
            if state.start(now) {
                info!("Timer started at {}", format_elapsed(state.elapsed_seconds));
            } else {
                debug!("Start ignored, timer already running");
            }
        })
    }

    /// Stop tracking time
    pub fn stop(&self) -> TimerSnapshot {
        self.transition("stop", |state| {
            if state.stop() {
                info!("Timer stopped at {}", format_elapsed(state.elapsed_seconds));
            } else {
                debug!("Stop ignored, timer already stopped");
            }
        })
    }

    /// Start when stopped, stop when running. Starting spawns the ticker and
    /// needs a Tokio runtime, like [`AppState::start`].
    pub fn toggle(&self) -> TimerSnapshot {
        let now = self.clock.now_millis();
        self.transition("toggle", |state| {
            if state.running {
                state.stop();
                info!("Timer stopped at {}", format_elapsed(state.elapsed_seconds));
            } else {
                state.start(now);
                info!("Timer started at {}", format_elapsed(state.elapsed_seconds));
            }
        })
    }

    /// One foreground second; called by the ticker. Returns false once the
    /// tracker no longer accepts ticks.
    pub fn tick(&self) -> bool {
        let mut state = lock(&self.timer_state);
        let ticked = state.tick();
        if ticked {
            self.publish(&state);
        }
        ticked
    }

    /// Host process went to background
    pub fn on_background(&self) -> TimerSnapshot {
        let now = self.clock.now_millis();
        self.transition("background", |state| {
            if state.on_background(now) {
                info!("Backgrounded while running, suspension recorded at {}", now);
            } else {
                debug!("Backgrounded");
            }
        })
    }

    /// Host process resumed; backgrounded wall-clock time is added.
    ///
    /// Returns the snapshot together with the seconds reconciled by this call.
    /// Restarts the ticker when running, so it must be called from within a
    /// Tokio runtime.
    pub fn on_foreground(&self) -> (TimerSnapshot, u64) {
        let now = self.clock.now_millis();
        let mut recovered = 0;
        let snapshot = self.transition("foreground", |state| {
            recovered = state.on_foreground(now);
            if recovered > 0 {
                info!("Foregrounded, reconciled {}s spent in background", recovered);
            } else {
                debug!("Foregrounded");
            }
        });
        (snapshot, recovered)
    }

    /// Current elapsed time split into edit-form fields
    pub fn begin_edit(&self) -> Result<TimeFields, TrackerError> {
        lock(&self.timer_state).begin_edit()
    }

    /// Overwrite elapsed time; requires a stopped timer
    pub fn set_elapsed(&self, hours: i64, minutes: i64, seconds: i64) -> Result<TimerSnapshot, TrackerError> {
        self.try_transition("edit", |state| state.set_elapsed(hours, minutes, seconds).map(|_| ()))
    }

    /// Overwrite elapsed time from parsed form fields
    pub fn set_fields(&self, fields: TimeFields) -> Result<TimerSnapshot, TrackerError> {
        self.try_transition("edit", |state| state.set_fields(fields).map(|_| ()))
    }

    /// Zero elapsed time; requires a stopped timer
    pub fn reset(&self) -> Result<TimerSnapshot, TrackerError> {
        self.try_transition("reset", TimerState::reset)
    }

    /// Keystroke in the hourly-rate field
    pub fn set_rate_text(&self, raw: &str) -> TimerSnapshot {
        {
            let mut rate = lock(&self.rate);
            let text = rate.on_change(raw);
            debug!("Hourly rate text now {:?}", text);
        }
        self.record_action("rate");
        self.snapshot()
    }

    /// Hourly-rate field lost focus
    pub fn commit_rate(&self) -> TimerSnapshot {
        {
            let mut rate = lock(&self.rate);
            let text = rate.on_blur();
            info!("Hourly rate set to {}", text);
        }
        self.record_action("rate-commit");
        self.snapshot()
    }

    /// Current display snapshot; also pushed to watchers
    pub fn snapshot(&self) -> TimerSnapshot {
        let state = lock(&self.timer_state);
        self.publish(&state)
    }

    /// Copy of the raw tracker state
    pub fn timer_state(&self) -> TimerState {
        lock(&self.timer_state).clone()
    }

    /// Whether a ticker task is currently alive
    pub fn ticker_active(&self) -> bool {
        lock(&self.ticker)
            .as_ref()
            .map_or(false, |ticker| !ticker.is_finished())
    }

    /// Teardown: cancel the ticker so nothing mutates state afterwards
    pub fn shutdown(&self) {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.cancel();
        }
        info!("Tracker shut down");
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = lock(&self.last_action).clone();
        let last_action_time = *lock(&self.last_action_time);
        (last_action, last_action_time)
    }

    fn transition<F>(&self, action: &str, updater: F) -> TimerSnapshot
    where
        F: FnOnce(&mut TimerState),
    {
        match self.try_transition(action, |state| {
            updater(state);
            Ok(())
        }) {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    /// Apply an update under the state lock, then bring the ticker in line
    /// with the new state before the lock is released
    fn try_transition<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, TrackerError>
    where
        F: FnOnce(&mut TimerState) -> Result<(), TrackerError>,
    {
        let mut state = lock(&self.timer_state);
        updater(&mut state)?;
        self.sync_ticker(&state);
        let snapshot = self.publish(&state);
        drop(state);

        self.record_action(action);
        Ok(snapshot)
    }

    fn sync_ticker(&self, state: &TimerState) {
        let mut ticker = lock(&self.ticker);
        if state.should_tick() {
            let alive = ticker.as_ref().map_or(false, |t| !t.is_finished());
            if !alive {
                *ticker = Some(Ticker::spawn(self.me.clone(), self.tick_period));
            }
        } else if let Some(existing) = ticker.take() {
            existing.cancel();
        }
    }

    fn publish(&self, state: &TimerState) -> TimerSnapshot {
        let snapshot = {
            let rate = lock(&self.rate);
            TimerSnapshot::from_parts(state, &rate)
        };
        self.timer_update_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn record_action(&self, action: &str) {
        *lock(&self.last_action) = Some(action.to_string());
        *lock(&self.last_action_time) = Some(Utc::now());
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    const T: i64 = 1_700_000_000_000;

    fn tracker() -> (Arc<AppState>, ManualClock) {
        let clock = ManualClock::new(T);
        let state = AppState::new(0, "127.0.0.1".to_string(), "25.00", Arc::new(clock.clone()));
        (state, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_accrues_one_second_per_period() {
        let (state, _clock) = tracker();
        state.start();
        assert!(state.ticker_active());

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(state.timer_state().elapsed_seconds, 3);

        state.stop();
        assert!(!state.ticker_active());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.timer_state().elapsed_seconds, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn background_time_comes_from_the_clock_only() {
        let (state, clock) = tracker();
        state.start();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        state.on_background();
        assert!(!state.ticker_active());

        // Runtime time passes but the ticker is gone
        tokio::time::sleep(Duration::from_secs(10)).await;
        clock.advance(125_000);

        let (snapshot, recovered) = state.on_foreground();
        assert_eq!(recovered, 125);
        assert_eq!(snapshot.elapsed_seconds, 2 + 125);
        assert!(state.ticker_active());
    }

    #[tokio::test]
    async fn foreground_twice_counts_once() {
        let (state, clock) = tracker();
        state.start();
        state.on_background();
        clock.advance(30_000);

        assert_eq!(state.on_foreground().0.elapsed_seconds, 30);
        clock.advance(30_000);
        let (snapshot, recovered) = state.on_foreground();
        assert_eq!(recovered, 0);
        assert_eq!(snapshot.elapsed_seconds, 30);
        state.shutdown();
    }

    #[tokio::test]
    async fn guarded_operations_leave_state_unchanged() {
        let (state, _clock) = tracker();
        state.set_elapsed(0, 10, 0).unwrap();
        state.start();

        assert!(matches!(state.reset(), Err(TrackerError::PreconditionViolation(_))));
        assert!(matches!(
            state.set_elapsed(1, 0, 0),
            Err(TrackerError::PreconditionViolation(_))
        ));
        assert_eq!(state.timer_state().elapsed_seconds, 600);

        state.stop();
        assert_eq!(state.reset().unwrap().elapsed, "00:00:00");
    }

    #[tokio::test]
    async fn snapshot_reflects_rate_and_time() {
        let (state, _clock) = tracker();
        state.set_elapsed(1, 30, 0).unwrap();
        state.set_rate_text("abc40.129");
        let snapshot = state.commit_rate();

        assert_eq!(snapshot.rate, "40.12");
        assert_eq!(snapshot.elapsed, "01:30:00");
        assert_eq!(snapshot.earnings, "60.18");
        assert_eq!(*state.timer_update_tx.subscribe().borrow(), snapshot);
        assert_eq!(state.get_last_action().0.as_deref(), Some("rate-commit"));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_the_ticker() {
        let (state, _clock) = tracker();
        state.start();
        state.shutdown();
        assert!(!state.ticker_active());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(state.timer_state().elapsed_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_tracker_stops_the_ticker() {
        let (state, _clock) = tracker();
        let watcher = state.timer_update_tx.subscribe();
        state.start();
        drop(state);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(watcher.borrow().elapsed_seconds, 0);
    }

    #[test]
    #[should_panic(expected = "Tokio 1.x runtime")]
    fn start_requires_a_runtime() {
        let (state, _clock) = tracker();
        state.start();
    }
}
