//! Elapsed-time tracker state and its transitions
//!
//! Every method here is a pure state transition. Wall-clock readings are
//! passed in by the caller so the shared controller can read its clock once
//! per event and tests can feed arbitrary instants.

use serde::{Deserialize, Serialize};

use super::TrackerError;

/// Host-process visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Foreground,
    Background,
}

/// Tracker state for a single session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub elapsed_seconds: u64,
    pub running: bool,
    /// Wall-clock millis at which the process went to background while running
    pub suspended_at: Option<i64>,
    pub visibility: Visibility,
}

/// Hours/minutes/seconds as entered in the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFields {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeFields {
    /// Split an elapsed duration into form fields
    pub fn from_elapsed(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Parse raw form text; non-numeric or negative fields become 0
    pub fn parse(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self {
            hours: parse_component(hours),
            minutes: parse_component(minutes),
            seconds: parse_component(seconds),
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Integer-field parse: leading integer prefix, anything else is 0
pub fn parse_component(raw: &str) -> u64 {
    let text = raw.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if negative || digits_len == 0 {
        return 0;
    }
    rest[..digits_len].parse::<u64>().unwrap_or(u64::MAX)
}

impl TimerState {
    /// Stopped, foreground, zero elapsed
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
            suspended_at: None,
            visibility: Visibility::Foreground,
        }
    }

    pub fn is_backgrounded(&self) -> bool {
        self.visibility == Visibility::Background
    }

    /// Whether the foreground ticker should be alive
    pub fn should_tick(&self) -> bool {
        self.running && !self.is_backgrounded()
    }

    /// Begin accumulating. Returns false when already running.
    pub fn start(&mut self, now_ms: i64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        if self.is_backgrounded() {
            self.suspended_at = Some(now_ms);
        }
        true
    }

    /// Stop accumulating. Returns false when already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.suspended_at = None;
        true
    }

    /// One foreground second. Ignored unless running in foreground.
    pub fn tick(&mut self) -> bool {
        if !self.should_tick() {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }

    /// Process went to background. Returns true when a suspension was recorded.
    pub fn on_background(&mut self, now_ms: i64) -> bool {
        self.visibility = Visibility::Background;
        if !self.running {
            return false;
        }
        // A later inactive/background notification overwrites the instant
        self.suspended_at = Some(now_ms);
        true
    }

    /// Process resumed. Returns the number of seconds reconciled.
    pub fn on_foreground(&mut self, now_ms: i64) -> u64 {
        self.visibility = Visibility::Foreground;
        let delta = match (self.running, self.suspended_at.take()) {
            (true, Some(suspended_at)) => {
                let millis = now_ms.saturating_sub(suspended_at).max(0);
                (millis / 1000) as u64
            }
            _ => 0,
        };
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(delta);
        delta
    }

    /// Prefill values for the edit form
    pub fn begin_edit(&self) -> Result<TimeFields, TrackerError> {
        if self.running {
            return Err(TrackerError::PreconditionViolation(
                "stop the timer before editing time".to_string(),
            ));
        }
        Ok(TimeFields::from_elapsed(self.elapsed_seconds))
    }

    /// Overwrite elapsed time. Negative components count as 0.
    pub fn set_elapsed(&mut self, hours: i64, minutes: i64, seconds: i64) -> Result<u64, TrackerError> {
        let fields = TimeFields {
            hours: hours.max(0) as u64,
            minutes: minutes.max(0) as u64,
            seconds: seconds.max(0) as u64,
        };
        self.set_fields(fields)
    }

    /// Overwrite elapsed time from already-parsed form fields
    pub fn set_fields(&mut self, fields: TimeFields) -> Result<u64, TrackerError> {
        if fields.minutes >= 60 || fields.seconds >= 60 {
            return Err(TrackerError::InvalidInput(
                "minutes and seconds must be less than 60".to_string(),
            ));
        }
        if self.running {
            return Err(TrackerError::PreconditionViolation(
                "stop the timer before editing time".to_string(),
            ));
        }
        self.elapsed_seconds = fields.total_seconds();
        Ok(self.elapsed_seconds)
    }

    /// Zero the elapsed time; confirmation is the caller's job
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        if self.running {
            return Err(TrackerError::PreconditionViolation(
                "stop the timer before resetting".to_string(),
            ));
        }
        self.elapsed_seconds = 0;
        Ok(())
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000_000;

    fn running() -> TimerState {
        let mut state = TimerState::new();
        state.start(T);
        state
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut state = TimerState::new();
        assert!(state.start(T));
        assert!(!state.start(T));
        assert!(state.running);

        assert!(state.stop());
        assert!(!state.stop());
        assert!(!state.running);
    }

    #[test]
    fn ticks_only_while_running_in_foreground() {
        let mut state = TimerState::new();
        assert!(!state.tick());
        assert_eq!(state.elapsed_seconds, 0);

        state.start(T);
        state.tick();
        state.tick();
        assert_eq!(state.elapsed_seconds, 2);

        state.on_background(T);
        assert!(!state.tick());
        assert_eq!(state.elapsed_seconds, 2);
    }

    #[test]
    fn background_delta_is_added_on_resume() {
        let mut state = running();
        state.elapsed_seconds = 10;

        assert!(state.on_background(T));
        assert_eq!(state.suspended_at, Some(T));

        assert_eq!(state.on_foreground(T + 125_000), 125);
        assert_eq!(state.elapsed_seconds, 135);
        assert_eq!(state.suspended_at, None);
    }

    #[test]
    fn partial_seconds_are_floored() {
        let mut state = running();
        state.on_background(T);
        assert_eq!(state.on_foreground(T + 2_999), 2);
        assert_eq!(state.elapsed_seconds, 2);
    }

    #[test]
    fn second_foreground_does_not_double_count() {
        let mut state = running();
        state.on_background(T);
        state.on_foreground(T + 60_000);
        assert_eq!(state.on_foreground(T + 120_000), 0);
        assert_eq!(state.elapsed_seconds, 60);
    }

    #[test]
    fn repeated_background_records_latest_instant() {
        let mut state = running();
        state.on_background(T);
        state.on_background(T + 5_000);
        assert_eq!(state.suspended_at, Some(T + 5_000));
        assert_eq!(state.on_foreground(T + 10_000), 5);
        assert_eq!(state.elapsed_seconds, 5);
    }

    #[test]
    fn clock_going_backwards_adds_nothing() {
        let mut state = running();
        state.on_background(T);
        assert_eq!(state.on_foreground(T - 30_000), 0);
        assert_eq!(state.elapsed_seconds, 0);
    }

    #[test]
    fn stopped_tracker_ignores_background() {
        let mut state = TimerState::new();
        assert!(!state.on_background(T));
        assert_eq!(state.suspended_at, None);
        assert_eq!(state.on_foreground(T + 50_000), 0);
    }

    #[test]
    fn stop_while_backgrounded_drops_suspension() {
        let mut state = running();
        state.on_background(T);
        state.stop();
        assert_eq!(state.suspended_at, None);
        assert_eq!(state.on_foreground(T + 50_000), 0);
    }

    #[test]
    fn start_while_backgrounded_records_suspension() {
        let mut state = TimerState::new();
        state.on_background(T);
        state.start(T + 1_000);
        assert_eq!(state.suspended_at, Some(T + 1_000));
        assert_eq!(state.on_foreground(T + 4_000), 3);
    }

    #[test]
    fn set_elapsed_round_trips() {
        let mut state = TimerState::new();
        assert_eq!(state.set_elapsed(2, 30, 15), Ok(9015));
        assert_eq!(state.elapsed_seconds, 2 * 3600 + 30 * 60 + 15);
        assert_eq!(state.begin_edit(), Ok(TimeFields { hours: 2, minutes: 30, seconds: 15 }));
    }

    #[test]
    fn set_elapsed_rejects_out_of_range_fields() {
        let mut state = TimerState::new();
        state.elapsed_seconds = 77;

        assert!(matches!(state.set_elapsed(1, 60, 0), Err(TrackerError::InvalidInput(_))));
        assert!(matches!(state.set_elapsed(1, 0, 60), Err(TrackerError::InvalidInput(_))));
        assert_eq!(state.elapsed_seconds, 77);
    }

    #[test]
    fn invalid_input_is_reported_before_running_guard() {
        let mut state = running();
        assert!(matches!(state.set_elapsed(0, 99, 0), Err(TrackerError::InvalidInput(_))));
    }

    #[test]
    fn negative_components_count_as_zero() {
        let mut state = TimerState::new();
        assert_eq!(state.set_elapsed(-3, 5, -1), Ok(300));
    }

    #[test]
    fn edits_and_reset_require_stopped_timer() {
        let mut state = running();
        state.elapsed_seconds = 42;

        assert!(matches!(state.reset(), Err(TrackerError::PreconditionViolation(_))));
        assert!(matches!(state.set_elapsed(0, 1, 0), Err(TrackerError::PreconditionViolation(_))));
        assert!(matches!(state.begin_edit(), Err(TrackerError::PreconditionViolation(_))));
        assert_eq!(state.elapsed_seconds, 42);

        state.stop();
        assert_eq!(state.reset(), Ok(()));
        assert_eq!(state.elapsed_seconds, 0);
    }

    #[test]
    fn parses_form_fields_like_integer_inputs() {
        assert_eq!(parse_component("12"), 12);
        assert_eq!(parse_component(" 7min"), 7);
        assert_eq!(parse_component("1.9"), 1);
        assert_eq!(parse_component("-4"), 0);
        assert_eq!(parse_component("abc"), 0);
        assert_eq!(parse_component(""), 0);

        let fields = TimeFields::parse("1", "x", "30");
        assert_eq!(fields.total_seconds(), 3630);
    }
}
