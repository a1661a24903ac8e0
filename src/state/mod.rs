//! State management module
//! 
//! Tracker state, its pure transitions, the display helpers and the shared
//! controller that ties them to the clock and the ticker.

pub mod app_state;
pub mod earnings;
pub mod error;
pub mod rate_input;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerSnapshot};
pub use error::TrackerError;
pub use rate_input::RateInput;
pub use timer_state::{TimeFields, TimerState, Visibility};
