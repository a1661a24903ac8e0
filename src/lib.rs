//! Rate Clock - a stopwatch that turns tracked time into earnings
//! 
//! This library provides the elapsed-time tracker with background/foreground
//! reconciliation, the earnings and hourly-rate helpers, and the HTTP surface
//! that drives them.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerSnapshot, TrackerError};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
