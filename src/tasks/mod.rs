//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod lifecycle;
pub mod ticker;

// Re-export main items
pub use lifecycle::{lifecycle_task, LifecycleEvent};
pub use ticker::{Ticker, TICK_PERIOD};
