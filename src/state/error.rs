//! Tracker error kinds

use thiserror::Error;

/// Errors surfaced to the caller for user notification.
///
/// The tracker state is left unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Edited time fields are out of range
    #[error("invalid time: {0}")]
    InvalidInput(String),
    /// Operation requires the timer to be stopped
    #[error("timer running: {0}")]
    PreconditionViolation(String),
}

impl TrackerError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::InvalidInput(_) => "invalid_input",
            TrackerError::PreconditionViolation(_) => "precondition_violation",
        }
    }
}
