//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimeFields, TimerSnapshot, TrackerError};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        let status = if timer.running { "running" } else { "stopped" };
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub ticker_active: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Prefilled edit form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub fields: TimeFields,
    pub elapsed: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One edit-form field, sent either as a number or as raw text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeField {
    Number(i64),
    Text(String),
}

impl TimeField {
    /// Negative or non-numeric values become 0
    fn value(&self) -> u64 {
        match self {
            TimeField::Number(n) => (*n).max(0) as u64,
            TimeField::Text(raw) => crate::state::timer_state::parse_component(raw),
        }
    }
}

impl Default for TimeField {
    fn default() -> Self {
        TimeField::Number(0)
    }
}

/// Body of PUT /elapsed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditTimeRequest {
    #[serde(default)]
    pub hours: TimeField,
    #[serde(default)]
    pub minutes: TimeField,
    #[serde(default)]
    pub seconds: TimeField,
}

impl EditTimeRequest {
    pub fn fields(&self) -> TimeFields {
        TimeFields {
            hours: self.hours.value(),
            minutes: self.minutes.value(),
            seconds: self.seconds.value(),
        }
    }
}

/// Body of POST /reset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Body of PUT /rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    pub rate: String,
}

/// Error body returned for rejected operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub message: String,
}

/// Errors an endpoint can answer with
#[derive(Debug)]
pub enum ApiError {
    Tracker(TrackerError),
    ConfirmationRequired,
}

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        ApiError::Tracker(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, kind, message) = match self {
            ApiError::Tracker(e) => {
                let code = match e {
                    TrackerError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    TrackerError::PreconditionViolation(_) => StatusCode::CONFLICT,
                };
                (code, e.kind(), e.to_string())
            }
            ApiError::ConfirmationRequired => (
                StatusCode::BAD_REQUEST,
                "confirmation_required",
                "reset must be confirmed with {\"confirm\": true}".to_string(),
            ),
        };

        let body = ErrorResponse {
            status: "error".to_string(),
            kind: kind.to_string(),
            message,
        };
        (code, Json(body)).into_response()
    }
}
