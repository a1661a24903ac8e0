//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::{info, warn};

use crate::state::{earnings::format_elapsed, AppState};
use super::responses::{
    ApiError, ApiResponse, EditResponse, EditTimeRequest, HealthResponse, RateRequest,
    ResetRequest, StatusResponse,
};

/// Handle POST /start - Start tracking time
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.start();
    Json(ApiResponse::new("Timer started", timer))
}

/// Handle POST /stop - Stop tracking time
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.stop();
    Json(ApiResponse::new("Timer stopped", timer))
}

/// Handle POST /toggle - Start/stop button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.toggle();
    let message = if timer.running { "Timer started" } else { "Timer stopped" };
    Json(ApiResponse::new(message, timer))
}

/// Handle POST /background - Host process suspended
pub async fn background_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.on_background();
    Json(ApiResponse::new("Moved to background", timer))
}

/// Handle POST /foreground - Host process resumed
pub async fn foreground_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let (timer, recovered) = state.on_foreground();
    Json(ApiResponse::new(
        format!("Moved to foreground, recovered {}s", recovered),
        timer,
    ))
}

/// Handle GET /elapsed/edit - Prefill the edit form
pub async fn begin_edit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EditResponse>, ApiError> {
    let fields = state.begin_edit().map_err(|e| {
        warn!("Edit refused: {}", e);
        e
    })?;
    Ok(Json(EditResponse {
        elapsed: format_elapsed(fields.total_seconds()),
        fields,
    }))
}

/// Handle PUT /elapsed - Save edited time
pub async fn set_elapsed_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EditTimeRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let fields = request.fields();
    let timer = state.set_fields(fields).map_err(|e| {
        warn!("Edit rejected: {}", e);
        e
    })?;
    info!("Elapsed time edited to {}", timer.elapsed);
    Ok(Json(ApiResponse::new("Elapsed time updated", timer)))
}

/// Handle POST /reset - Zero the timer after confirmation
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    request: Option<Json<ResetRequest>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let confirmed = request.map_or(false, |Json(body)| body.confirm);
    if !confirmed {
        return Err(ApiError::ConfirmationRequired);
    }

    let timer = state.reset().map_err(|e| {
        warn!("Reset refused: {}", e);
        e
    })?;
    info!("Timer reset");
    Ok(Json(ApiResponse::new("Timer reset", timer)))
}

/// Handle PUT /rate - Keystroke in the hourly-rate field
pub async fn rate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RateRequest>,
) -> Json<ApiResponse> {
    let timer = state.set_rate_text(&request.rate);
    Json(ApiResponse::new("Hourly rate updated", timer))
}

/// Handle POST /rate/commit - Hourly-rate field lost focus
pub async fn rate_commit_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.commit_rate();
    Json(ApiResponse::new("Hourly rate committed", timer))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.snapshot(),
        ticker_active: state.ticker_active(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
