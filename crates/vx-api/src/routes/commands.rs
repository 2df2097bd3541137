//! Command processing endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use vx_protocol::{ProcessCommandRequest, ProcessCommandResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST `/process_command`: classify a command and dispatch it.
pub async fn process_command(
    State(state): State<AppState>,
    body: Result<Json<ProcessCommandRequest>, JsonRejection>,
) -> ApiResult<Json<ProcessCommandResponse>> {
    let Json(req) = body?;

    if req.command.trim().is_empty() {
        return Err(ApiError::BadRequest("command must not be empty".into()));
    }

    tracing::info!(command = %req.command, "processing command");
    let processed = state.processor.process(&req.command).await;

    Ok(Json(ProcessCommandResponse::new(
        req.command,
        processed.decision,
        processed.message,
    )))
}
