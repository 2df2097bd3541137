//! Liveness endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET `/`: hello-world liveness probe.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// GET `/health`: liveness plus model lifecycle state.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let model = state.processor.manager().state().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": model,
    }))
}
