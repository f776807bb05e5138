//! REST handlers for health checks and call inspection

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::errors::app_error::{AppError, AppResult};
use crate::session::{CallSession, Turn};
use crate::state::AppState;

/// Health check endpoint
///
/// Returns a simple JSON response to indicate the server is running.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Fetch one call record by id
///
/// Returns 404 if no call with the given id was ever accepted.
pub async fn get_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> AppResult<Json<CallSession>> {
    debug!("Call lookup requested for {}", call_id);

    let session = state
        .store
        .get_session(&call_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("call {call_id}")))?;

    Ok(Json(session))
}

/// List the turns of one call in the order they started
///
/// Returns 404 if the call does not exist and an empty list if it has
/// not completed any turns yet.
pub async fn list_call_turns(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> AppResult<Json<Vec<Turn>>> {
    debug!("Turn listing requested for {}", call_id);

    state
        .store
        .get_session(&call_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("call {call_id}")))?;

    let turns = state.store.list_turns(&call_id).await?;
    Ok(Json(turns))
}
