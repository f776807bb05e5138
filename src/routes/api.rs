use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::api;
use crate::state::AppState;
use std::sync::Arc;

/// Create the REST API router
///
/// # Endpoints
///
/// - `GET /v1/calls/{call_id}` - One call record
/// - `GET /v1/calls/{call_id}/turns` - The call's turns, oldest first
///
/// The health check endpoint is registered separately in main.rs so it
/// stays reachable without any middleware.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/calls/{call_id}", get(api::get_call))
        .route("/v1/calls/{call_id}/turns", get(api::list_call_turns))
        .layer(TraceLayer::new_for_http())
}
