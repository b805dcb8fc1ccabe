use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Liveness probe handler
#[utoipa::path(
    get,
    path = "/internal/is_alive",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive", body = String)
    )
)]
pub(crate) async fn is_alive() -> &'static str {
    "alive"
}

/// Readiness probe handler
#[utoipa::path(
    get,
    path = "/internal/is_ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = String)
    )
)]
pub(crate) async fn is_ready() -> &'static str {
    "ready"
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/internal/is_alive", get(is_alive))
        .route("/internal/is_ready", get(is_ready))
}
