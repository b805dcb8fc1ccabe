pub(crate) mod auth_gate;
pub(crate) mod health;
pub(crate) mod identity;
pub(crate) mod public;
pub(crate) mod tokens;

use crate::state::AppState;
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Router};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .merge(health::router())
        .merge(public::router())
        .merge(protected_routes(state))
}

/// Routes that require a valid bearer token; the authentication gate runs
/// before every handler in this group
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(identity::router())
        .merge(tokens::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_gate::authentication_gate,
        ))
}

/// The context root points callers at the identity route
async fn root() -> Response {
    found("/api/me")
}

/// 302 Found pointing at the given location
pub(crate) fn found(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .expect("Failed to create response")
}
