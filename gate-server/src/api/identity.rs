use crate::api::auth_gate::Principal;
use crate::errors::ApiError;
use crate::openapi::IDENTITY_TAG;
use crate::state::AppState;
use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};

/// Returns the claims of the authenticated caller exactly as the token
/// service reported them
#[utoipa::path(
    get,
    path = "/api/me",
    tag = IDENTITY_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Claims of the authenticated caller"),
        (status = 401, description = "No authenticated principal on the request"),
    )
)]
pub(crate) async fn me(principal: Option<Extension<Principal>>) -> Response {
    match principal {
        Some(Extension(principal)) => Json(principal.claims).into_response(),
        None => ApiError::unauthorized("missing principal").into_response(),
    }
}

/// Echoes all request headers as a flat string map; diagnostic only
#[utoipa::path(
    get,
    path = "/api/headers",
    tag = IDENTITY_TAG,
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Request headers as a flat map"),
    )
)]
pub(crate) async fn request_headers(headers: HeaderMap) -> Json<Map<String, Value>> {
    let mut map = Map::new();
    for key in headers.keys() {
        let joined = headers
            .get_all(key)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(key.as_str().to_owned(), Value::String(joined));
    }
    Json(map)
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/headers", get(request_headers))
}
