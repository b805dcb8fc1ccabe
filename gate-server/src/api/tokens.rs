use crate::api::auth_gate::Principal;
use crate::errors::ApiError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use serde::Deserialize;
use texas_client::{IntrospectionResponse, TokenResponse, TokenSuccess};

#[derive(Debug, Deserialize)]
pub(crate) struct AudienceParams {
    aud: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TargetParams {
    target: Option<String>,
}

/// Exchanges the caller's token for one targeting the given audience
/// (on-behalf-of)
#[utoipa::path(
    get,
    path = "/api/obo",
    tag = TOKEN_TAG,
    params(
        ("aud" = String, Query, description = "Target audience for the exchanged token"),
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Exchanged token", body = TokenSuccess),
        (status = 400, description = "Missing audience parameter"),
        (status = 502, description = "Token service unreachable"),
    )
)]
pub(crate) async fn obo(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(params): Query<AudienceParams>,
) -> Response {
    let Some(Extension(principal)) = principal else {
        return ApiError::unauthorized("missing principal").into_response();
    };
    let Some(aud) = params.aud else {
        return ApiError::bad_request("missing 'aud' query parameter").into_response();
    };

    let target = state.config.identity_provider.format_target(&aud);
    match state.texas.exchange(&target, &principal.token).await {
        Ok(response) => token_response(response),
        Err(e) => {
            error!("Token exchange failed: {e}");
            ApiError::from(e).into_response()
        }
    }
}

/// Fetches a machine-to-machine token for the given audience
#[utoipa::path(
    get,
    path = "/api/m2m",
    tag = TOKEN_TAG,
    params(
        ("aud" = String, Query, description = "Target audience for the token"),
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Issued token", body = TokenSuccess),
        (status = 400, description = "Missing audience parameter"),
        (status = 502, description = "Token service unreachable"),
    )
)]
pub(crate) async fn m2m(
    State(state): State<AppState>,
    Query(params): Query<AudienceParams>,
) -> Response {
    let Some(aud) = params.aud else {
        return ApiError::bad_request("missing 'aud' query parameter").into_response();
    };

    let target = state.config.identity_provider.format_target(&aud);
    match state.texas.token(&target).await {
        Ok(response) => token_response(response),
        Err(e) => {
            error!("Token request failed: {e}");
            ApiError::from(e).into_response()
        }
    }
}

/// Fetches a machine-to-machine token for the given target; alias flow for
/// scope-style providers
#[utoipa::path(
    get,
    path = "/api/token",
    tag = TOKEN_TAG,
    params(
        ("target" = String, Query, description = "Target scope for the token"),
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Issued token", body = TokenSuccess),
        (status = 400, description = "Missing target parameter"),
        (status = 502, description = "Token service unreachable"),
    )
)]
pub(crate) async fn token(
    State(state): State<AppState>,
    Query(params): Query<TargetParams>,
) -> Response {
    let Some(target) = params.target else {
        return ApiError::bad_request("missing 'target' query parameter").into_response();
    };

    let target = state.config.identity_provider.format_target(&target);
    match state.texas.token(&target).await {
        Ok(response) => token_response(response),
        Err(e) => {
            error!("Token request failed: {e}");
            ApiError::from(e).into_response()
        }
    }
}

/// Fetches a fresh token and immediately introspects it; a diagnostic
/// composition of the two token service calls
#[utoipa::path(
    get,
    path = "/api/introspect",
    tag = TOKEN_TAG,
    params(
        ("target" = Option<String>, Query, description = "Target for the intermediate token; defaults to the configured target"),
        ("Authorization" = String, Header, description = "Bearer token"),
    ),
    responses(
        (status = 200, description = "Introspection result for the fresh token", body = IntrospectionResponse),
        (status = 502, description = "Token service unreachable"),
    )
)]
pub(crate) async fn introspect(
    State(state): State<AppState>,
    Query(params): Query<TargetParams>,
) -> Response {
    let target = params
        .target
        .unwrap_or_else(|| state.config.default_target.clone());
    let target = state.config.identity_provider.format_target(&target);

    let access_token = match state.texas.token(&target).await {
        Ok(TokenResponse::Success(token)) => token.access_token,
        Ok(TokenResponse::Error { error, status }) => {
            return (status, Json(error)).into_response()
        }
        Err(e) => {
            error!("Token request failed: {e}");
            return ApiError::from(e).into_response();
        }
    };

    match state.texas.introspect(&access_token).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!("Introspection failed: {e}");
            ApiError::from(e).into_response()
        }
    }
}

/// Relays a token service response to the caller; upstream errors keep
/// their status and body
fn token_response(response: TokenResponse) -> Response {
    match response {
        TokenResponse::Success(token) => (StatusCode::OK, Json(token)).into_response(),
        TokenResponse::Error { error, status } => (status, Json(error)).into_response(),
    }
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/api/obo", get(obo))
        .route("/api/m2m", get(m2m))
        .route("/api/token", get(token))
        .route("/api/introspect", get(introspect))
}
