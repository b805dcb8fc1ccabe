use crate::errors::ApiError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::error;
use serde::Deserialize;
use texas_client::TokenResponse;

const ALLOWED_ACR_VALUES: [&str; 2] = ["idporten-loa-high", "idporten-loa-substantial"];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub(crate) struct PublicOboForm {
    pid: Option<String>,
    aud: Option<String>,
    acr: Option<String>,
}

/// Issues an on-behalf-of token for a synthetic end user.
///
/// Fetches a fake end-user token for the given person identifier from the
/// token generator, then exchanges it for the requested audience. Intended
/// for test clients that have no real login session to delegate from.
#[utoipa::path(
    post,
    path = "/api/public/obo",
    tag = TOKEN_TAG,
    responses(
        (status = 200, description = "Exchanged access token", body = String),
        (status = 400, description = "Missing or invalid form field"),
        (status = 502, description = "Token generator or token service unreachable"),
    )
)]
pub(crate) async fn public_obo(
    State(state): State<AppState>,
    Form(form): Form<PublicOboForm>,
) -> Response {
    let Some(pid) = form.pid else {
        return ApiError::bad_request("missing 'pid' form parameter").into_response();
    };
    let acr = form
        .acr
        .unwrap_or_else(|| "idporten-loa-high".to_string());
    if !ALLOWED_ACR_VALUES.contains(&acr.as_str()) {
        return ApiError::bad_request(
            "invalid 'acr' form parameter, must be 'idporten-loa-high' or 'idporten-loa-substantial'",
        )
        .into_response();
    }
    let Some(aud) = form.aud else {
        return ApiError::bad_request("missing 'aud' form parameter").into_response();
    };

    let user_token = match fetch_user_token(&state, &pid, &acr).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to fetch user token from token generator: {e}");
            return ApiError::bad_gateway("Failed to fetch user token from token generator")
                .into_response();
        }
    };

    let target = state.config.identity_provider.format_target(&aud);
    match state.texas.exchange(&target, &user_token).await {
        Ok(TokenResponse::Success(token)) => (StatusCode::OK, token.access_token).into_response(),
        Ok(TokenResponse::Error { error, status }) => (status, Json(error)).into_response(),
        Err(e) => {
            error!("Token exchange failed: {e}");
            ApiError::from(e).into_response()
        }
    }
}

/// Fetches a synthetic end-user token from the token generator
async fn fetch_user_token(
    state: &AppState,
    pid: &str,
    acr: &str,
) -> Result<String, reqwest::Error> {
    state
        .http_client
        .get(state.config.token_generator.idporten_url())
        .query(&[("pid", pid), ("acr", acr)])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/api/public/obo", post(public_obo))
}
