use crate::api::found;
use crate::config::ChallengeMode;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{error, info, warn};
use serde_json::{Map, Value};

/// Validated identity attached to a request after successful introspection.
///
/// Created per request and discarded with it; never persisted.
#[derive(Debug, Clone)]
pub(crate) struct Principal {
    /// The raw bearer token as presented by the caller
    pub token: String,
    /// Claims from the introspection response
    pub claims: Map<String, Value>,
}

/// Authentication gate for protected routes.
///
/// Every request ends in one of two outcomes: authenticated (a [`Principal`]
/// is attached and the inner handler runs) or challenged. A failed
/// introspection call counts as unauthenticated; the gate fails closed.
pub(super) async fn authentication_gate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token,
        None => {
            warn!("unauthenticated: no Bearer token found in Authorization header");
            return challenge(&state, &request);
        }
    };

    let introspection = match state.texas.introspect(&token).await {
        Ok(response) => response,
        Err(e) => {
            error!("unauthenticated: introspect request failed: {e}");
            return challenge(&state, &request);
        }
    };

    if !introspection.active {
        warn!(
            "unauthenticated: {}",
            introspection.error.as_deref().unwrap_or("token is not active")
        );
        return challenge(&state, &request);
    }

    info!("authenticated - claims={:?}", introspection.claims);
    request.extensions_mut().insert(Principal {
        token,
        claims: introspection.claims,
    });
    next.run(request).await
}

/// Extracts the token from a `Bearer` Authorization header
fn bearer_token(request: &Request<Body>) -> Option<String> {
    let header = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim().to_owned())
    } else {
        None
    }
}

/// Answers an unauthenticated request according to the configured policy.
///
/// The redirect points at the login endpoint and carries the original
/// request URI so the caller lands back where it started after login.
fn challenge(state: &AppState, request: &Request<Body>) -> Response {
    match state.config.challenge {
        ChallengeMode::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "invalid or missing bearer token",
        )
            .into_response(),
        ChallengeMode::Redirect => {
            let host = if state.config.ingress.is_empty() {
                let host = request
                    .headers()
                    .get(header::HOST)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("localhost");
                format!("http://{host}")
            } else {
                state.config.ingress.clone()
            };
            let target = format!(
                "{}/oauth2/login?redirect={}",
                host.trim_end_matches('/'),
                request.uri()
            );
            info!("unauthenticated: redirecting to '{target}'");
            found(&target)
        }
    }
}
