//! HTTP client for the Texas token service sidecar.
//!
//! Texas fronts the identity providers and exposes three endpoints: `token`
//! (machine-to-machine token fetch), `exchange` (on-behalf-of token
//! exchange) and `introspect` (opaque token validation). This crate wraps
//! those endpoints behind a typed client; every call is a single HTTP round
//! trip with no caching and no retries, so failures surface immediately to
//! the caller.

mod models;

pub use models::{
    IdentityProvider, IntrospectionResponse, TokenErrorResponse, TokenExchangeRequest,
    TokenIntrospectionRequest, TokenRequest, TokenResponse, TokenSuccess,
};

use http::StatusCode;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Endpoint set for a Texas sidecar deployment.
#[derive(Debug, Clone)]
pub struct TexasEndpoints {
    pub token_endpoint: String,
    pub token_exchange_endpoint: String,
    pub token_introspection_endpoint: String,
}

/// Errors that can occur when talking to the token service.
///
/// Rejected grants are not errors; they come back as
/// [`TokenResponse::Error`]. This type covers transport failures and
/// responses outside the token service's schema.
#[derive(Debug, Error)]
pub enum TexasError {
    #[error("failed to send request to token service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token service returned unexpected status {0}: {1}")]
    UnexpectedStatus(StatusCode, String),
    #[error("failed to parse token service response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the Texas token service.
///
/// Holds a pooled HTTP client and is safe to share across concurrent
/// requests; all per-call state lives in the request itself.
#[derive(Debug, Clone)]
pub struct TexasClient {
    http: Client,
    endpoints: TexasEndpoints,
    provider: IdentityProvider,
}

impl TexasClient {
    /// Creates a client with its own pooled HTTP client.
    pub fn new(
        endpoints: TexasEndpoints,
        provider: IdentityProvider,
        timeout_secs: u64,
    ) -> Result<Self, TexasError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(2))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;
        Ok(Self::with_http_client(http, endpoints, provider))
    }

    /// Creates a client on top of an existing HTTP client.
    pub fn with_http_client(
        http: Client,
        endpoints: TexasEndpoints,
        provider: IdentityProvider,
    ) -> Self {
        Self {
            http,
            endpoints,
            provider,
        }
    }

    /// The identity provider this client requests tokens from.
    pub fn provider(&self) -> IdentityProvider {
        self.provider
    }

    /// Fetches a machine-to-machine token for the given target.
    pub async fn token(&self, target: &str) -> Result<TokenResponse, TexasError> {
        debug!(
            "requesting token for '{}' from provider '{}'",
            target, self.provider
        );
        let body = TokenRequest {
            target: target.to_owned(),
            identity_provider: self.provider,
        };
        self.token_request(&self.endpoints.token_endpoint, &body)
            .await
    }

    /// Exchanges the end user's token for a token targeting the given
    /// audience (on-behalf-of).
    pub async fn exchange(
        &self,
        target: &str,
        user_token: &str,
    ) -> Result<TokenResponse, TexasError> {
        debug!(
            "exchanging token for '{}' with provider '{}'",
            target, self.provider
        );
        let body = TokenExchangeRequest {
            target: target.to_owned(),
            identity_provider: self.provider,
            user_token: user_token.to_owned(),
        };
        self.token_request(&self.endpoints.token_exchange_endpoint, &body)
            .await
    }

    /// Validates a token against the introspection endpoint.
    ///
    /// An inactive token is a structured response, not an `Err`; `Err`
    /// means the introspection call itself failed and the caller must
    /// treat the token as unverified.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, TexasError> {
        let body = TokenIntrospectionRequest {
            token: token.to_owned(),
            identity_provider: self.provider,
        };
        let response = self
            .http
            .post(&self.endpoints.token_introspection_endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(TexasError::UnexpectedStatus(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a token or exchange request.
    ///
    /// Non-2xx responses carrying the OAuth error schema become
    /// [`TokenResponse::Error`] with the upstream status attached, so the
    /// caller can relay them verbatim. Anything else is a [`TexasError`].
    async fn token_request<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<TokenResponse, TexasError> {
        let response = self.http.post(endpoint).json(body).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if status.is_success() {
            return Ok(TokenResponse::Success(serde_json::from_slice(&bytes)?));
        }

        match serde_json::from_slice::<TokenErrorResponse>(&bytes) {
            Ok(error) => Ok(TokenResponse::Error { error, status }),
            Err(_) => Err(TexasError::UnexpectedStatus(
                status,
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
        }
    }
}
