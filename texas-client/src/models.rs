use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identity providers supported by the token service.
///
/// The serialized form is the wire-level alias the token service expects in
/// the `identity_provider` field of every request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum IdentityProvider {
    #[serde(rename = "azuread")]
    AzureAd,
    #[serde(rename = "idporten")]
    IdPorten,
    #[serde(rename = "maskinporten")]
    Maskinporten,
    #[serde(rename = "tokenx")]
    TokenX,
}

impl IdentityProvider {
    /// Wire-level alias for this provider.
    pub fn alias(&self) -> &'static str {
        match self {
            IdentityProvider::AzureAd => "azuread",
            IdentityProvider::IdPorten => "idporten",
            IdentityProvider::Maskinporten => "maskinporten",
            IdentityProvider::TokenX => "tokenx",
        }
    }

    /// Formats an audience into the target string this provider expects.
    ///
    /// Azure AD wants the scope form `api://{app}/.default`, so a
    /// cluster-style audience like `cluster:namespace:api` becomes
    /// `api://cluster.namespace.api/.default` (colon-to-dot substitution
    /// only). Audiences already prefixed with `api://` or `https://` are
    /// passed through unchanged, as is every audience for the other
    /// providers.
    pub fn format_target(&self, audience: &str) -> String {
        match self {
            IdentityProvider::AzureAd => {
                if audience.starts_with("api://") || audience.starts_with("https://") {
                    audience.to_owned()
                } else {
                    format!("api://{}/.default", audience.replace(':', "."))
                }
            }
            _ => audience.to_owned(),
        }
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Machine-to-machine token request (client credentials).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenRequest {
    /// Target audience or scope for the requested token
    pub target: String,
    /// Provider that should issue the token
    pub identity_provider: IdentityProvider,
}

/// On-behalf-of token exchange request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenExchangeRequest {
    /// Target audience or scope for the requested token
    pub target: String,
    /// Provider that should issue the token
    pub identity_provider: IdentityProvider,
    /// The end user's existing token to exchange
    pub user_token: String,
}

/// Token introspection request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenIntrospectionRequest {
    /// The token to validate
    pub token: String,
    /// Provider the token is expected to originate from
    pub identity_provider: IdentityProvider,
}

/// Successful token response from the token or exchange endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenSuccess {
    /// The issued access token
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// OAuth error body returned by the token service on a failed grant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenErrorResponse {
    /// OAuth error code, e.g. `invalid_scope`
    pub error: String,
    /// Human-readable description of the error
    pub error_description: String,
}

/// Outcome of a token or exchange call.
///
/// Exactly one variant applies: either the grant succeeded, or the token
/// service rejected it and the upstream status and error body are carried
/// verbatim for the caller to relay.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenResponse {
    Success(TokenSuccess),
    Error {
        error: TokenErrorResponse,
        status: http::StatusCode,
    },
}

/// Response from the token introspection endpoint.
///
/// An inactive token is a regular response, not an error. When `active` is
/// false the token must be treated as invalid regardless of any other
/// field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IntrospectionResponse {
    /// Whether the token is valid and active
    pub active: bool,
    /// Reason the token failed validation, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// All remaining claims from the provider, passed through untouched
    #[serde(flatten)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub claims: Map<String, Value>,
}
