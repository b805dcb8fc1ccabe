pub(crate) use crate::config::texas::TexasConfig;
pub(crate) use crate::config::token_generator::TokenGeneratorConfig;
use config::{Config as ConfigCrate, ConfigError};
use serde::Deserialize;
use texas_client::IdentityProvider;

pub mod texas;
pub mod token_generator;

/// How unauthenticated requests on gated routes are answered
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeMode {
    /// Redirect the caller to the login endpoint (browser-facing flows)
    Redirect,
    /// Plain 401 (API-only deployments)
    Unauthorized,
}

/// Main configuration structure for the gate server
#[derive(Debug, Deserialize, Clone)]
pub struct GateConfig {
    /// The port the server will listen to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public ingress URL used to build login redirects; when empty the
    /// request's own scheme and host are used instead
    #[serde(default)]
    pub ingress: String,

    /// Identity provider all token operations are performed against
    #[serde(default = "default_identity_provider")]
    pub identity_provider: IdentityProvider,

    /// Challenge policy for unauthenticated requests (default: redirect)
    #[serde(default = "default_challenge")]
    pub challenge: ChallengeMode,

    /// Fallback audience for the introspection diagnostic route
    #[serde(default = "default_target")]
    pub default_target: String,

    /// Token service configuration
    #[serde(default)]
    pub texas: TexasConfig,

    /// Synthetic end-user token issuer configuration
    #[serde(default)]
    pub token_generator: TokenGeneratorConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            ingress: String::new(),
            identity_provider: default_identity_provider(),
            challenge: default_challenge(),
            default_target: default_target(),
            texas: TexasConfig::default(),
            token_generator: TokenGeneratorConfig::default(),
        }
    }
}

impl GateConfig {
    /// Creates a new config instance from environment variables
    pub fn new() -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("GATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(
        texas_mock: &wiremock::MockServer,
        token_generator_mock: &wiremock::MockServer,
    ) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            ingress: "https://wonderwall.local".to_string(),
            identity_provider: IdentityProvider::AzureAd,
            challenge: ChallengeMode::Redirect,
            default_target: "nav:test/api".to_string(),
            // Use the mock server addresses for testing
            texas: TexasConfig {
                token_endpoint: format!("{}/token", texas_mock.uri()),
                token_exchange_endpoint: format!("{}/token/exchange", texas_mock.uri()),
                token_introspection_endpoint: format!("{}/token/introspect", texas_mock.uri()),
                client_timeout: 5,
            },
            token_generator: TokenGeneratorConfig {
                url: format!("{}/fake", token_generator_mock.uri()),
            },
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_identity_provider() -> IdentityProvider {
    IdentityProvider::AzureAd
}

fn default_challenge() -> ChallengeMode {
    ChallengeMode::Redirect
}

fn default_target() -> String {
    "nav:test/api".to_string()
}
