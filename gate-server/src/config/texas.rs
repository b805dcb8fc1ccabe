use serde::Deserialize;
use texas_client::TexasEndpoints;

/// Configuration for the Texas token service sidecar
#[derive(Debug, Deserialize, Clone)]
pub struct TexasConfig {
    /// URL of the machine-to-machine token endpoint
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// URL of the on-behalf-of token exchange endpoint
    #[serde(default = "default_token_exchange_endpoint")]
    pub token_exchange_endpoint: String,

    /// URL of the token introspection endpoint
    #[serde(default = "default_token_introspection_endpoint")]
    pub token_introspection_endpoint: String,

    /// The timeout for token service calls in seconds (default: 5)
    #[serde(default = "default_client_timeout")]
    pub client_timeout: u64,
}

impl Default for TexasConfig {
    fn default() -> Self {
        Self {
            token_endpoint: default_token_endpoint(),
            token_exchange_endpoint: default_token_exchange_endpoint(),
            token_introspection_endpoint: default_token_introspection_endpoint(),
            client_timeout: default_client_timeout(),
        }
    }
}

impl TexasConfig {
    /// Endpoint set in the form the token service client expects
    pub fn endpoints(&self) -> TexasEndpoints {
        TexasEndpoints {
            token_endpoint: self.token_endpoint.clone(),
            token_exchange_endpoint: self.token_exchange_endpoint.clone(),
            token_introspection_endpoint: self.token_introspection_endpoint.clone(),
        }
    }
}

fn default_token_endpoint() -> String {
    "http://localhost:3000/api/v1/token".to_string()
}

fn default_token_exchange_endpoint() -> String {
    "http://localhost:3000/api/v1/token/exchange".to_string()
}

fn default_token_introspection_endpoint() -> String {
    "http://localhost:3000/api/v1/introspect".to_string()
}

fn default_client_timeout() -> u64 {
    5
}
