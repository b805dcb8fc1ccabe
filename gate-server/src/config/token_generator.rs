use serde::Deserialize;

/// Configuration for the synthetic end-user token issuer used by the
/// public on-behalf-of route
#[derive(Debug, Deserialize, Clone)]
pub struct TokenGeneratorConfig {
    /// Base URL of the token generator
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for TokenGeneratorConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl TokenGeneratorConfig {
    /// URL issuing synthetic ID-porten end-user tokens
    pub fn idporten_url(&self) -> String {
        format!("{}/idporten", self.url.trim_end_matches('/'))
    }
}

fn default_url() -> String {
    "https://fakedings.intern.nav.no/fake".to_string()
}
