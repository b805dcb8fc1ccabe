use crate::config::GateConfig;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use texas_client::TexasClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GateConfig>,
    pub texas: Arc<TexasClient>,
    pub http_client: Arc<Client>,
}

impl AppState {
    pub fn new(config: &GateConfig) -> Result<Self, std::io::Error> {
        let texas = TexasClient::new(
            config.texas.endpoints(),
            config.identity_provider,
            config.texas.client_timeout,
        )
        .map_err(|e| std::io::Error::other(format!("Failed to create token service client: {e}")))?;

        let http_client = Self::create_http_client(config.texas.client_timeout)
            .map_err(|e| std::io::Error::other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config.clone()),
            texas: Arc::new(texas),
            http_client: Arc::new(http_client),
        })
    }

    /// General-purpose outbound client, currently only used to reach the
    /// synthetic token generator
    fn create_http_client(timeout: u64) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(2))
            // Keep a small pool of warm connections around
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
    }
}
