//! Main Story Player server client.

use crate::admin::AdminClient;
use crate::audio::AudioClient;
use crate::catalog::CatalogClient;
use crate::error::{Result, ServerClientError};
use crate::playtime::PlaytimeClient;
use crate::types::ServerConfig;
use reqwest::Client;
use std::time::Duration;

/// Client for the story backend.
///
/// Cheap to clone; the underlying connection pool is shared. Endpoint groups
/// are reached through borrowed sub-clients.
///
/// # Example
///
/// ```ignore
/// use story_server_client::{ServerConfig, StoryServerClient};
///
/// let client = StoryServerClient::new(ServerConfig::new("http://localhost:8000"))?;
/// let catalog = client.catalog().fetch_themes().await?;
/// println!("Found {} themes", catalog.len());
/// ```
#[derive(Debug, Clone)]
pub struct StoryServerClient {
    http: Client,
    base_url: String,
}

impl StoryServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;

        // Requests never hang forever
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("StoryPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self { http, base_url })
    }

    /// Get the normalized server URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Theme catalog endpoint.
    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient::new(&self.http, &self.base_url)
    }

    /// Audio stream endpoint.
    pub fn audio(&self) -> AudioClient<'_> {
        AudioClient::new(&self.http, &self.base_url)
    }

    /// Playtime collector endpoint.
    pub fn playtime(&self) -> PlaytimeClient<'_> {
        PlaytimeClient::new(&self.http, &self.base_url)
    }

    /// Admin login and statistics endpoints.
    pub fn admin(&self) -> AdminClient<'_> {
        AdminClient::new(&self.http, &self.base_url)
    }
}
