//! Theme catalog fetch.

use crate::error::{Result, ServerClientError};
use reqwest::Client;
use story_playback::ThemeCatalog;
use tracing::{debug, info};

/// Catalog client for the story backend.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Fetch the full theme → stories mapping.
    ///
    /// Theme order is kept as sent by the server. Any transport error,
    /// non-success status or malformed body is an error; there is no
    /// partial catalog.
    pub async fn fetch_themes(&self) -> Result<ThemeCatalog> {
        let url = format!("{}/api/themes", self.base_url);
        debug!(url = %url, "Fetching themes");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        if !response.status().is_success() {
            return Err(ServerClientError::from_response(response).await);
        }

        let catalog: ThemeCatalog = response.json().await.map_err(|e| {
            ServerClientError::ParseError(format!("Failed to parse themes: {}", e))
        })?;

        info!(
            themes = catalog.len(),
            stories = catalog.story_count(),
            "Fetched themes"
        );

        Ok(catalog)
    }
}
