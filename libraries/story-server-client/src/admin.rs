//! Admin endpoints (HTTP Basic auth).

use crate::error::{Result, ServerClientError};
use crate::types::{PlaytimeStats, StatsPeriod};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Admin client for the story backend.
///
/// Takes a ready-made `Authorization` header value so a cached header can be
/// reused without knowing the password.
pub struct AdminClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AdminClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Check the credentials against the login endpoint.
    ///
    /// Any 2xx accepts the credentials; every other status rejects them.
    pub async fn login(&self, auth_header: &str) -> Result<()> {
        let url = format!("{}/api/admin/login", self.base_url);
        debug!(url = %url, "Attempting admin login");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            info!("Admin login successful");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Admin login rejected");
            Err(ServerClientError::AuthFailed(format!(
                "Login rejected with status {}",
                status.as_u16()
            )))
        }
    }

    /// Fetch playtime statistics for a period.
    pub async fn stats(&self, period: StatsPeriod, auth_header: &str) -> Result<PlaytimeStats> {
        let url = format!("{}/api/admin/stats/{}", self.base_url, period);
        debug!(url = %url, period = %period, "Fetching playtime stats");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let stats: PlaytimeStats = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse stats: {}", e))
            })?;

            debug!(
                total_seconds = stats.total_seconds,
                buckets = stats.daily_data.len(),
                themes = stats.theme_stats.len(),
                "Fetched playtime stats"
            );

            Ok(stats)
        } else if status.as_u16() == 401 {
            Err(ServerClientError::AuthRequired)
        } else {
            Err(ServerClientError::from_response(response).await)
        }
    }
}
