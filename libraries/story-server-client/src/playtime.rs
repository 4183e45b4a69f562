//! Playtime reporting.

use crate::client::StoryServerClient;
use crate::error::{Result, ServerClientError};
use reqwest::Client;
use story_playback::PlaytimeReport;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Playtime collector client.
pub struct PlaytimeClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> PlaytimeClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Send one report: `POST /api/track-playtime` with `{theme, title, duration}`.
    pub async fn track_playtime(&self, report: &PlaytimeReport) -> Result<()> {
        let url = format!("{}/api/track-playtime", self.base_url);
        debug!(
            url = %url,
            theme = %report.theme,
            title = %report.title,
            duration = report.duration,
            "Reporting playtime"
        );

        let response = self
            .http
            .post(&url)
            .json(report)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ServerClientError::from_response(response).await)
        }
    }
}

/// Fire-and-forget playtime sender.
///
/// Each report runs on its own task; failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct PlaytimeReporter {
    client: StoryServerClient,
}

impl PlaytimeReporter {
    pub fn new(client: StoryServerClient) -> Self {
        Self { client }
    }

    /// Send a report in the background.
    ///
    /// Must be called from within a tokio runtime. The handle may be dropped.
    pub fn report(&self, report: PlaytimeReport) -> JoinHandle<()> {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.playtime().track_playtime(&report).await {
                warn!(
                    error = %e,
                    theme = %report.theme,
                    title = %report.title,
                    duration = report.duration,
                    "Failed to report playtime"
                );
            }
        })
    }
}
