//! Story audio streams.

use crate::error::{Result, ServerClientError};
use crate::types::DownloadProgress;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use story_playback::audio_path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Audio client for the story backend.
pub struct AudioClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AudioClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Absolute URL of a story's audio stream.
    pub fn audio_url(&self, theme: &str, title: &str) -> String {
        format!("{}{}", self.base_url, audio_path(theme, title))
    }

    /// Open the audio stream of a story.
    ///
    /// Yields the body in chunks as they arrive.
    pub async fn open_stream(
        &self,
        theme: &str,
        title: &str,
    ) -> Result<BoxStream<'static, Result<Vec<u8>>>> {
        let response = self.get(theme, title).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ServerClientError::Request))
            .boxed())
    }

    /// Download a story to a file.
    ///
    /// # Arguments
    /// * `theme`, `title` - Story to fetch
    /// * `dest_path` - Where to save the file
    /// * `progress_callback` - Called after every chunk
    ///
    /// # Returns
    /// Number of bytes written.
    pub async fn download_story<F>(
        &self,
        theme: &str,
        title: &str,
        dest_path: &Path,
        mut progress_callback: F,
    ) -> Result<u64>
    where
        F: FnMut(DownloadProgress),
    {
        let response = self.get(theme, title).await?;

        // Get content length if available
        let total_size = response.content_length();

        // Create parent directories if needed
        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest_path).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            let progress = total_size
                .filter(|total| *total > 0)
                .map(|total| downloaded as f32 / total as f32)
                .unwrap_or(0.0);

            progress_callback(DownloadProgress {
                theme: theme.to_string(),
                title: title.to_string(),
                bytes_received: downloaded,
                bytes_total: total_size,
                progress,
            });
        }

        file.flush().await?;

        info!(
            theme = %theme,
            title = %title,
            dest = %dest_path.display(),
            size = downloaded,
            "Story downloaded"
        );

        Ok(downloaded)
    }

    async fn get(&self, theme: &str, title: &str) -> Result<reqwest::Response> {
        let url = self.audio_url(theme, title);
        debug!(url = %url, "Requesting audio");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ServerClientError::ServerError {
                status: 404,
                message: format!("Story not found: {}/{}", theme, title),
            });
        }
        if !status.is_success() {
            return Err(ServerClientError::from_response(response).await);
        }

        Ok(response)
    }
}
