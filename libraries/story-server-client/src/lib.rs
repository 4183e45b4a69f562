//! Story Player Server Client
//!
//! HTTP client library for the story backend.
//!
//! # Features
//!
//! - **Catalog**: Fetch the theme → stories mapping
//! - **Audio**: Stream or download a story's audio
//! - **Playtime**: Fire-and-forget listening reports
//! - **Admin**: Basic-auth login, cached credentials, playtime statistics
//!
//! # Example
//!
//! ```ignore
//! use story_server_client::{ServerConfig, StoryServerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StoryServerClient::new(ServerConfig::new("http://localhost:8000"))?;
//!
//!     let catalog = client.catalog().fetch_themes().await?;
//!     for theme in catalog.theme_names() {
//!         println!("{}", theme);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod admin;
mod audio;
mod catalog;
mod client;
mod error;
mod playtime;
mod session;
mod stats_view;
mod types;

// Re-export main types
pub use client::StoryServerClient;
pub use error::{Result, ServerClientError};
pub use types::{Credentials, DownloadProgress, PlaytimeStats, ServerConfig, StatsPeriod, ThemeStat};

// Re-export sub-clients for direct use if needed
pub use admin::AdminClient;
pub use audio::AudioClient;
pub use catalog::CatalogClient;
pub use playtime::{PlaytimeClient, PlaytimeReporter};

pub use session::{AdminSession, CredentialStore, FileCredentialStore, LoginError, CREDENTIAL_KEY};
pub use stats_view::{
    bucket_label, round_minutes, tooltip_label, ChartPoint, RankedTheme, StatsView,
    NO_DATA_PLACEHOLDER,
};
