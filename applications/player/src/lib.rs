//! Story Player - terminal host
//!
//! Drives the playback controller from stdin commands, with a headless media
//! element standing in for audio output. Catalog, playtime reports and admin
//! statistics go through `story-server-client`.
//!
//! This library exposes the host components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod media;

pub use commands::{parse, Command};
pub use config::AppConfig;
pub use error::{PlayerAppError, Result};
pub use host::Host;
pub use media::HeadlessMedia;
