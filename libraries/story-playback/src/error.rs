//! Error types for the story player controller

use thiserror::Error;

/// Controller errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Theme is not part of the loaded catalog
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// No catalog loaded (or the catalog has no themes)
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Theme index outside the catalog
    #[error("Theme index out of bounds: {0}")]
    ThemeIndexOutOfBounds(usize),

    /// Operation needs a story loaded into the media source
    #[error("No story loaded")]
    NoStoryLoaded,

    /// Media primitive reported a failure
    #[error("Media error: {0}")]
    Media(String),
}

/// Result type for controller operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
