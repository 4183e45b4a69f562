/// Player application error types
use story_server_client::ServerClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayerAppError>;

#[derive(Debug, Error)]
pub enum PlayerAppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Client(#[from] ServerClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] story_playback::PlaybackError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
