/// CLI error types
use cadence_core::CoreError;
use cadence_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Library error: {0}")]
    Library(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
