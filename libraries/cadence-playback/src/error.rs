//! Error types for playback management

use cadence_core::{CoreError, TrackId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The device could not load the media (missing/invalid locator or network failure)
    #[error("Failed to load track {track_id}: {reason}")]
    LoadFailure { track_id: TrackId, reason: String },

    /// The device failed mid-stream
    #[error("Playback device error on track {track_id}: {cause}")]
    DeviceError { track_id: TrackId, cause: String },

    /// A persisted snapshot was older than the staleness window
    #[error("Persisted state is stale ({age_ms} ms old)")]
    StalePersistedState { age_ms: i64 },

    /// A persisted snapshot could not be decoded or violated queue invariants
    #[error("Malformed persisted state: {0}")]
    MalformedSnapshot(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Collaborator (track source, store, device) error
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PlaybackError {
    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedSnapshot(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
