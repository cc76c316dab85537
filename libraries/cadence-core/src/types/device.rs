/// Playback device request and callback types
use super::ids::LoadToken;
use serde::{Deserialize, Serialize};

/// A request for the device to load new media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Token identifying this load; echoed back with every device event
    pub token: LoadToken,

    /// Playable media locator (URL or path)
    pub locator: String,
}

/// Asynchronous callbacks emitted by a playback device
///
/// Expected relative order for one load:
/// `LoadedMetadata` -> `CanPlay` -> `TimeUpdate`* -> `Ended`.
/// `Error` may arrive at any point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Media metadata is available
    LoadedMetadata {
        /// Media duration in seconds
        duration_secs: f64,
    },

    /// Enough media is buffered to start playback
    CanPlay,

    /// Playback position moved
    TimeUpdate {
        /// Current position in seconds
        position_secs: f64,
    },

    /// Media played to its end
    Ended,

    /// The device failed to load or play the media
    Error {
        /// Device-provided description
        cause: String,
    },
}
