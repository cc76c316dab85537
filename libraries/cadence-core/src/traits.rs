/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::{LoadRequest, Severity, Track, TrackFilter, TrackId};
use async_trait::async_trait;
use std::sync::Arc;

/// Track source trait
///
/// Supplies track metadata, typically from a remote catalogue. Calls are
/// asynchronous; the playback core never blocks waiting on them.
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Fetch a single track by ID
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` when the track does not exist
    async fn fetch_track_by_id(&self, id: &TrackId) -> Result<Track>;

    /// Fetch every track passing the filter, in catalogue order
    async fn fetch_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>>;
}

/// Playback device trait
///
/// A single audio output sink. Commands are fire-and-forget from the
/// caller's perspective; outcomes arrive later as `DeviceEvent`s tagged with
/// the `LoadToken` of the request that produced them.
pub trait PlaybackDevice {
    /// Start loading new media, replacing whatever was loaded
    ///
    /// # Errors
    /// Returns an error if the request is rejected synchronously
    fn load(&mut self, request: &LoadRequest) -> Result<()>;

    /// Start or resume playback of the loaded media
    ///
    /// # Errors
    /// Returns an error if the device refuses to play
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Move the playback position (seconds from start)
    fn seek(&mut self, position_secs: f64);

    /// Set the output volume (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, volume: f32);

    /// Mute or unmute the output
    fn set_muted(&mut self, muted: bool);
}

/// Key-value store trait
///
/// Byte-oriented persistence used for session snapshots.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete the value stored under `key` (no error if absent)
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// User notification sink
///
/// Fire-and-forget: the core never awaits or inspects delivery.
pub trait NotificationSink: Send + Sync {
    /// Show a message to the user
    fn notify(&self, message: &str, severity: Severity);
}

/// Notification sink that writes messages to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "cadence::notify", "{}", message),
            Severity::Warning => tracing::warn!(target: "cadence::notify", "{}", message),
            Severity::Info | Severity::Success => {
                tracing::info!(target: "cadence::notify", "{}", message);
            }
        }
    }
}
