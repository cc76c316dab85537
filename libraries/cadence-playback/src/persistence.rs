//! Session persistence
//!
//! Saves the queue (both orders, position, recent history, modes) plus the
//! volume and shuffle/repeat preferences to a [`KeyValueStore`] as JSON, and
//! restores them on the next start.
//!
//! Restore policy:
//! - snapshots older than `max_age_hours` are ignored (left in the store)
//! - snapshots that fail to decode or violate the queue invariants are removed
//! - preferences never expire; corrupt ones are removed
//! - store failures are logged and treated as "nothing saved"

use crate::error::{PlaybackError, Result};
use crate::queue::QueueEngine;
use crate::types::{PersistenceConfig, PlaybackMode, QueueEntry, RepeatMode};
use crate::volume::Volume;
use cadence_core::{KeyValueStore, Track};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source of wall-clock time (milliseconds since the Unix epoch)
pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Persisted form of a queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Play order
    pub active_order: Vec<QueueEntry>,

    /// Pre-shuffle order
    pub original_order: Vec<QueueEntry>,

    /// Index of the current slot in `active_order`
    pub current_index: Option<usize>,

    /// Most recent history entries, oldest first
    pub history: Vec<Track>,

    /// Whether `active_order` is shuffled
    pub shuffled: bool,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// When the snapshot was taken
    pub saved_at_epoch_millis: i64,
}

impl QueueSnapshot {
    /// Capture `queue`, keeping at most `history_limit` history entries
    pub fn capture(queue: &QueueEngine, history_limit: usize, saved_at_epoch_millis: i64) -> Self {
        let mode = queue.mode();
        Self {
            active_order: queue.entries().to_vec(),
            original_order: queue.original_entries().to_vec(),
            current_index: queue.current_index(),
            history: queue.history().recent(history_limit),
            shuffled: mode.shuffled,
            repeat_mode: mode.repeat,
            saved_at_epoch_millis,
        }
    }

    /// Check the queue invariants
    ///
    /// Both orders must hold the same set of distinct slots and the current
    /// index must be in range.
    pub fn validate(&self) -> Result<()> {
        let len = self.active_order.len();

        if let Some(index) = self.current_index {
            if index >= len {
                return Err(PlaybackError::MalformedSnapshot(format!(
                    "current index {index} out of range for {len} tracks"
                )));
            }
        }

        if self.original_order.len() != len {
            return Err(PlaybackError::MalformedSnapshot(format!(
                "original order has {} tracks, active order has {}",
                self.original_order.len(),
                len
            )));
        }

        let active: HashSet<_> = self.active_order.iter().map(|e| e.slot).collect();
        if active.len() != len {
            return Err(PlaybackError::MalformedSnapshot(
                "duplicate slot in active order".to_string(),
            ));
        }

        let original: HashSet<_> = self.original_order.iter().map(|e| e.slot).collect();
        if original != active {
            return Err(PlaybackError::MalformedSnapshot(
                "original order is not a permutation of the active order".to_string(),
            ));
        }

        Ok(())
    }

    /// Milliseconds elapsed between saving and `now_millis`
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.saved_at_epoch_millis)
    }

    /// Rebuild the queue
    pub fn into_queue(self, history_size: usize) -> QueueEngine {
        QueueEngine::from_parts(
            self.active_order,
            self.original_order,
            self.current_index,
            self.history,
            PlaybackMode {
                shuffled: self.shuffled,
                repeat: self.repeat_mode,
            },
            history_size,
        )
    }
}

/// Persisted volume preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSettings {
    /// Volume level (0.0-1.0)
    pub level: f32,

    /// Mute state
    pub muted: bool,
}

impl From<Volume> for VolumeSettings {
    fn from(volume: Volume) -> Self {
        Self {
            level: volume.level(),
            muted: volume.is_muted(),
        }
    }
}

impl From<VolumeSettings> for Volume {
    fn from(settings: VolumeSettings) -> Self {
        Volume::with_muted(settings.level, settings.muted)
    }
}

/// Persisted shuffle and repeat preferences
///
/// Kept apart from the queue snapshot so they outlive an expired queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeSettings {
    /// Shuffle on or off
    pub shuffled: bool,

    /// Repeat mode
    pub repeat: RepeatMode,
}

impl From<PlaybackMode> for ModeSettings {
    fn from(mode: PlaybackMode) -> Self {
        Self {
            shuffled: mode.shuffled,
            repeat: mode.repeat,
        }
    }
}

impl From<ModeSettings> for PlaybackMode {
    fn from(settings: ModeSettings) -> Self {
        PlaybackMode {
            shuffled: settings.shuffled,
            repeat: settings.repeat,
        }
    }
}

/// Reads and writes session state in a key-value store
pub struct QueuePersistence<S> {
    store: S,
    config: PersistenceConfig,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> QueuePersistence<S> {
    /// Create a persistence adapter using the system clock
    pub fn new(store: S, config: PersistenceConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a persistence adapter with an explicit clock
    pub fn with_clock(store: S, config: PersistenceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persistence settings
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    fn max_age_millis(&self) -> i64 {
        i64::from(self.config.max_age_hours) * 60 * 60 * 1000
    }

    // ===== Queue =====

    /// Save `queue`, logging any failure
    pub fn snapshot(&self, queue: &QueueEngine) {
        if let Err(e) = self.try_snapshot(queue) {
            warn!("Failed to save queue snapshot: {}", e);
        }
    }

    /// Save `queue`
    pub fn try_snapshot(&self, queue: &QueueEngine) -> Result<()> {
        let snapshot = QueueSnapshot::capture(
            queue,
            self.config.persisted_history,
            self.clock.now_millis(),
        );
        let bytes = serde_json::to_vec(&snapshot)?;
        self.store.set(&self.config.queue_key, &bytes)?;
        debug!(
            "Saved queue snapshot: {} tracks, current {:?}",
            snapshot.active_order.len(),
            snapshot.current_index
        );
        Ok(())
    }

    /// Load the saved queue, if there is a fresh and valid one
    pub fn restore(&self) -> Option<QueueSnapshot> {
        match self.try_restore() {
            Ok(snapshot) => snapshot,
            Err(PlaybackError::StalePersistedState { age_ms }) => {
                debug!("Ignoring queue snapshot saved {} ms ago", age_ms);
                None
            }
            Err(e) => {
                warn!("Could not restore queue: {}", e);
                None
            }
        }
    }

    /// Load the saved queue
    ///
    /// Returns `Ok(None)` when nothing is saved, `StalePersistedState` for an
    /// expired snapshot and `MalformedSnapshot` (after removing it) for a
    /// corrupt one.
    pub fn try_restore(&self) -> Result<Option<QueueSnapshot>> {
        let Some(bytes) = self.store.get(&self.config.queue_key)? else {
            return Ok(None);
        };

        let snapshot = match serde_json::from_slice::<QueueSnapshot>(&bytes)
            .map_err(PlaybackError::from)
            .and_then(|s| s.validate().map(|()| s))
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.discard(&self.config.queue_key);
                return Err(e);
            }
        };

        let age_ms = snapshot.age_millis(self.clock.now_millis());
        if age_ms > self.max_age_millis() {
            return Err(PlaybackError::StalePersistedState { age_ms });
        }

        Ok(Some(snapshot))
    }

    /// Remove the saved queue
    pub fn clear(&self) {
        self.discard(&self.config.queue_key);
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Failed to remove {}: {}", key, e);
        }
    }

    // ===== Preferences =====

    /// Save volume preferences, logging any failure
    pub fn save_volume(&self, settings: VolumeSettings) {
        self.save_preference(&self.config.volume_key, &settings);
    }

    /// Load volume preferences, removing them if corrupt
    pub fn restore_volume(&self) -> Option<VolumeSettings> {
        self.restore_preference(&self.config.volume_key)
    }

    /// Save shuffle/repeat preferences, logging any failure
    pub fn save_mode(&self, settings: ModeSettings) {
        self.save_preference(&self.config.mode_key, &settings);
    }

    /// Load shuffle/repeat preferences, removing them if corrupt
    pub fn restore_mode(&self) -> Option<ModeSettings> {
        self.restore_preference(&self.config.mode_key)
    }

    fn save_preference<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_vec(value)
            .map_err(PlaybackError::from)
            .and_then(|bytes| self.store.set(key, &bytes).map_err(PlaybackError::from));
        if let Err(e) = result {
            warn!("Failed to save {}: {}", key, e);
        }
    }

    fn restore_preference<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key) {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!("Could not read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding malformed {}: {}", key, e);
                self.discard(key);
                None
            }
        }
    }
}

impl<S> std::fmt::Debug for QueuePersistence<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePersistence")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
