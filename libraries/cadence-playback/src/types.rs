//! Core types for playback management

use cadence_core::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one queue slot
///
/// Assigned when a track enters the queue and unique within that queue, so the
/// same track can occupy several slots and each slot keeps its identity across
/// shuffling and reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u64);

/// One slot of the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Slot identity
    pub slot: SlotId,

    /// Track occupying the slot
    pub track: Track,
}

/// Where `QueueEngine::add` inserts a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePosition {
    /// Append after the last slot
    End,

    /// Insert right after the current slot
    Next,

    /// Insert at an explicit index (clamped to the queue length)
    At(usize),
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }

    /// Next mode in the Off -> All -> One cycle
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shuffle and repeat settings of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackMode {
    /// Whether the play order is shuffled
    pub shuffled: bool,

    /// Repeat policy at the end of the queue
    pub repeat: RepeatMode,
}

/// Player state machine status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// No track loaded
    #[default]
    Idle,

    /// Media requested, not yet playable
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Device failed; a new load is required
    Errored,
}

impl PlayerStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary statistics of the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of slots
    pub total_tracks: usize,

    /// Sum of track durations in seconds
    pub total_duration_secs: u64,

    /// Distinct artist names
    pub unique_artists: usize,

    /// Distinct album titles (tracks without an album are not counted)
    pub unique_albums: usize,

    /// 1-based position of the current slot (0 when nothing is selected)
    pub current_position: usize,

    /// Slots after the current one
    pub remaining_tracks: usize,
}

/// Configuration for session persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Store key of the queue snapshot (default: "music_queue")
    pub queue_key: String,

    /// Store key of the volume preferences (default: "music_volume")
    pub volume_key: String,

    /// Store key of the shuffle/repeat preferences (default: "music_mode")
    pub mode_key: String,

    /// Snapshots older than this are ignored on restore (default: 24)
    pub max_age_hours: u32,

    /// Most recent history entries kept in a snapshot (default: 10)
    pub persisted_history: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            queue_key: "music_queue".to_string(),
            volume_key: "music_volume".to_string(),
            mode_key: "music_mode".to_string(),
            max_age_hours: 24,
            persisted_history: 10,
        }
    }
}

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Initial volume (0.0-1.0, default: 0.5)
    pub volume: f32,

    /// Initial mute state (default: false)
    pub muted: bool,

    /// Initial shuffle state (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Relative seek step in seconds (default: 10)
    pub seek_step_secs: f64,

    /// Volume step for up/down (default: 0.1)
    pub volume_step: f32,

    /// "Previous" restarts the current track past this position (default: 3)
    pub restart_threshold_secs: f64,

    /// Snapshot settings
    pub persistence: PersistenceConfig,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            volume: 0.5,
            muted: false,
            shuffle: false,
            repeat: RepeatMode::Off,
            seek_step_secs: 10.0,
            volume_step: 0.1,
            restart_threshold_secs: 3.0,
            persistence: PersistenceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 50);
        assert_eq!(config.volume, 0.5);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.persistence.max_age_hours, 24);
        assert_eq!(config.persistence.persisted_history, 10);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"history_size": 5, "repeat": "all"}"#).unwrap();
        assert_eq!(config.history_size, 5);
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.persistence.queue_key, "music_queue");
    }

    #[test]
    fn repeat_mode_parsing() {
        assert_eq!(RepeatMode::from_str("all"), Some(RepeatMode::All));
        assert_eq!(RepeatMode::from_str("one"), Some(RepeatMode::One));
        assert_eq!(RepeatMode::from_str("none"), None);
        assert_eq!(RepeatMode::One.to_string(), "one");
    }

    #[test]
    fn repeat_mode_cycles_through_all_values() {
        let mut mode = RepeatMode::Off;
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.cycled();
            seen.push(mode);
        }
        assert_eq!(seen, vec![RepeatMode::All, RepeatMode::One, RepeatMode::Off]);
    }
}
