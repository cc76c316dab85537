//! Cadence - Playback Management
//!
//! Platform-agnostic playback queue and player state machine for Cadence.
//!
//! This crate provides:
//! - Queue engine with original/active order, shuffle and repeat (Off, All, One)
//! - Playback history (bounded, feeds "previous")
//! - Player state machine driving a `PlaybackDevice` with load supersession
//! - Volume control (0.0-1.0, mute/unmute)
//! - Session persistence with staleness and corruption handling
//! - A `Session` composition root wiring it all to a `TrackSource`
//!
//! # Architecture
//!
//! `cadence-playback` knows nothing about audio decoding, HTTP or files:
//! devices, track sources, stores and notification sinks are provided via the
//! traits in `cadence-core`.
//!
//! # Example: Queue Navigation
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::{QueueEngine, RepeatMode};
//!
//! let mut queue = QueueEngine::default();
//! queue.set_queue(
//!     vec![
//!         Track::new("a", "So What", "Miles Davis"),
//!         Track::new("b", "Freddie Freeloader", "Miles Davis"),
//!     ],
//!     0,
//! );
//!
//! assert_eq!(queue.advance().unwrap().id.as_str(), "b");
//! assert!(queue.advance().is_none());
//!
//! queue.set_repeat_mode(RepeatMode::All);
//! assert_eq!(queue.advance().unwrap().id.as_str(), "a");
//! ```
//!
//! # Example: Driving a Device
//!
//! ```rust
//! use cadence_core::{
//!     DeviceEvent, LoadRequest, PlaybackDevice, Result, Track, TracingNotifier,
//! };
//! use cadence_playback::{PlaybackConfig, Player, PlayerStatus};
//! use std::sync::Arc;
//!
//! struct SilentDevice;
//!
//! impl PlaybackDevice for SilentDevice {
//!     fn load(&mut self, _request: &LoadRequest) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position_secs: f64) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! let mut player = Player::new(
//!     &PlaybackConfig::default(),
//!     Box::new(SilentDevice),
//!     Arc::new(TracingNotifier),
//! );
//!
//! let track = Track::new("a", "So What", "Miles Davis").with_media_locator("/music/a.mp3");
//! player.edit_queue(|queue| queue.set_queue(vec![track], 0));
//! player.play_current().unwrap();
//! assert_eq!(player.status(), PlayerStatus::Loading);
//!
//! // The host feeds device callbacks back with the load token
//! let token = player.load_token();
//! player.handle_device_event(token, DeviceEvent::CanPlay);
//! assert_eq!(player.status(), PlayerStatus::Playing);
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod events;
mod history;
pub mod persistence;
mod player;
mod queue;
mod session;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{EventBus, PlayerEvent};
pub use history::History;
pub use persistence::{
    Clock, ModeSettings, QueuePersistence, QueueSnapshot, SystemClock, VolumeSettings,
};
pub use player::Player;
pub use queue::QueueEngine;
pub use session::Session;
pub use shuffle::shuffle_around;
pub use types::{
    PersistenceConfig, PlaybackConfig, PlaybackMode, PlayerStatus, QueueEntry, QueuePosition,
    QueueStats, RepeatMode, SlotId,
};
pub use volume::Volume;
