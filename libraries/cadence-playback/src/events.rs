//! Player events
//!
//! Typed notifications for UI synchronization. Every subscriber gets its own
//! unbounded channel; events are published in the order the player produced
//! them:
//! - Status changes (loading/playing/paused/idle/errored)
//! - Track changes
//! - Position and duration updates from the device
//! - Volume, queue and error notifications

use crate::types::PlayerStatus;
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Player status changed
    StatusChanged {
        /// The new status
        status: PlayerStatus,
    },

    /// A different track was loaded
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previously loaded track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position or duration reported by the device
    PositionChanged {
        /// Current position in seconds
        position_secs: f64,
        /// Media duration in seconds, once known
        duration_secs: Option<f64>,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Queue contents, order or mode changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Playback reached the end of the queue
    QueueExhausted,

    /// A load or device failure
    Error {
        /// Error message
        message: String,
    },
}

/// Fan-out of player events to any number of subscribers
///
/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<PlayerEvent>>,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> UnboundedReceiver<PlayerEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber
    pub fn publish(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers (as of the last publish)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
