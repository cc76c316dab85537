//! Playback session
//!
//! Composition root tying a [`Player`] to a [`TrackSource`], a notification
//! sink and [`QueuePersistence`]. Construction restores the previous session;
//! every queue-changing operation saves a fresh snapshot afterwards.

use crate::error::Result;
use crate::events::PlayerEvent;
use crate::persistence::{ModeSettings, QueuePersistence, VolumeSettings};
use crate::player::Player;
use crate::queue::QueueEngine;
use crate::types::{PlaybackConfig, PlayerStatus, QueuePosition, RepeatMode};
use cadence_core::{
    DeviceEvent, KeyValueStore, LoadToken, NotificationSink, PlaybackDevice, Severity, Track,
    TrackFilter, TrackId, TrackSource,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// A restored-or-fresh playback session
pub struct Session<S> {
    player: Player,
    persistence: QueuePersistence<S>,
    source: Arc<dyn TrackSource>,
    notifier: Arc<dyn NotificationSink>,
}

impl<S: KeyValueStore> Session<S> {
    /// Build a session, restoring the saved queue and volume when available
    ///
    /// A stale or malformed snapshot yields an empty queue using the saved
    /// shuffle/repeat preferences, or the configured defaults without them.
    pub fn new(
        config: &PlaybackConfig,
        device: Box<dyn PlaybackDevice>,
        source: Arc<dyn TrackSource>,
        notifier: Arc<dyn NotificationSink>,
        persistence: QueuePersistence<S>,
    ) -> Self {
        let mut config = config.clone();
        if let Some(settings) = persistence.restore_volume() {
            config.volume = settings.level;
            config.muted = settings.muted;
        }
        if let Some(mode) = persistence.restore_mode() {
            config.shuffle = mode.shuffled;
            config.repeat = mode.repeat;
        }

        let queue = match persistence.restore() {
            Some(snapshot) => {
                info!(
                    "Restored queue: {} tracks, current {:?}",
                    snapshot.active_order.len(),
                    snapshot.current_index
                );
                snapshot.into_queue(config.history_size)
            }
            None => QueueEngine::from_config(&config),
        };

        let player = Player::with_queue(&config, queue, device, Arc::clone(&notifier));

        Self {
            player,
            persistence,
            source,
            notifier,
        }
    }

    /// Register an event subscriber
    pub fn subscribe(&mut self) -> UnboundedReceiver<PlayerEvent> {
        self.player.subscribe()
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, for transport and volume control that needs no saving
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The queue
    pub fn queue(&self) -> &QueueEngine {
        self.player.queue()
    }

    /// The persistence adapter
    pub fn persistence(&self) -> &QueuePersistence<S> {
        &self.persistence
    }

    /// Save queue and preferences now
    pub fn save(&self) {
        self.persistence.snapshot(self.player.queue());
        self.persistence
            .save_volume(VolumeSettings::from(self.player.volume()));
        self.save_mode();
    }

    fn save_mode(&self) {
        self.persistence
            .save_mode(ModeSettings::from(self.player.queue().mode()));
    }

    fn snapshot(&self) {
        self.persistence.snapshot(self.player.queue());
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }

    // ===== Loading =====

    /// Append `track` to the queue and play it
    pub fn play_track(&mut self, track: Track) -> Result<()> {
        let index = self
            .player
            .edit_queue(|queue| queue.add(track, QueuePosition::End));
        let result = self.player.play_index(index);
        self.snapshot();
        result
    }

    /// Replace the queue with `tracks` and play from `start_index`
    pub fn play_list(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            self.player.stop();
            self.player.edit_queue(QueueEngine::clear);
            self.snapshot();
            return Ok(());
        }

        self.player
            .edit_queue(|queue| queue.set_queue(tracks, start_index));
        let result = self.player.play_current();
        self.snapshot();
        result
    }

    /// Fetch a track from the source and play it
    pub async fn play_track_by_id(&mut self, id: &TrackId) -> Result<()> {
        let track = match self.source.fetch_track_by_id(id).await {
            Ok(track) => track,
            Err(e) => {
                warn!("Failed to fetch track {}: {}", id, e);
                self.notify("Could not load track", Severity::Error);
                return Err(e.into());
            }
        };
        self.play_track(track)
    }

    /// Replace the queue with every source track matching `filter` and play
    /// from `start_index`
    ///
    /// Returns the number of queued tracks.
    pub async fn play_from_source(
        &mut self,
        filter: &TrackFilter,
        start_index: usize,
    ) -> Result<usize> {
        let tracks = match self.source.fetch_tracks(filter).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("Failed to fetch tracks: {}", e);
                self.notify("Could not load tracks", Severity::Error);
                return Err(e.into());
            }
        };

        if tracks.is_empty() {
            self.notify("No tracks found", Severity::Warning);
            return Ok(0);
        }

        let count = tracks.len();
        self.play_list(tracks, start_index)?;
        Ok(count)
    }

    // ===== Queue Operations =====

    /// Insert a track into the queue
    pub fn add(&mut self, track: Track, position: QueuePosition) -> usize {
        let message = format!("Added \"{}\" to queue", track.title);
        let index = self.player.edit_queue(|queue| queue.add(track, position));
        self.snapshot();
        self.notify(&message, Severity::Success);
        index
    }

    /// Insert several tracks into the queue
    pub fn add_many(&mut self, tracks: Vec<Track>, position: QueuePosition) {
        if tracks.is_empty() {
            return;
        }
        let message = format!("Added {} tracks to queue", tracks.len());
        self.player
            .edit_queue(|queue| queue.add_many(tracks, position));
        self.snapshot();
        self.notify(&message, Severity::Success);
    }

    /// Remove the slot at `index`
    ///
    /// Removing the playing slot moves playback to the track that takes its
    /// place, or stops when the queue runs empty.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        let was_current = self.player.queue().current_index() == Some(index);
        let removed = self.player.edit_queue(|queue| queue.remove(index))?;

        let active = matches!(
            self.player.status(),
            PlayerStatus::Loading | PlayerStatus::Playing | PlayerStatus::Paused
        );
        if was_current && active {
            if self.player.queue().current().is_some() {
                // Failures are surfaced by the player
                let _ = self.player.play_current();
            } else {
                self.player.stop();
            }
        }

        self.snapshot();
        self.notify(
            &format!("Removed \"{}\" from queue", removed.title),
            Severity::Info,
        );
        Some(removed)
    }

    /// Move the slot at `from` to `to`
    pub fn move_track(&mut self, from: usize, to: usize) {
        self.player.edit_queue(|queue| queue.move_track(from, to));
        self.snapshot();
    }

    /// Stop playback and empty the queue
    pub fn clear(&mut self) {
        self.player.stop();
        self.player.edit_queue(QueueEngine::clear);
        self.snapshot();
        self.notify("Queue cleared", Severity::Info);
    }

    /// Flip shuffle and return the new state
    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffled = self.player.edit_queue(QueueEngine::toggle_shuffle);
        self.snapshot();
        self.save_mode();
        self.notify(
            if shuffled {
                "Shuffle enabled"
            } else {
                "Shuffle disabled"
            },
            Severity::Info,
        );
        shuffled
    }

    /// Set repeat mode
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.player
            .edit_queue(|queue| queue.set_repeat_mode(mode));
        self.snapshot();
        self.save_mode();
        self.notify_repeat(mode);
    }

    /// Set repeat mode by name; unknown names are ignored
    pub fn set_repeat_mode_named(&mut self, name: &str) -> bool {
        match RepeatMode::from_str(name) {
            Some(mode) => {
                self.set_repeat_mode(mode);
                true
            }
            None => {
                warn!("Unknown repeat mode {:?}", name);
                false
            }
        }
    }

    /// Advance repeat mode Off -> All -> One -> Off
    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        let mode = self.player.edit_queue(QueueEngine::cycle_repeat_mode);
        self.snapshot();
        self.save_mode();
        self.notify_repeat(mode);
        mode
    }

    fn notify_repeat(&self, mode: RepeatMode) {
        let message = match mode {
            RepeatMode::Off => "Repeat disabled".to_string(),
            mode => format!("Repeat set to {mode}"),
        };
        self.notify(&message, Severity::Info);
    }

    // ===== Transport =====

    /// Play the slot at `index`
    ///
    /// Returns `Ok(false)` and changes nothing when `index` is out of range.
    pub fn jump(&mut self, index: usize) -> Result<bool> {
        if index >= self.player.queue().len() {
            debug!(
                "Ignoring jump to {} ({} tracks)",
                index,
                self.player.queue().len()
            );
            return Ok(false);
        }
        let result = self.player.play_index(index);
        self.snapshot();
        result.map(|()| true)
    }

    /// Skip to the next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let result = self.player.next();
        self.snapshot();
        result
    }

    /// Go to the previous track (or restart the current one)
    pub fn previous(&mut self) -> Result<()> {
        let result = self.player.previous();
        self.snapshot();
        result
    }

    /// Feed a device callback to the player
    ///
    /// The queue is saved after `Ended`, which may have advanced it.
    pub fn handle_device_event(&mut self, token: LoadToken, event: DeviceEvent) {
        let ended = event == DeviceEvent::Ended;
        self.player.handle_device_event(token, event);
        if ended {
            self.snapshot();
        }
    }

    // ===== Volume =====

    /// Set volume and remember it
    pub fn set_volume(&mut self, level: f32) {
        self.player.set_volume(level);
        self.save_volume();
    }

    /// Raise volume by one step and remember it
    pub fn volume_up(&mut self) {
        self.player.volume_up();
        self.save_volume();
    }

    /// Lower volume by one step and remember it
    pub fn volume_down(&mut self) {
        self.player.volume_down();
        self.save_volume();
    }

    /// Toggle mute and remember it
    pub fn toggle_mute(&mut self) {
        self.player.toggle_mute();
        self.save_volume();
    }

    fn save_volume(&self) {
        self.persistence
            .save_volume(VolumeSettings::from(self.player.volume()));
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("player", &self.player)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}
