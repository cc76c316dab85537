//! Player state machine
//!
//! Drives a single [`PlaybackDevice`] from the queue:
//!
//! ```text
//! Idle -> Loading -> Playing <-> Paused
//!            \          |
//!             +---> Errored  (left only by loading a track)
//! ```
//!
//! Device callbacks are fed back through [`Player::handle_device_event`]
//! together with the [`LoadToken`] of the load that produced them. Only the
//! latest token is honoured, so a rapid `play(A)`, `play(B)` can never end up
//! playing A.

use crate::error::{PlaybackError, Result};
use crate::events::{EventBus, PlayerEvent};
use crate::queue::QueueEngine;
use crate::types::{PlaybackConfig, PlayerStatus};
use crate::volume::Volume;
use cadence_core::{
    DeviceEvent, LoadRequest, LoadToken, NotificationSink, PlaybackDevice, Severity, Track,
    TrackId,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Playback controller owning the queue, the device and the volume
pub struct Player {
    queue: QueueEngine,
    device: Box<dyn PlaybackDevice>,
    notifier: Arc<dyn NotificationSink>,
    events: EventBus,
    volume: Volume,
    status: PlayerStatus,

    /// Track handed to the device by the latest load
    loaded: Option<Track>,

    /// Latest issued (or retired) load token
    token: LoadToken,

    position_secs: f64,
    duration_secs: Option<f64>,

    seek_step_secs: f64,
    volume_step: f32,
    restart_threshold_secs: f64,
}

impl Player {
    /// Create an idle player with an empty queue
    ///
    /// The configured volume and mute state are pushed to the device.
    pub fn new(
        config: &PlaybackConfig,
        device: Box<dyn PlaybackDevice>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_queue(config, QueueEngine::from_config(config), device, notifier)
    }

    /// Create an idle player around an existing queue
    pub fn with_queue(
        config: &PlaybackConfig,
        queue: QueueEngine,
        mut device: Box<dyn PlaybackDevice>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let volume = Volume::with_muted(config.volume, config.muted);
        device.set_volume(volume.level());
        device.set_muted(volume.is_muted());

        Self {
            queue,
            device,
            notifier,
            events: EventBus::new(),
            volume,
            status: PlayerStatus::Idle,
            loaded: None,
            token: LoadToken::INITIAL,
            position_secs: 0.0,
            duration_secs: None,
            seek_step_secs: config.seek_step_secs,
            volume_step: config.volume_step,
            restart_threshold_secs: config.restart_threshold_secs,
        }
    }

    /// Register an event subscriber
    pub fn subscribe(&mut self) -> UnboundedReceiver<PlayerEvent> {
        self.events.subscribe()
    }

    // ===== Playback Control =====

    /// Play `track`
    ///
    /// A different track (or any track while idle or errored) is loaded under
    /// a fresh token. The same track resumes when paused and is left alone
    /// while loading or playing.
    pub fn play(&mut self, track: &Track) -> Result<()> {
        let same_track = self.loaded.as_ref().is_some_and(|t| t.id == track.id);

        match self.status {
            PlayerStatus::Paused if same_track => {
                if let Err(e) = self.device.play() {
                    return Err(self.fail(PlaybackError::DeviceError {
                        track_id: track.id.clone(),
                        cause: e.to_string(),
                    }));
                }
                self.set_status(PlayerStatus::Playing);
                Ok(())
            }
            PlayerStatus::Loading | PlayerStatus::Playing if same_track => Ok(()),
            _ => self.load(track.clone()),
        }
    }

    /// Pause playback (only from `Playing`)
    pub fn pause(&mut self) {
        if self.status == PlayerStatus::Playing {
            self.device.pause();
            self.set_status(PlayerStatus::Paused);
        }
    }

    /// Pause when playing, otherwise play the queue's current track
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.status == PlayerStatus::Playing {
            self.pause();
            return Ok(());
        }

        match self.queue.current().cloned() {
            Some(track) => self.play(&track),
            None => Ok(()),
        }
    }

    /// Stop playback and unload the track (the queue is kept)
    pub fn stop(&mut self) {
        if self.loaded.is_some() {
            self.device.pause();
        }
        self.unload();
        self.set_status(PlayerStatus::Idle);
    }

    /// Skip to the next track
    ///
    /// At the end of the queue nothing changes.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        match self.queue.advance() {
            Some(track) => self.play_from_start(track),
            None => {
                debug!("Next: end of queue");
                Ok(())
            }
        }
    }

    /// Go to the previous track
    ///
    /// Past the restart threshold the current track restarts instead.
    pub fn previous(&mut self) -> Result<()> {
        if self.has_active_load() && self.position_secs > self.restart_threshold_secs {
            return self.restart();
        }

        match self.queue.retreat() {
            Some(track) => self.play_from_start(track),
            None if self.has_active_load() => self.restart(),
            None => Ok(()),
        }
    }

    /// Play the queue slot at `index`
    pub fn play_index(&mut self, index: usize) -> Result<()> {
        match self.queue.jump_to(index) {
            Some(track) => self.play_from_start(track),
            None => Err(self.invalid(format!(
                "queue index {} out of range ({} tracks)",
                index,
                self.queue.len()
            ))),
        }
    }

    /// Play the queue's current track from its beginning
    pub fn play_current(&mut self) -> Result<()> {
        match self.queue.current().cloned() {
            Some(track) => self.play_from_start(track),
            None => Err(self.invalid("play_current: nothing selected".to_string())),
        }
    }

    /// Play `track` from its beginning, restarting it if it is already loaded
    fn play_from_start(&mut self, track: Track) -> Result<()> {
        let reusable =
            self.has_active_load() && self.loaded.as_ref().is_some_and(|t| t.id == track.id);

        if reusable {
            self.restart()
        } else {
            self.load(track)
        }
    }

    /// Whether the device holds media that can be restarted
    fn has_active_load(&self) -> bool {
        self.loaded.is_some()
            && matches!(
                self.status,
                PlayerStatus::Playing | PlayerStatus::Paused | PlayerStatus::Loading
            )
    }

    /// Seek the loaded track to 0 and play
    fn restart(&mut self) -> Result<()> {
        self.device.seek(0.0);
        self.position_secs = 0.0;
        self.publish_position();

        if let Err(e) = self.device.play() {
            return Err(self.fail(PlaybackError::DeviceError {
                track_id: self.loaded_id(),
                cause: e.to_string(),
            }));
        }
        if self.status == PlayerStatus::Paused {
            self.set_status(PlayerStatus::Playing);
        }
        Ok(())
    }

    fn load(&mut self, track: Track) -> Result<()> {
        self.token = self.token.next();
        let previous_track_id = self.loaded.replace(track.clone()).map(|t| t.id);
        self.position_secs = 0.0;
        self.duration_secs = None;

        info!("Loading track {} ({}) as load {}", track.id, track.title, self.token);
        self.set_status(PlayerStatus::Loading);
        self.events.publish(PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        let Some(locator) = track.playable_locator() else {
            return Err(self.fail(PlaybackError::LoadFailure {
                track_id: track.id.clone(),
                reason: "no playable media locator".to_string(),
            }));
        };

        let request = LoadRequest {
            token: self.token,
            locator: locator.to_string(),
        };

        let started = self
            .device
            .load(&request)
            .and_then(|()| self.device.play());
        if let Err(e) = started {
            return Err(self.fail(PlaybackError::LoadFailure {
                track_id: track.id.clone(),
                reason: e.to_string(),
            }));
        }

        Ok(())
    }

    fn loaded_id(&self) -> TrackId {
        self.loaded
            .as_ref()
            .map_or_else(|| TrackId::new("none"), |t| t.id.clone())
    }

    fn unload(&mut self) {
        // Retire the token so late callbacks from the old load are dropped
        self.token = self.token.next();
        self.loaded = None;
        self.position_secs = 0.0;
        self.duration_secs = None;
    }

    // ===== Device Callbacks =====

    /// Apply a device callback produced by the load identified by `token`
    ///
    /// Callbacks from superseded loads are ignored.
    pub fn handle_device_event(&mut self, token: LoadToken, event: DeviceEvent) {
        if token != self.token || self.loaded.is_none() {
            debug!("Ignoring stale device event {:?} from load {}", event, token);
            return;
        }

        match event {
            DeviceEvent::LoadedMetadata { duration_secs } => {
                self.duration_secs =
                    (duration_secs.is_finite() && duration_secs > 0.0).then_some(duration_secs);
                self.publish_position();
            }
            DeviceEvent::CanPlay => {
                if self.status == PlayerStatus::Loading {
                    self.set_status(PlayerStatus::Playing);
                }
            }
            DeviceEvent::TimeUpdate { position_secs } => {
                self.position_secs = position_secs.max(0.0);
                self.publish_position();
            }
            DeviceEvent::Ended => self.on_ended(),
            DeviceEvent::Error { cause } => {
                let track_id = self.loaded_id();
                let error = if self.status == PlayerStatus::Loading {
                    PlaybackError::LoadFailure {
                        track_id,
                        reason: cause,
                    }
                } else {
                    PlaybackError::DeviceError { track_id, cause }
                };
                self.fail(error);
            }
        }
    }

    fn on_ended(&mut self) {
        match self.queue.advance() {
            // Failures are already surfaced by `fail`
            Some(track) => {
                let _ = self.play_from_start(track);
            }
            None => {
                info!("Queue exhausted");
                self.unload();
                self.set_status(PlayerStatus::Idle);
                self.events.publish(PlayerEvent::QueueExhausted);
            }
        }
    }

    /// Surface a load or device failure and park the player in `Errored`
    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        warn!("{}", error);
        let message = error.to_string();
        self.notifier.notify(&message, Severity::Error);

        // Errored ignores further callbacks from this load
        self.token = self.token.next();
        self.set_status(PlayerStatus::Errored);
        self.events.publish(PlayerEvent::Error { message });
        error
    }

    /// Log an invalid operation and hand it back to the caller
    fn invalid(&self, msg: String) -> PlaybackError {
        warn!("Invalid operation: {}", msg);
        PlaybackError::invalid_operation(msg)
    }

    fn set_status(&mut self, status: PlayerStatus) {
        if self.status != status {
            debug!("Player status {} -> {}", self.status, status);
            self.status = status;
            self.events.publish(PlayerEvent::StatusChanged { status });
        }
    }

    fn publish_position(&mut self) {
        self.events.publish(PlayerEvent::PositionChanged {
            position_secs: self.position_secs,
            duration_secs: self.duration_secs,
        });
    }

    // ===== Seek =====

    fn require_duration(&self, operation: &str) -> Result<f64> {
        if self.loaded.is_none() {
            return Err(self.invalid(format!("{operation}: no track loaded")));
        }
        self.duration_secs
            .ok_or_else(|| self.invalid(format!("{operation}: duration unknown")))
    }

    /// Seek to `offset_secs` from the start (clamped to the track duration)
    pub fn seek(&mut self, offset_secs: f64) -> Result<()> {
        let duration = self.require_duration("seek")?;
        let target = if offset_secs.is_nan() {
            0.0
        } else {
            offset_secs.clamp(0.0, duration)
        };

        self.device.seek(target);
        self.position_secs = target;
        self.publish_position();
        Ok(())
    }

    /// Seek to a fraction of the track (clamped to 0.0-1.0)
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        let duration = self.require_duration("seek_to_fraction")?;
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(fraction * duration)
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_secs: f64) -> Result<()> {
        self.require_duration("seek_by")?;
        self.seek(self.position_secs + delta_secs)
    }

    /// Seek forward by the configured step
    pub fn skip_forward(&mut self) -> Result<()> {
        self.seek_by(self.seek_step_secs)
    }

    /// Seek backward by the configured step
    pub fn skip_backward(&mut self) -> Result<()> {
        self.seek_by(-self.seek_step_secs)
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.device.set_volume(self.volume.level());
        self.publish_volume();
    }

    /// Raise volume by the configured step
    pub fn volume_up(&mut self) {
        self.set_volume(self.volume.level() + self.volume_step);
    }

    /// Lower volume by the configured step
    pub fn volume_down(&mut self) {
        self.set_volume(self.volume.level() - self.volume_step);
    }

    /// Mute audio
    pub fn mute(&mut self) {
        self.set_muted(true);
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        self.set_muted(false);
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.volume.is_muted());
    }

    fn set_muted(&mut self, muted: bool) {
        if muted {
            self.volume.mute();
        } else {
            self.volume.unmute();
        }
        self.device.set_muted(muted);
        self.publish_volume();
    }

    fn publish_volume(&mut self) {
        self.events.publish(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== Queue =====

    /// Mutate the queue and publish `QueueChanged`
    pub fn edit_queue<R>(&mut self, edit: impl FnOnce(&mut QueueEngine) -> R) -> R {
        let result = edit(&mut self.queue);
        self.events.publish(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
        result
    }

    /// Replace the queue (e.g. with a restored one) without touching playback
    pub fn replace_queue(&mut self, queue: QueueEngine) {
        self.edit_queue(|current| *current = queue);
    }

    // ===== State Queries =====

    /// The queue
    pub fn queue(&self) -> &QueueEngine {
        &self.queue
    }

    /// Current status
    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    /// Track handed to the device by the latest load
    pub fn loaded_track(&self) -> Option<&Track> {
        self.loaded.as_ref()
    }

    /// Last reported position in seconds
    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// Media duration in seconds, once reported by the device
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// Volume state
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Token of the latest load (device callbacks must carry it)
    pub fn load_token(&self) -> LoadToken {
        self.token
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("status", &self.status)
            .field("loaded", &self.loaded.as_ref().map(|t| &t.id))
            .field("token", &self.token)
            .field("queue_len", &self.queue.len())
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}
