//! Shared test doubles for the playback integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use cadence_core::{
    CoreError, LoadRequest, LoadToken, NotificationSink, PlaybackDevice, Result, Severity, Track,
    TrackFilter, TrackId, TrackSource,
};
use cadence_playback::Clock;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

// ===== Tracks =====

pub fn create_track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"), "Test Artist")
        .with_album("Test Album")
        .with_duration_secs(180)
        .with_media_locator(format!("https://media.test/{id}.mp3"))
}

pub fn create_tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| create_track(id)).collect()
}

pub fn ids<'a>(tracks: impl Iterator<Item = &'a Track>) -> Vec<String> {
    tracks.map(|t| t.id.to_string()).collect()
}

// ===== Device =====

/// A command received by the recording device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load { token: LoadToken, locator: String },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    SetMuted(bool),
}

/// Device that records every command; cloning shares the log
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    calls: Rc<RefCell<Vec<DeviceCall>>>,
    fail_load: Rc<Cell<bool>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn PlaybackDevice> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Locators passed to `load`, in order
    pub fn loads(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Load { locator, .. } => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.set(fail);
    }
}

impl PlaybackDevice for RecordingDevice {
    fn load(&mut self, request: &LoadRequest) -> Result<()> {
        self.calls.borrow_mut().push(DeviceCall::Load {
            token: request.token,
            locator: request.locator.clone(),
        });
        if self.fail_load.get() {
            return Err(CoreError::device("network unreachable"));
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.borrow_mut().push(DeviceCall::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(DeviceCall::Pause);
    }

    fn seek(&mut self, position_secs: f64) {
        self.calls.borrow_mut().push(DeviceCall::Seek(position_secs));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.borrow_mut().push(DeviceCall::SetVolume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.borrow_mut().push(DeviceCall::SetMuted(muted));
    }
}

// ===== Notifications =====

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(_, severity)| *severity == Severity::Error)
            .map(|(message, _)| message)
            .collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.messages().iter().any(|(message, _)| message.contains(text))
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

// ===== Clock =====

/// Clock whose time only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn advance_hours(&self, hours: i64) {
        self.now.fetch_add(hours * 60 * 60 * 1000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ===== Track Source =====

/// In-memory catalogue
#[derive(Debug, Default)]
pub struct MockTrackSource {
    tracks: Vec<Track>,
    fail: bool,
}

impl MockTrackSource {
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            tracks: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TrackSource for MockTrackSource {
    async fn fetch_track_by_id(&self, id: &TrackId) -> Result<Track> {
        if self.fail {
            return Err(CoreError::source_failure("catalogue offline"));
        }
        self.tracks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("track", id.as_str()))
    }

    async fn fetch_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        if self.fail {
            return Err(CoreError::source_failure("catalogue offline"));
        }
        Ok(self
            .tracks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}
