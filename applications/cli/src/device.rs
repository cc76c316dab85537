//! Logging playback device
//!
//! Stands in for an audio output in the headless CLI: every command is
//! written to the log. Local file locators are checked for existence so a
//! missing file surfaces as a load failure; URLs are accepted as-is.

use cadence_core::{CoreError, LoadRequest, PlaybackDevice, Result};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
pub struct ConsoleDevice {
    loaded: Option<LoadRequest>,
    playing: bool,
}

impl ConsoleDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator of the loaded media
    pub fn loaded_locator(&self) -> Option<&str> {
        self.loaded.as_ref().map(|r| r.locator.as_str())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

fn is_remote(locator: &str) -> bool {
    locator.contains("://")
}

impl PlaybackDevice for ConsoleDevice {
    fn load(&mut self, request: &LoadRequest) -> Result<()> {
        if !is_remote(&request.locator) && !Path::new(&request.locator).exists() {
            return Err(CoreError::device(format!(
                "media not found: {}",
                request.locator
            )));
        }
        info!(target: "cadence::device", "load {} ({})", request.locator, request.token);
        self.loaded = Some(request.clone());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(CoreError::device("nothing loaded"));
        }
        info!(target: "cadence::device", "play");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        info!(target: "cadence::device", "pause");
        self.playing = false;
    }

    fn seek(&mut self, position_secs: f64) {
        info!(target: "cadence::device", "seek {:.1}s", position_secs);
    }

    fn set_volume(&mut self, volume: f32) {
        info!(target: "cadence::device", "volume {:.2}", volume);
    }

    fn set_muted(&mut self, muted: bool) {
        info!(target: "cadence::device", "muted {}", muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::LoadToken;

    fn request(locator: &str) -> LoadRequest {
        LoadRequest {
            token: LoadToken::new(1),
            locator: locator.to_string(),
        }
    }

    #[test]
    fn accepts_urls_and_existing_files() {
        let mut device = ConsoleDevice::new();
        device.load(&request("https://media.example/a.mp3")).unwrap();
        device.play().unwrap();
        assert!(device.is_playing());

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        device.load(&request(&path)).unwrap();
        assert_eq!(device.loaded_locator(), Some(path.as_str()));
        assert!(!device.is_playing());
    }

    #[test]
    fn rejects_missing_files() {
        let mut device = ConsoleDevice::new();
        assert!(device.load(&request("/definitely/not/here.mp3")).is_err());
        assert!(device.play().is_err());
    }
}
