//! JSON-file track library
//!
//! The library file is a JSON array of tracks:
//!
//! ```json
//! [
//!   {"id": "1", "title": "So What", "artist_name": "Miles Davis",
//!    "album_title": "Kind of Blue", "duration_secs": 545,
//!    "media_locator": "/music/so-what.mp3"}
//! ]
//! ```

use crate::error::{CliError, Result};
use async_trait::async_trait;
use cadence_core::{CoreError, Track, TrackFilter, TrackId, TrackSource};
use std::path::Path;
use tracing::{debug, info};

/// Track source backed by an in-memory copy of a library file
#[derive(Debug, Clone, Default)]
pub struct JsonLibrary {
    tracks: Vec<Track>,
}

impl JsonLibrary {
    /// Create a library from tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Read a library file
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            CliError::Library(format!("cannot read {}: {}", path.display(), e))
        })?;

        let tracks: Vec<Track> = serde_json::from_slice(&bytes).map_err(|e| {
            CliError::Library(format!("invalid library {}: {}", path.display(), e))
        })?;

        info!("Loaded {} tracks from {}", tracks.len(), path.display());
        Ok(Self::new(tracks))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the library is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl TrackSource for JsonLibrary {
    async fn fetch_track_by_id(&self, id: &TrackId) -> cadence_core::Result<Track> {
        debug!("Looking up track {}", id);
        self.tracks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("track", id.as_str()))
    }

    async fn fetch_tracks(&self, filter: &TrackFilter) -> cadence_core::Result<Vec<Track>> {
        Ok(self
            .tracks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}
