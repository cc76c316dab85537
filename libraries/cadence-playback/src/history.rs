//! Playback history tracking
//!
//! Maintains a bounded history of played tracks for "previous" functionality

use cadence_core::Track;
use std::collections::VecDeque;

/// Playback history with bounded size
///
/// Tracks recently played songs for "previous" navigation.
/// The oldest entry is discarded once the history is full, and the same track
/// is never recorded twice in a row.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = back)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild a history from persisted tracks (oldest first)
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        for track in tracks {
            history.push(track);
        }
        history
    }

    /// Add track to history
    ///
    /// Ignored if it has the same id as the most recent entry. If history is
    /// full, the oldest track is discarded. Returns whether the track was added.
    pub fn push(&mut self, track: Track) -> bool {
        if self.max_size == 0 {
            return false;
        }
        if self.tracks.back().is_some_and(|last| last.id == track.id) {
            return false;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track);
        true
    }

    /// Get most recent track (without removing)
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.back()
    }

    /// Pop most recent track from history
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_back()
    }

    /// Iterate over history tracks (oldest first)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Track> + ExactSizeIterator {
        self.tracks.iter()
    }

    /// The `count` most recent tracks (oldest first)
    pub fn recent(&self, count: usize) -> Vec<Track> {
        let skip = self.tracks.len().saturating_sub(count);
        self.tracks.iter().skip(skip).cloned().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50) // Default: 50 tracks
    }
}
