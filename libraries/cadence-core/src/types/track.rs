/// Track domain type
use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable track metadata
///
/// Supplied by the track source and never mutated by the playback core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist_name: String,

    /// Album title
    #[serde(default)]
    pub album_title: Option<String>,

    /// Track duration in whole seconds
    #[serde(default)]
    pub duration_secs: u32,

    /// Playable media locator; `None` when the backend has no media for it
    #[serde(default)]
    pub media_locator: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist_name: artist_name.into(),
            album_title: None,
            duration_secs: 0,
            media_locator: None,
        }
    }

    /// Set the album title
    #[must_use]
    pub fn with_album(mut self, album_title: impl Into<String>) -> Self {
        self.album_title = Some(album_title.into());
        self
    }

    /// Set the duration in seconds
    #[must_use]
    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Set the media locator
    #[must_use]
    pub fn with_media_locator(mut self, locator: impl Into<String>) -> Self {
        self.media_locator = Some(locator.into());
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// Media locator if it is present and non-blank
    pub fn playable_locator(&self) -> Option<&str> {
        self.media_locator
            .as_deref()
            .map(str::trim)
            .filter(|locator| !locator.is_empty())
    }
}

/// Filter applied when listing tracks from a source
///
/// All set fields must match. Matching is case-insensitive substring matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFilter {
    /// Free-text query matched against title, artist and album
    pub query: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album title
    pub album: Option<String>,
}

impl TrackFilter {
    /// Filter that matches every track
    pub fn all() -> Self {
        Self::default()
    }

    /// Free-text filter
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Check whether a track passes this filter
    pub fn matches(&self, track: &Track) -> bool {
        let album = track.album_title.as_deref().unwrap_or_default();

        let query_ok = self.query.as_deref().map_or(true, |q| {
            contains_ignore_case(&track.title, q)
                || contains_ignore_case(&track.artist_name, q)
                || contains_ignore_case(album, q)
        });
        let artist_ok = self
            .artist
            .as_deref()
            .map_or(true, |a| contains_ignore_case(&track.artist_name, a));
        let album_ok = self
            .album
            .as_deref()
            .map_or(true, |a| contains_ignore_case(album, a));

        query_ok && artist_ok && album_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Track {
        Track::new("1", "So What", "Miles Davis")
            .with_album("Kind of Blue")
            .with_duration_secs(545)
            .with_media_locator("https://media.example/1.mp3")
    }

    #[test]
    fn builder_sets_fields() {
        let track = sample();
        assert_eq!(track.id.as_str(), "1");
        assert_eq!(track.album_title.as_deref(), Some("Kind of Blue"));
        assert_eq!(track.duration(), Duration::from_secs(545));
    }

    #[test]
    fn blank_locator_is_not_playable() {
        let track = Track::new("2", "Untitled", "Nobody").with_media_locator("   ");
        assert_eq!(track.playable_locator(), None);
        assert_eq!(
            sample().playable_locator(),
            Some("https://media.example/1.mp3")
        );
    }

    #[test]
    fn filter_matches_any_field_case_insensitively() {
        let track = sample();
        assert!(TrackFilter::all().matches(&track));
        assert!(TrackFilter::query("so what").matches(&track));
        assert!(TrackFilter::query("MILES").matches(&track));
        assert!(TrackFilter::query("blue").matches(&track));
        assert!(!TrackFilter::query("coltrane").matches(&track));
    }

    #[test]
    fn filter_fields_combine() {
        let track = sample();
        let filter = TrackFilter {
            query: Some("what".into()),
            artist: Some("davis".into()),
            album: Some("giant steps".into()),
        };
        assert!(!filter.matches(&track));
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let track: Track =
            serde_json::from_str(r#"{"id":"9","title":"T","artist_name":"A"}"#).unwrap();
        assert_eq!(track.album_title, None);
        assert_eq!(track.media_locator, None);
        assert_eq!(track.duration_secs, 0);
    }
}
