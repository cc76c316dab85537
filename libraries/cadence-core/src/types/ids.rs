/// ID types for Cadence entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier assigned by the track source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a single device load request
///
/// Tokens are issued in strictly increasing order by the player. Device
/// callbacks carry the token of the load that produced them so that a
/// superseded load can be recognised and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Token that precedes every issued token
    pub const INITIAL: Self = Self(0);

    /// Create a token from its raw value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The token issued after this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw token value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
