//! Cadence Core
//!
//! Platform-agnostic types and collaborator traits shared by the Cadence
//! playback libraries and applications.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `TrackFilter`, `LoadToken`
//! - **Collaborator Traits**: `TrackSource`, `PlaybackDevice`, `KeyValueStore`,
//!   `NotificationSink`
//! - **Stores**: `MemoryStore` and the directory-backed `FileStore`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{KeyValueStore, MemoryStore, Track, TrackFilter};
//!
//! let track = Track::new("t1", "Blue in Green", "Miles Davis")
//!     .with_album("Kind of Blue")
//!     .with_duration_secs(337)
//!     .with_media_locator("https://media.example/t1.mp3");
//!
//! assert!(TrackFilter::query("blue").matches(&track));
//!
//! let store = MemoryStore::new();
//! store.set("greeting", b"hello").unwrap();
//! assert_eq!(store.get("greeting").unwrap(), Some(b"hello".to_vec()));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use storage::{FileStore, MemoryStore};
pub use traits::{KeyValueStore, NotificationSink, PlaybackDevice, TrackSource, TracingNotifier};
pub use types::{DeviceEvent, LoadRequest, LoadToken, Severity, Track, TrackFilter, TrackId};
