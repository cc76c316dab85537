//! Domain types shared across Cadence crates

mod device;
mod ids;
mod notification;
mod track;

pub use device::{DeviceEvent, LoadRequest};
pub use ids::{LoadToken, TrackId};
pub use notification::Severity;
pub use track::{Track, TrackFilter};
