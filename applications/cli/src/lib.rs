//! Cadence CLI Library
//!
//! Headless driver around a playback session: configuration loading, a
//! JSON-file track library, a logging playback device and console output.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod device;
pub mod error;
pub mod library;
pub mod render;

pub use config::AppConfig;
pub use device::ConsoleDevice;
pub use error::{CliError, Result};
pub use library::JsonLibrary;
