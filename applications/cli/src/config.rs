/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding the saved session (one JSON file per key)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// JSON file listing the available tracks
    #[serde(default = "default_library_path")]
    pub path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `cadence.toml` in the working directory; a missing
    /// default file is not an error. Environment variables prefixed with
    /// `CADENCE_` override file values, with `__` separating nested keys
    /// (e.g. `CADENCE_PLAYBACK__HISTORY_SIZE=100`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("cadence.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !(0.0..=1.0).contains(&playback.volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0 and 1, got {}",
                playback.volume
            )));
        }

        if playback.seek_step_secs <= 0.0 || playback.volume_step <= 0.0 {
            return Err(CliError::Config(
                "playback.seek_step_secs and playback.volume_step must be positive".to_string(),
            ));
        }

        let keys = &playback.persistence;
        if keys.queue_key == keys.volume_key
            || keys.queue_key == keys.mode_key
            || keys.volume_key == keys.mode_key
        {
            return Err(CliError::Config(
                "persistence.queue_key, volume_key and mode_key must all differ".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        path: default_library_path(),
    }
}

fn default_library_path() -> PathBuf {
    PathBuf::from("./library.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            storage: default_storage(),
            library: default_library(),
        }
    }
}
