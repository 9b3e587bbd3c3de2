//! Configuration management for soundboard.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, startup validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CaptureConfig, DEFAULT_CLIP_FILE_NAME, PlaybackConfig, RECORDINGS_DIR_NAME, StorageConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use soundboard_core::{DEFAULT_VOLUME, VolumeCheck};
use tracing::{debug, info, instrument};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Capture file location.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Playback settings.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Recording store location.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;

        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Self::load_or_create(&config_dir.join(CONFIG_FILE_NAME), proj_dirs.data_dir())
    }

    /// Load `config_path`, or write and return defaults rooted at `data_dir`
    /// when it does not exist.
    #[track_caller]
    #[instrument]
    pub fn load_or_create(config_path: &Path, data_dir: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Self::defaults(data_dir);
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        config.fill_default_directories(data_dir);

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Default configuration with every directory under `data_dir`.
    pub fn defaults(data_dir: &Path) -> Self {
        Config {
            capture: CaptureConfig {
                file_name: DEFAULT_CLIP_FILE_NAME.to_string(),
                directory: data_dir.to_path_buf(),
            },
            playback: PlaybackConfig {
                default_volume: DEFAULT_VOLUME,
            },
            storage: StorageConfig {
                directory: data_dir.join(RECORDINGS_DIR_NAME),
            },
        }
    }

    /// Point empty directories at their defaults under `data_dir`.
    fn fill_default_directories(&mut self, data_dir: &Path) {
        let defaults = Self::defaults(data_dir);
        if self.capture.directory.as_os_str().is_empty() {
            self.capture.directory = defaults.capture.directory;
        }
        if self.storage.directory.as_os_str().is_empty() {
            self.storage.directory = defaults.storage.directory;
        }
    }

    /// Reject values the session would refuse at runtime.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        VolumeCheck::classify(self.playback.default_volume).map_err(|e| {
            AppError::ConfigError {
                reason: format!("[playback] default_volume: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        if self.capture.file_name.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "[capture] file_name must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Full path of the capture file.
    pub fn clip_path(&self) -> PathBuf {
        self.capture.directory.join(&self.capture.file_name)
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "soundboard", "SoundBoard").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
