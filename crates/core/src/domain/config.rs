//! Configuration for volumecontrol
//!
//! Options are read once at startup from `~/.config/volumecontrol/config.toml`
//! and passed down explicitly; nothing reads the environment afterwards and
//! nothing is written back.

use crate::domain::controller::DEFAULT_VOLUME_STEPS;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, instrument};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How control commands are run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Control shell binary, looked up in `PATH` when relative
    pub binary: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pacmd"),
        }
    }
}

/// Volume stepping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Up/down presses spanning a sink's full range
    pub steps: u32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_VOLUME_STEPS.get(),
        }
    }
}

impl VolumeConfig {
    /// `steps` as a usable step count; zero is rejected
    pub fn step_count(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.steps).ok_or_else(|| {
            ConfigError::Invalid("volume.steps must be at least 1".to_string())
        })
    }
}

/// Interactive menu timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Minimum gap between two Esc presses that both count
    pub escape_delay_ms: u64,

    /// Redraw interval when no key is pressed
    pub refresh_interval_ms: u64,
}

impl MenuConfig {
    pub fn escape_delay(&self) -> Duration {
        Duration::from_millis(self.escape_delay_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            escape_delay_ms: 25,
            refresh_interval_ms: 1000,
        }
    }
}

/// Complete volumecontrol configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeControlConfig {
    pub executor: ExecutorConfig,
    pub volume: VolumeConfig,
    pub menu: MenuConfig,
}

impl VolumeControlConfig {
    /// Load configuration from TOML file
    #[instrument(skip(path))]
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.volume.step_count()?;
        if self.executor.binary.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "executor.binary must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Locates and loads the user's configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager for `config.toml` inside `config_dir`
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("config.toml"),
        }
    }

    /// Returns `~/.config/volumecontrol` (or the platform equivalent)
    pub fn default_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("volumecontrol"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from file
    ///
    /// A missing file gives the defaults. An unreadable or invalid file is
    /// logged and also gives the defaults.
    #[instrument(skip(self))]
    pub async fn load(&self) -> VolumeControlConfig {
        if !self.config_path.exists() {
            debug!(
                path = %self.config_path.display(),
                "Config file not found, using defaults"
            );
            return VolumeControlConfig::default();
        }

        match VolumeControlConfig::load_from_file(&self.config_path).await {
            Ok(config) => config,
            Err(e) => {
                error!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                VolumeControlConfig::default()
            }
        }
    }
}
