//! Configuration management for vqesim
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.vqesim/config.toml

use crate::cli::Verbosity;
use crate::errors::{SimError, Result};
use crate::notifications::{NotificationQueue, DEFAULT_CAPACITY, DEFAULT_TTL_MS};
use crate::simulator::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for vqesim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationsConfig,
}

/// Terminal output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub show_progress_bars: bool,
    pub color_output: bool,
}

/// Notification queue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub capacity: usize,
    pub ttl_ms: u64,
    pub sweep_interval_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            show_progress_bars: true,
            color_output: true,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl_ms: DEFAULT_TTL_MS,
            sweep_interval_ms: 250,
        }
    }
}

impl NotificationsConfig {
    pub fn queue(&self) -> NotificationQueue {
        NotificationQueue::new(self.capacity, Duration::from_millis(self.ttl_ms))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SimError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| SimError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location, when a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vqesim").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()?;

        if self.notifications.capacity == 0 {
            return Err(SimError::ConfigError(
                "notifications.capacity must be greater than 0".to_string(),
            ));
        }

        if self.notifications.ttl_ms == 0 {
            return Err(SimError::ConfigError(
                "notifications.ttl_ms must be greater than 0".to_string(),
            ));
        }

        if self.notifications.sweep_interval_ms == 0 {
            return Err(SimError::ConfigError(
                "notifications.sweep_interval_ms must be greater than 0".to_string(),
            ));
        }

        if Verbosity::parse(&self.telemetry.default_verbosity).is_none() {
            return Err(SimError::ConfigError(format!(
                "Invalid verbosity level: {}",
                self.telemetry.default_verbosity
            )));
        }

        Ok(())
    }

    /// Verbosity from the config file, used when no flag was given
    pub fn default_verbosity(&self) -> Verbosity {
        Verbosity::parse(&self.telemetry.default_verbosity).unwrap_or(Verbosity::Normal)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SimError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SimError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SimError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Write the built-in defaults to `path` (or the standard location),
    /// replacing whatever is there without reading it first
    pub fn write_default(path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or_else(|| {
                SimError::ConfigError("Could not determine home directory".to_string())
            })?,
        };
        Config::default().save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulator.interval_ms, 600);
        assert_eq!(config.simulator.max_iterations, 20);
        assert_eq!(config.notifications.capacity, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let mut config = Config::default();
        config.notifications.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let mut config = Config::default();
        config.notifications.ttl_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_simulator() {
        let mut config = Config::default();
        config.simulator.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.telemetry.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("[simulator]\ninterval_ms = 50\n").unwrap();
        assert_eq!(config.simulator.interval_ms, 50);
        assert_eq!(config.simulator.target, -1.137);
        assert_eq!(config.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.simulator.max_iterations = 12;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulator]\ntolerance = -1.0\n").unwrap();

        assert!(matches!(Config::load(Some(path.as_path())), Err(SimError::ConfigError(_))));
    }

    #[test]
    fn test_write_default_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("config.toml");
        assert!(Config::load(Some(path.as_path())).is_err());

        let written = Config::write_default(Some(path.as_path())).unwrap();
        assert_eq!(written, path);
        assert_eq!(Config::load(Some(path.as_path())).unwrap(), Config::default());
    }

    #[test]
    fn test_write_default_replaces_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulator\ninterval_ms = = 0").unwrap();
        assert!(Config::load(Some(path.as_path())).is_err());

        Config::write_default(Some(path.as_path())).unwrap();
        assert_eq!(Config::load(Some(path.as_path())).unwrap(), Config::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
