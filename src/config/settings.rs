//! Application settings configuration
//!
//! Defines check timeouts and thresholds, and the watch schedule.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Settings for a single check
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub default_port: u16,
    /// Leaf certificates expiring within this many days raise a warning
    pub expiry_warning_days: i64,
    /// Chains longer than this raise an informational issue
    pub max_chain_length: usize,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 10,
            default_port: 443,
            expiry_warning_days: 30,
            max_chain_length: 5,
        }
    }
}

impl CheckSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "check.connect_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "check.read_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.default_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "check.default_port".to_string(),
                message: "must be a valid TCP port".to_string(),
            });
        }
        Ok(())
    }
}

/// Periodic re-check settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    pub interval_secs: u64,
    /// Alert when the leaf expires within this many days
    pub alert_threshold_days: i64,
    pub notifications_enabled: bool,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval_secs: 86_400,
            alert_threshold_days: 30,
            notifications_enabled: true,
        }
    }
}

impl WatchSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub watch: WatchSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.check.validate()?;
        Ok(settings)
    }
}
