//! Configuration module for certcheck
//!
//! Handles loading and managing configuration from TOML files.

pub mod settings;

pub use settings::{CheckSettings, Settings, WatchSettings};

use crate::utils::ConfigError;
use std::path::Path;

/// Load settings from an explicit path, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(p) => Settings::load_from_file(p),
        None => Settings::load_default(),
    }
}
