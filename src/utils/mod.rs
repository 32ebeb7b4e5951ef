//! Utility modules for certcheck
//!
//! This module contains error types, progress indicators, and other utilities.

pub mod error;
pub mod progress;

pub use error::{CheckError, ConfigError, Result, StoreError, ToolkitError};
