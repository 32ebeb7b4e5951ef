//! Custom error types for certcheck
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of a check and of the collaborators around it.

use thiserror::Error;

/// Top-level error type for the certcheck application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Check error: {0}")]
    Check(#[from] CheckError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Failures that end a check early.
///
/// The `Display` text of these errors becomes `CheckResult::error`, so each
/// message leads with the kind of failure followed by its cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("empty hostname")]
    EmptyHostname,

    #[error("InvalidHostname: '{hostname}' is not a valid server name")]
    InvalidHostname { hostname: String },

    #[error("ConnectionError: {kind}: {message}")]
    Connection { kind: String, message: String },

    #[error("TlsError: {message}")]
    Tls { message: String },

    #[error("no certificate received")]
    NoCertificate,

    #[error("CertificateError: {message}")]
    Certificate { message: String },
}

impl CheckError {
    /// Wrap an I/O failure on the socket, keeping its kind as the cause name
    pub fn connection(err: &std::io::Error) -> Self {
        CheckError::Connection {
            kind: format!("{:?}", err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<rustls::Error> for CheckError {
    fn from(err: rustls::Error) -> Self {
        CheckError::Tls {
            message: err.to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Repository errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Favorite not found: {id}")]
    FavoriteNotFound { id: u64 },

    #[error("Favorite already exists: {target}")]
    DuplicateFavorite { target: String },

    #[error("Failed to read store {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write store {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_names_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connection timed out");
        let err = CheckError::connection(&io);
        assert_eq!(
            err.to_string(),
            "ConnectionError: TimedOut: connection timed out"
        );
    }

    #[test]
    fn test_toolkit_error_wraps_store_error() {
        let err: ToolkitError = StoreError::FavoriteNotFound { id: 4 }.into();
        assert_eq!(err.to_string(), "Storage error: Favorite not found: 4");
    }

    #[test]
    fn test_fatal_messages() {
        assert_eq!(CheckError::EmptyHostname.to_string(), "empty hostname");
        assert_eq!(
            CheckError::NoCertificate.to_string(),
            "no certificate received"
        );
    }
}
