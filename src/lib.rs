//! certcheck library
//!
//! Inspects the TLS certificate chain a server presents and judges it the
//! way a mobile platform trust store would:
//! - Handshake and negotiated protocol/cipher capture
//! - Per-certificate analysis (validity, keys, signatures, SANs)
//! - Platform trust, chain linkage and hostname verification
//! - Saved hosts, check history and change detection
//!
//! # Usage
//!
//! ```rust,ignore
//! use certcheck::{check, CheckStatus};
//!
//! let result = check("https://example.com/login", 443);
//! if result.overall_status() == CheckStatus::Ok {
//!     println!("{} is fine", result.hostname);
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod output;
pub mod runner;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::{CheckSettings, Settings, WatchSettings};
pub use models::{CheckResult, CheckStatus, Issue, IssueType, Severity};
pub use runner::{check, parse_host_and_port, Checker};
pub use store::{CheckRepository, JsonFileRepository, MemoryRepository};
pub use utils::{CheckError, ConfigError, StoreError};
