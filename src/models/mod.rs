//! Data models for certcheck
//!
//! This module contains all the data structures produced by a check.

pub mod certificate;
pub mod check_result;
pub mod cipher;
pub mod favorite;
pub mod issue;

pub use certificate::{extract_cn, CertificateInfo, Fingerprints};
pub use check_result::{CheckResult, CheckStatus};
pub use cipher::{CipherAnalysis, CipherComponents, CipherStrength, PlatformCompatibility};
pub use favorite::Favorite;
pub use issue::{sort_by_severity, Issue, IssueType, Severity};
