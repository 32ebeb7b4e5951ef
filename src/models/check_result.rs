//! The structured report produced by one check

use super::{CertificateInfo, CipherAnalysis, Issue, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Ok,
    Warning,
    Critical,
    Error,
}

impl CheckStatus {
    /// Get the icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning => "⚠",
            CheckStatus::Critical => "✗",
            CheckStatus::Error => "✗",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Critical => "CRITICAL",
            CheckStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one full inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub hostname: String,
    pub port: u16,
    pub timestamp: DateTime<Utc>,
    /// Negotiated protocol (`TLSv1.2`, `TLSv1.3`, ...)
    pub tls_version: Option<String>,
    /// Negotiated cipher suite, IANA name
    pub cipher_suite: Option<String>,
    pub cipher_analysis: Option<CipherAnalysis>,
    /// Leaf first, wire order
    pub certificates: Vec<CertificateInfo>,
    pub chain_valid: bool,
    pub trusted_by_platform: bool,
    pub hostname_matches: bool,
    /// Sorted by descending severity
    pub issues: Vec<Issue>,
    /// Set when the check could not complete
    pub error: Option<String>,
}

impl CheckResult {
    /// A result for a check that failed before any analysis ran
    pub fn failed(
        hostname: impl Into<String>,
        port: u16,
        timestamp: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            timestamp,
            tls_version: None,
            cipher_suite: None,
            cipher_analysis: None,
            certificates: Vec::new(),
            chain_valid: false,
            trusted_by_platform: false,
            hostname_matches: false,
            issues: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// ERROR > CRITICAL > WARNING > OK
    pub fn overall_status(&self) -> CheckStatus {
        if self.error.is_some() {
            CheckStatus::Error
        } else if self.issues.iter().any(|i| i.severity == Severity::Critical) {
            CheckStatus::Critical
        } else if self.issues.iter().any(|i| i.severity == Severity::Warning) {
            CheckStatus::Warning
        } else {
            CheckStatus::Ok
        }
    }

    /// Get the leaf (end-entity) certificate
    pub fn leaf(&self) -> Option<&CertificateInfo> {
        self.certificates.first()
    }

    /// True when the check completed without any issue and every verdict
    /// passed
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
            && self.issues.is_empty()
            && self.chain_valid
            && self.trusted_by_platform
            && self.hostname_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueType;

    #[test]
    fn test_overall_status_precedence() {
        let now = Utc::now();
        let mut result = CheckResult::failed("example.com", 443, now, "boom");
        result.issues.push(Issue::critical(IssueType::Expired, "t", "d"));
        assert_eq!(result.overall_status(), CheckStatus::Error);

        result.error = None;
        assert_eq!(result.overall_status(), CheckStatus::Critical);

        result.issues = vec![
            Issue::info(IssueType::ChainTooLong, "t", "d"),
            Issue::warning(IssueType::WeakKey, "t", "d"),
        ];
        assert_eq!(result.overall_status(), CheckStatus::Warning);

        result.issues = vec![Issue::info(IssueType::ChainTooLong, "t", "d")];
        assert_eq!(result.overall_status(), CheckStatus::Ok);
    }
}
