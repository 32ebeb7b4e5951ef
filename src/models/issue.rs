//! Detected problems and their severities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of problem found during a check.
///
/// The serialized identifiers are stable and shared with anything that
/// persists or exchanges results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Expired,
    NotYetValid,
    ExpiringSoon,
    SelfSigned,
    UntrustedRoot,
    HostnameMismatch,
    WeakSignature,
    WeakKey,
    IncompleteChain,
    TlsVersionOld,
    NoSans,
    ChainTooLong,
    /// Platform trust failed and no more specific cause was found
    AndroidSpecificTrustIssue,
    CipherWeak,
    CipherNoForwardSecrecy,
}

impl IssueType {
    /// Stable identifier, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Expired => "EXPIRED",
            IssueType::NotYetValid => "NOT_YET_VALID",
            IssueType::ExpiringSoon => "EXPIRING_SOON",
            IssueType::SelfSigned => "SELF_SIGNED",
            IssueType::UntrustedRoot => "UNTRUSTED_ROOT",
            IssueType::HostnameMismatch => "HOSTNAME_MISMATCH",
            IssueType::WeakSignature => "WEAK_SIGNATURE",
            IssueType::WeakKey => "WEAK_KEY",
            IssueType::IncompleteChain => "INCOMPLETE_CHAIN",
            IssueType::TlsVersionOld => "TLS_VERSION_OLD",
            IssueType::NoSans => "NO_SANS",
            IssueType::ChainTooLong => "CHAIN_TOO_LONG",
            IssueType::AndroidSpecificTrustIssue => "ANDROID_SPECIFIC_TRUST_ISSUE",
            IssueType::CipherWeak => "CIPHER_WEAK",
            IssueType::CipherNoForwardSecrecy => "CIPHER_NO_FORWARD_SECRECY",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue severity, ordered `Info < Warning < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Get the icon for this severity
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Critical => "✗",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One detected problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Issue {
    /// Create a new issue
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Create a critical issue
    pub fn critical(
        issue_type: IssueType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(issue_type, Severity::Critical, title, description)
    }

    /// Create a warning issue
    pub fn warning(
        issue_type: IssueType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(issue_type, Severity::Warning, title, description)
    }

    /// Create an informational issue
    pub fn info(
        issue_type: IssueType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(issue_type, Severity::Info, title, description)
    }
}

/// Sort issues by descending severity, keeping detection order within a
/// severity.
pub fn sort_by_severity(issues: &mut [Issue]) {
    // slice::sort_by is stable
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn test_sort_is_stable_within_severity() {
        let mut issues = vec![
            Issue::info(IssueType::ChainTooLong, "a", ""),
            Issue::warning(IssueType::WeakKey, "b", ""),
            Issue::critical(IssueType::Expired, "c", ""),
            Issue::warning(IssueType::WeakSignature, "d", ""),
            Issue::critical(IssueType::NoSans, "e", ""),
        ];
        sort_by_severity(&mut issues);
        let titles: Vec<&str> = issues.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "e", "b", "d", "a"]);
    }

    #[test]
    fn test_issue_type_serializes_as_identifier() {
        let json = serde_json::to_string(&IssueType::AndroidSpecificTrustIssue).unwrap();
        assert_eq!(json, "\"ANDROID_SPECIFIC_TRUST_ISSUE\"");
        let json = serde_json::to_string(&IssueType::CipherNoForwardSecrecy).unwrap();
        assert_eq!(json, "\"CIPHER_NO_FORWARD_SECRECY\"");
    }
}
