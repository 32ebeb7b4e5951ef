//! Connection-wide checks: negotiated protocol version and chain length

use crate::models::{Issue, IssueType};

/// Protocol versions that modern clients have disabled
const DEPRECATED_VERSIONS: &[&str] = &["TLSv1", "TLSv1.1"];

/// Flag a deprecated negotiated protocol version
pub fn check_tls_version(tls_version: &str) -> Option<Issue> {
    if !DEPRECATED_VERSIONS.contains(&tls_version) {
        return None;
    }

    Some(Issue::warning(
        IssueType::TlsVersionOld,
        "Obsolete TLS version",
        format!(
            "The server negotiated {}. TLS 1.0 and 1.1 are disabled on Android 10+ \
             and recent iOS releases. Enable TLS 1.2 or 1.3.",
            tls_version
        ),
    ))
}

/// Flag chains longer than `max_length`
pub fn check_chain_length(chain_length: usize, max_length: usize) -> Option<Issue> {
    if chain_length <= max_length {
        return None;
    }

    Some(Issue::info(
        IssueType::ChainTooLong,
        "Long certificate chain",
        format!(
            "The chain contains {} certificates. Long chains slow down the \
             handshake on mobile networks.",
            chain_length
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[test]
    fn test_old_versions_flagged() {
        for version in ["TLSv1", "TLSv1.1"] {
            let issue = check_tls_version(version).unwrap();
            assert_eq!(issue.issue_type, IssueType::TlsVersionOld);
            assert_eq!(issue.severity, Severity::Warning);
            assert!(issue.description.contains(version));
        }
    }

    #[test]
    fn test_current_versions_pass() {
        assert!(check_tls_version("TLSv1.2").is_none());
        assert!(check_tls_version("TLSv1.3").is_none());
        assert!(check_tls_version("").is_none());
    }

    #[test]
    fn test_chain_length_boundary() {
        assert!(check_chain_length(5, 5).is_none());
        let issue = check_chain_length(6, 5).unwrap();
        assert_eq!(issue.issue_type, IssueType::ChainTooLong);
        assert_eq!(issue.severity, Severity::Info);
        assert!(issue.description.contains('6'));
    }
}
