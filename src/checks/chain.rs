//! Chain linkage and hostname verification
//!
//! Linkage checks that each certificate was signed by the next one in the
//! order the server sent them. Nothing here consults a trust store.

use crate::models::{extract_cn, Issue, IssueType};
use tracing::debug;
use x509_parser::prelude::*;

/// Verify that each certificate's signature was produced by the key of the
/// certificate after it. Verification failures are reported as `false`.
pub fn verify_chain_linkage(chain: &[X509Certificate<'_>]) -> bool {
    chain.windows(2).enumerate().all(|(i, pair)| {
        let (child, parent) = (&pair[0], &pair[1]);
        match child.verify_signature(Some(parent.public_key())) {
            Ok(()) => true,
            Err(e) => {
                debug!("Signature of certificate {} not made by certificate {}: {}", i, i + 1, e);
                false
            }
        }
    })
}

/// Issue raised when linkage fails and trust diagnosis has not already
/// reported an incomplete chain
pub fn linkage_issue() -> Issue {
    Issue::critical(
        IssueType::IncompleteChain,
        "Invalid certificate chain",
        "The chain signatures are inconsistent: a certificate was not signed \
         by the next certificate in the chain. The server may be sending \
         certificates in the wrong order or from different chains.",
    )
}

/// Match a hostname against one certificate name
///
/// `*.example.com` matches exactly one extra label: `foo.example.com`, but
/// neither `example.com` nor `a.b.example.com`.
pub fn matches_hostname(hostname: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("*.") {
        return match hostname.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest.eq_ignore_ascii_case(suffix),
            None => false,
        };
    }

    hostname.eq_ignore_ascii_case(pattern)
}

/// DNS-name Subject Alternative Names, in certificate order
pub fn extract_dns_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    match cert.subject_alternative_name() {
        Ok(Some(san_ext)) => san_ext
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                _ => None,
            })
            .collect(),
        Ok(None) => Vec::new(),
        Err(e) => {
            debug!("Unreadable subjectAltName extension: {}", e);
            Vec::new()
        }
    }
}

/// Check the hostname against the leaf's DNS SANs, falling back to the
/// subject CN only when there are none
pub fn verify_hostname(hostname: &str, leaf: &X509Certificate<'_>) -> bool {
    let sans = extract_dns_sans(leaf);
    if !sans.is_empty() {
        return sans.iter().any(|san| matches_hostname(hostname, san));
    }

    let subject = leaf.subject().to_string();
    extract_cn(&subject).is_some_and(|cn| matches_hostname(hostname, cn))
}

/// Issue raised on hostname mismatch, naming every SAN the leaf carries
pub fn hostname_mismatch_issue(hostname: &str, sans: &[String]) -> Issue {
    let names = if sans.is_empty() {
        "none".to_string()
    } else {
        sans.join(", ")
    };

    Issue::critical(
        IssueType::HostnameMismatch,
        "Hostname does not match",
        format!(
            "The certificate is not valid for '{}'. Names in certificate: {}",
            hostname, names
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case() {
        assert!(matches_hostname("Example.COM", "example.com"));
        assert!(!matches_hostname("www.example.com", "example.com"));
    }

    #[test]
    fn test_wildcard_single_label() {
        assert!(matches_hostname("foo.example.com", "*.example.com"));
        assert!(matches_hostname("FOO.Example.com", "*.EXAMPLE.com"));
        assert!(!matches_hostname("example.com", "*.example.com"));
        assert!(!matches_hostname("a.b.example.com", "*.example.com"));
        assert!(!matches_hostname(".example.com", "*.example.com"));
        assert!(!matches_hostname("localhost", "*.localhost"));
    }

    #[test]
    fn test_mismatch_issue_lists_sans() {
        let issue = hostname_mismatch_issue(
            "api.example.org",
            &["example.com".to_string(), "*.example.com".to_string()],
        );
        assert_eq!(issue.issue_type, IssueType::HostnameMismatch);
        assert!(issue.description.contains("api.example.org"));
        assert!(issue.description.contains("example.com, *.example.com"));

        let issue = hostname_mismatch_issue("a.example", &[]);
        assert!(issue.description.contains("none"));
    }

    #[test]
    fn test_single_certificate_chain_is_linked() {
        assert!(verify_chain_linkage(&[]));
    }
}
