//! Platform trust evaluation
//!
//! Validates a presented chain against the operating system's root store
//! (loaded with rustls-native-certs) and, when that fails, works out the
//! most likely reason a mobile client would reject it.

use crate::models::{Issue, IssueType};
use rustls::client::verify_server_cert_signed_by_trust_anchor;
use rustls::pki_types::{CertificateDer, UnixTime};
use rustls::server::ParsedCertificate;
use rustls::RootCertStore;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use x509_parser::prelude::*;

/// Trust anchors plus the subject names they were loaded from
pub struct TrustAnchors {
    roots: RootCertStore,
    subjects: HashSet<String>,
}

impl TrustAnchors {
    /// An anchor set that trusts nothing
    pub fn empty() -> Self {
        Self {
            roots: RootCertStore::empty(),
            subjects: HashSet::new(),
        }
    }

    /// Load the operating system's root store. Certificates that fail to
    /// load are logged and skipped.
    pub fn system() -> Self {
        let result = rustls_native_certs::load_native_certs();

        for error in &result.errors {
            warn!("Error when loading native certs: {}", error);
        }

        let anchors = Self::from_certificates(result.certs);
        debug!("Loaded {} platform trust anchors", anchors.len());
        anchors
    }

    /// Build an anchor set from DER root certificates
    pub fn from_certificates<I>(certs: I) -> Self
    where
        I: IntoIterator<Item = CertificateDer<'static>>,
    {
        let mut anchors = Self::empty();

        for cert in certs {
            match X509Certificate::from_der(cert.as_ref()) {
                Ok((_, parsed)) => {
                    anchors.subjects.insert(parsed.subject().to_string());
                }
                Err(e) => {
                    debug!("Skipping unparsable root certificate: {}", e);
                    continue;
                }
            }

            if let Err(e) = anchors.roots.add(cert) {
                debug!("Invalid root certificate: {}", e);
            }
        }

        anchors
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether a root with exactly this subject DN is in the store
    pub fn contains_subject(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    /// Validate `chain` (leaf first) up to a trust anchor at `now`.
    ///
    /// Signature chaining, validity windows and basic constraints are
    /// checked; the hostname is not. Any failure means untrusted.
    pub fn is_trusted_by_platform(&self, chain: &[CertificateDer<'_>], now: UnixTime) -> bool {
        let Some((leaf, intermediates)) = chain.split_first() else {
            return false;
        };

        let leaf = match ParsedCertificate::try_from(leaf) {
            Ok(leaf) => leaf,
            Err(e) => {
                debug!("Failed to parse end entity certificate: {}", e);
                return false;
            }
        };

        let provider = rustls::crypto::ring::default_provider();
        match verify_server_cert_signed_by_trust_anchor(
            &leaf,
            &self.roots,
            intermediates,
            now,
            provider.signature_verification_algorithms.all,
        ) {
            Ok(()) => true,
            Err(e) => {
                debug!("Platform trust verification failed: {}", e);
                false
            }
        }
    }

    /// Explain an untrusted chain. First match wins: self-signed leaf,
    /// incomplete chain, unknown root, then a generic platform failure.
    pub fn diagnose_trust_failure(&self, chain: &[X509Certificate<'_>]) -> Issue {
        if let [only] = chain {
            if only.subject() == only.issuer() {
                return Issue::critical(
                    IssueType::SelfSigned,
                    "Self-signed certificate",
                    "The server presents a self-signed certificate. Mobile platforms \
                     reject it because no trusted CA signed it. Browsers may show a \
                     warning and let the user continue.",
                );
            }
        }

        let Some(last) = chain.last() else {
            return platform_trust_issue();
        };

        if last.subject() != last.issuer() {
            return Issue::critical(
                IssueType::IncompleteChain,
                "Incomplete certificate chain",
                format!(
                    "The server does not send all intermediate certificates. Browsers \
                     can complete the chain through AIA fetching or their cache, but \
                     mobile platforms do not. The missing intermediate is issued by \
                     '{}'. The server must include every intermediate in its TLS \
                     configuration.",
                    last.issuer()
                ),
            );
        }

        let root_subject = last.subject().to_string();
        if !self.contains_subject(&root_subject) {
            return Issue::critical(
                IssueType::UntrustedRoot,
                "Root CA not recognized by the platform",
                format!(
                    "The root CA '{}' is not in the platform trust store. Browsers \
                     with their own trust store may still accept it. This often \
                     happens with new or regional CAs.",
                    root_subject
                ),
            );
        }

        platform_trust_issue()
    }
}

impl Default for TrustAnchors {
    fn default() -> Self {
        Self::empty()
    }
}

fn platform_trust_issue() -> Issue {
    Issue::critical(
        IssueType::AndroidSpecificTrustIssue,
        "Not trusted by the platform",
        "The certificate is not trusted by the platform trust store and the \
         exact cause could not be determined. Check the server's TLS configuration.",
    )
}

/// Convert a chrono instant for rustls, clamping pre-epoch instants to the
/// epoch
pub fn unix_time(now: chrono::DateTime<chrono::Utc>) -> UnixTime {
    let secs = u64::try_from(now.timestamp()).unwrap_or(0);
    UnixTime::since_unix_epoch(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_anchors() {
        let anchors = TrustAnchors::empty();
        assert!(anchors.is_empty());
        assert!(!anchors.contains_subject("CN=Anything"));
        assert!(!anchors.is_trusted_by_platform(&[], UnixTime::now()));
    }

    #[test]
    fn test_empty_chain_diagnosis_falls_back() {
        let issue = TrustAnchors::empty().diagnose_trust_failure(&[]);
        assert_eq!(issue.issue_type, IssueType::AndroidSpecificTrustIssue);
    }

    #[test]
    fn test_unix_time_clamps() {
        let epoch = chrono::DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(unix_time(epoch).as_secs(), 0);
        let before = chrono::DateTime::from_timestamp(-10, 0).unwrap();
        assert_eq!(unix_time(before).as_secs(), 0);
    }
}
