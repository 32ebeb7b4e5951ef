//! Certificate information types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SHA-256 and SHA-1 digests of a certificate's DER encoding, formatted as
/// uppercase colon-separated hex pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprints {
    pub sha256: String,
    pub sha1: String,
}

/// Analysis of one certificate in the presented chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Position in the chain as received (0 = leaf)
    pub position: usize,
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Serial number (lowercase hex, no separators)
    pub serial_number: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// Signature algorithm name (e.g. `SHA256withRSA`)
    pub signature_algorithm: String,
    /// Public key algorithm name (`RSA`, `EC`, `Ed25519`, ...)
    pub public_key_algorithm: String,
    /// Public key size in bits (0 when unknown)
    pub public_key_size: u32,
    /// DNS-name Subject Alternative Names
    pub subject_alt_names: Vec<String>,
    pub is_expired: bool,
    pub is_not_yet_valid: bool,
    pub is_self_signed: bool,
    /// Self-signed and last in the chain
    pub is_trust_anchor: bool,
    pub fingerprints: Fingerprints,
    /// X.509 version (1-based)
    pub version: u32,
    /// Whole days until `not_after` at analysis time, negative once expired
    pub days_until_expiry: i64,
}

impl CertificateInfo {
    /// Days until expiry relative to `now`, truncated toward zero, negative if expired
    pub fn days_until_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        days_between(now, self.not_after)
    }

    /// Human label for this certificate's place in the chain
    pub fn label(&self) -> String {
        if self.position == 0 {
            "Leaf".to_string()
        } else if self.is_trust_anchor {
            "Root CA".to_string()
        } else {
            format!("Intermediate CA #{}", self.position)
        }
    }

    /// Common name from the subject, falling back to the full subject
    pub fn subject_cn(&self) -> &str {
        extract_cn(&self.subject).unwrap_or(&self.subject)
    }
}

/// Whole days from `from` to `to`, truncating toward zero like integer
/// division of milliseconds by 86,400,000
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds() / 86_400_000
}

/// Extract the common name from a distinguished name string
///
/// DN format: "CN=example.com, O=Example Inc, ..."
pub fn extract_cn(dn: &str) -> Option<&str> {
    dn.split(',')
        .map(str::trim)
        .find(|part| part.len() > 3 && part[..3].eq_ignore_ascii_case("CN="))
        .map(|part| &part[3..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(position: usize, anchor: bool) -> CertificateInfo {
        let now = Utc::now();
        CertificateInfo {
            position,
            subject: "CN=example.com, O=Example Inc".to_string(),
            issuer: "CN=Example CA".to_string(),
            serial_number: "0a1b".to_string(),
            not_before: now - Duration::days(10),
            not_after: now + Duration::days(10),
            signature_algorithm: "SHA256withRSA".to_string(),
            public_key_algorithm: "RSA".to_string(),
            public_key_size: 2048,
            subject_alt_names: vec!["example.com".to_string()],
            is_expired: false,
            is_not_yet_valid: false,
            is_self_signed: anchor,
            is_trust_anchor: anchor,
            fingerprints: Fingerprints::default(),
            version: 3,
            days_until_expiry: 10,
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(sample(0, false).label(), "Leaf");
        assert_eq!(sample(1, false).label(), "Intermediate CA #1");
        assert_eq!(sample(2, true).label(), "Root CA");
    }

    #[test]
    fn test_extract_cn() {
        assert_eq!(extract_cn("CN=example.com, O=Example Inc"), Some("example.com"));
        assert_eq!(extract_cn("C=US, O=Org, cn=Lower"), Some("Lower"));
        assert_eq!(extract_cn("O=No Common Name"), None);
        assert_eq!(sample(0, false).subject_cn(), "example.com");
    }

    #[test]
    fn test_days_between_truncates_partial_days() {
        let now = Utc::now();
        assert_eq!(days_between(now, now + Duration::hours(23)), 0);
        assert_eq!(days_between(now, now + Duration::days(10) + Duration::hours(5)), 10);
        assert_eq!(days_between(now, now - Duration::days(3)), -3);
        assert_eq!(days_between(now, now - Duration::days(3) - Duration::hours(5)), -3);
    }
}
