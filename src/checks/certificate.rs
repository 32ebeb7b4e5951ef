//! Per-certificate analysis
//!
//! Extracts the fields of one X.509 certificate using x509-parser and
//! raises the expiry, SAN, signature and key-strength issues that apply to
//! its position in the chain.

use crate::models::certificate::days_between;
use crate::models::{extract_cn, CertificateInfo, Fingerprints, Issue, IssueType};
use crate::utils::CheckError;
use chrono::{DateTime, TimeZone, Utc};
use rustls::pki_types::CertificateDer;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;
use x509_parser::public_key::{PublicKey, RSAPublicKey};

use super::chain::extract_dns_sans;

/// Signature algorithms mobile platforms consider broken
const WEAK_SIGNATURES: &[&str] = &["SHA1withRSA", "MD5withRSA", "MD2withRSA"];

const MIN_RSA_BITS: u32 = 2048;
const MIN_EC_BITS: u32 = 256;

/// Certificate analyzer
pub struct CertificateAnalyzer {
    expiry_warning_days: i64,
}

impl CertificateAnalyzer {
    /// Create an analyzer with the default 30-day expiry warning window
    pub fn new() -> Self {
        Self {
            expiry_warning_days: 30,
        }
    }

    /// Warn when the leaf expires within this many days
    pub fn with_expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// Analyze the certificate at `position` in `chain` as of now
    pub fn analyze(
        &self,
        chain: &[CertificateDer<'_>],
        position: usize,
    ) -> Result<(CertificateInfo, Vec<Issue>), CheckError> {
        self.analyze_at(chain, position, Utc::now())
    }

    /// Analyze the certificate at `position` in `chain` as of `now`
    pub fn analyze_at(
        &self,
        chain: &[CertificateDer<'_>],
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<(CertificateInfo, Vec<Issue>), CheckError> {
        let der = chain.get(position).ok_or_else(|| CheckError::Certificate {
            message: format!(
                "no certificate at position {} in a chain of {}",
                position,
                chain.len()
            ),
        })?;
        let cert = parse_der(der)?;

        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();
        let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;

        let signature_algorithm =
            signature_algorithm_name(&cert.signature_algorithm.algorithm.to_id_string());
        let (public_key_algorithm, public_key_size) = public_key_info(&cert);
        let subject_alt_names = extract_dns_sans(&cert);

        let is_self_signed = cert.subject() == cert.issuer();
        let is_trust_anchor = is_self_signed && position + 1 == chain.len();

        let is_expired = now > not_after;
        let is_not_yet_valid = now < not_before;
        let days_until_expiry = days_between(now, not_after);

        let info = CertificateInfo {
            position,
            subject,
            issuer,
            serial_number: cert.serial.to_str_radix(16),
            not_before,
            not_after,
            signature_algorithm,
            public_key_algorithm,
            public_key_size,
            subject_alt_names,
            is_expired,
            is_not_yet_valid,
            is_self_signed,
            is_trust_anchor,
            fingerprints: Fingerprints {
                sha256: fingerprint::<Sha256>(der),
                sha1: fingerprint::<Sha1>(der),
            },
            version: cert.version().0 + 1, // X.509 version is 0-indexed
            days_until_expiry,
        };

        let issues = self.issues_for(&info);
        Ok((info, issues))
    }

    fn issues_for(&self, info: &CertificateInfo) -> Vec<Issue> {
        let mut issues = Vec::new();
        let position = info.position;
        let cn = extract_cn(&info.subject).unwrap_or(&info.subject);

        if info.is_expired {
            issues.push(Issue::critical(
                IssueType::Expired,
                format!("Certificate expired (position {})", position),
                format!(
                    "The certificate for '{}' expired on {}.",
                    cn,
                    format_instant(info.not_after)
                ),
            ));
        } else if info.is_not_yet_valid {
            issues.push(Issue::critical(
                IssueType::NotYetValid,
                format!("Certificate not yet valid (position {})", position),
                format!(
                    "The certificate for '{}' becomes valid on {}.",
                    cn,
                    format_instant(info.not_before)
                ),
            ));
        } else if position == 0 && info.days_until_expiry <= self.expiry_warning_days {
            issues.push(Issue::warning(
                IssueType::ExpiringSoon,
                "Certificate expiring soon",
                format!(
                    "The certificate expires in {} days ({}).",
                    info.days_until_expiry,
                    format_instant(info.not_after)
                ),
            ));
        }

        if position == 0 && info.subject_alt_names.is_empty() {
            issues.push(Issue::critical(
                IssueType::NoSans,
                "No Subject Alternative Name",
                "The certificate has no SAN extension. Android and iOS ignore the \
                 Common Name and require hostnames to be listed in the SAN.",
            ));
        }

        if WEAK_SIGNATURES.contains(&info.signature_algorithm.as_str()) {
            issues.push(Issue::warning(
                IssueType::WeakSignature,
                format!("Weak signature algorithm (position {})", position),
                format!(
                    "The signature algorithm {} is considered insecure and may be \
                     rejected by recent platforms.",
                    info.signature_algorithm
                ),
            ));
        }

        if is_weak_key(&info.public_key_algorithm, info.public_key_size) {
            issues.push(Issue::warning(
                IssueType::WeakKey,
                format!("Weak key (position {})", position),
                format!(
                    "The {} key is {} bits. At least {} bits for RSA or {} bits \
                     for EC is recommended.",
                    info.public_key_algorithm, info.public_key_size, MIN_RSA_BITS, MIN_EC_BITS
                ),
            ));
        }

        issues
    }
}

impl Default for CertificateAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one DER certificate, mapping parser failures to `CheckError`
pub fn parse_der<'a>(der: &'a CertificateDer<'_>) -> Result<X509Certificate<'a>, CheckError> {
    X509Certificate::from_der(der.as_ref())
        .map(|(_, cert)| cert)
        .map_err(|e| CheckError::Certificate {
            message: format!("Failed to parse certificate: {}", e),
        })
}

fn is_weak_key(algorithm: &str, bits: u32) -> bool {
    match algorithm {
        "RSA" | "RSASSA-PSS" => bits > 0 && bits < MIN_RSA_BITS,
        "EC" => bits > 0 && bits < MIN_EC_BITS,
        _ => false,
    }
}

/// Conventional name for a signature algorithm OID (`SHA256withRSA`, ...)
pub fn signature_algorithm_name(oid: &str) -> String {
    let name = match oid {
        "1.2.840.113549.1.1.2" => "MD2withRSA",
        "1.2.840.113549.1.1.4" => "MD5withRSA",
        "1.2.840.113549.1.1.5" => "SHA1withRSA",
        "1.2.840.113549.1.1.10" => "RSASSA-PSS",
        "1.2.840.113549.1.1.11" => "SHA256withRSA",
        "1.2.840.113549.1.1.12" => "SHA384withRSA",
        "1.2.840.113549.1.1.13" => "SHA512withRSA",
        "1.2.840.113549.1.1.14" => "SHA224withRSA",
        "1.2.840.10045.4.1" => "SHA1withECDSA",
        "1.2.840.10045.4.3.1" => "SHA224withECDSA",
        "1.2.840.10045.4.3.2" => "SHA256withECDSA",
        "1.2.840.10045.4.3.3" => "SHA384withECDSA",
        "1.2.840.10045.4.3.4" => "SHA512withECDSA",
        "1.2.840.10040.4.3" => "SHA1withDSA",
        "1.3.101.112" => "Ed25519",
        "1.3.101.113" => "Ed448",
        _ => return oid.to_string(),
    };
    name.to_string()
}

/// Public key algorithm name and size in bits (0 when unknown)
fn public_key_info(cert: &X509Certificate<'_>) -> (String, u32) {
    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_id_string();

    match alg_oid.as_str() {
        "1.2.840.113549.1.1.1" => {
            let bits = match spki.parsed() {
                Ok(PublicKey::RSA(rsa)) => modulus_bits(rsa.modulus),
                _ => 0,
            };
            ("RSA".to_string(), bits)
        }
        // Same RSAPublicKey body, which `parsed()` only decodes for rsaEncryption
        "1.2.840.113549.1.1.10" => {
            let bits = RSAPublicKey::from_der(&spki.subject_public_key.data)
                .map(|(_, rsa)| modulus_bits(rsa.modulus))
                .unwrap_or(0);
            ("RSASSA-PSS".to_string(), bits)
        }
        "1.2.840.10045.2.1" => {
            let curve_bits = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .and_then(|oid| curve_bits(&oid.to_id_string()));
            let bits = curve_bits.unwrap_or_else(|| point_bits(spki.subject_public_key.data.len()));
            ("EC".to_string(), bits)
        }
        "1.2.840.10040.4.1" => ("DSA".to_string(), 0),
        "1.3.101.112" => ("Ed25519".to_string(), 0),
        "1.3.101.113" => ("Ed448".to_string(), 0),
        _ => (alg_oid, 0),
    }
}

/// Bit length of a big-endian unsigned integer
fn modulus_bits(modulus: &[u8]) -> u32 {
    let significant = match modulus.iter().position(|b| *b != 0) {
        Some(first) => &modulus[first..],
        None => return 0,
    };
    (significant.len() as u32 - 1) * 8 + (8 - significant[0].leading_zeros())
}

fn curve_bits(curve_oid: &str) -> Option<u32> {
    match curve_oid {
        "1.2.840.10045.3.1.7" => Some(256), // P-256
        "1.3.132.0.34" => Some(384),        // P-384
        "1.3.132.0.35" => Some(521),        // P-521
        "1.3.132.0.10" => Some(256),        // secp256k1
        "1.2.840.10045.3.1.1" => Some(192), // P-192
        "1.3.132.0.33" => Some(224),        // P-224
        _ => None,
    }
}

/// Curve size from an uncompressed point's length
fn point_bits(point_len: usize) -> u32 {
    match point_len {
        49 => 192,
        57 => 224,
        65 => 256,
        97 => 384,
        133 => 521,
        _ => 0,
    }
}

fn fingerprint<D: Digest>(der: &[u8]) -> String {
    D::digest(der)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CheckError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| CheckError::Certificate {
            message: "Invalid timestamp in certificate".to_string(),
        })
}
