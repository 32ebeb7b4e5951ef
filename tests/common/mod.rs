//! Throwaway PKI for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyPair, KeyUsagePurpose,
};
use rustls::pki_types::CertificateDer;

pub struct Issued {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issued {
    pub fn der(&self) -> CertificateDer<'static> {
        self.cert.der().clone()
    }
}

/// The current instant truncated to whole seconds, matching certificate
/// time precision
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
}

/// Convert a chrono instant to what rcgen expects, at second precision
pub fn to_offset(at: DateTime<Utc>) -> time::OffsetDateTime {
    time::OffsetDateTime::from_unix_timestamp(at.timestamp()).unwrap()
}

fn ca_params(name: &str, now: DateTime<Utc>) -> CertificateParams {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, name);
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    params.not_before = to_offset(now - chrono::Duration::days(1));
    params.not_after = to_offset(now + chrono::Duration::days(3650));
    params
}

pub fn root(name: &str, now: DateTime<Utc>) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = ca_params(name, now).self_signed(&key).unwrap();
    Issued { cert, key }
}

pub fn intermediate(name: &str, issuer: &Issued, now: DateTime<Utc>) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = ca_params(name, now)
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap();
    Issued { cert, key }
}

/// Leaf parameters for `sans`, valid from yesterday for 90 days
pub fn leaf_params(cn: &str, sans: &[&str], now: DateTime<Utc>) -> CertificateParams {
    let mut params =
        CertificateParams::new(sans.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    params.is_ca = IsCa::NoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params.not_before = to_offset(now - chrono::Duration::days(1));
    params.not_after = to_offset(now + chrono::Duration::days(90));
    params
}

pub fn leaf_from(params: CertificateParams, issuer: &Issued) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
    Issued { cert, key }
}

pub fn leaf(cn: &str, sans: &[&str], issuer: &Issued, now: DateTime<Utc>) -> Issued {
    leaf_from(leaf_params(cn, sans, now), issuer)
}

pub fn self_signed_leaf(cn: &str, sans: &[&str], now: DateTime<Utc>) -> Issued {
    let key = KeyPair::generate().unwrap();
    let cert = leaf_params(cn, sans, now).self_signed(&key).unwrap();
    Issued { cert, key }
}

/// Root, intermediate and a leaf for `example.com` / `*.example.com`
pub struct Pki {
    pub root: Issued,
    pub intermediate: Issued,
    pub leaf: Issued,
}

impl Pki {
    pub fn new(now: DateTime<Utc>) -> Self {
        let root = root("Test Root CA", now);
        let intermediate = intermediate("Test Intermediate CA", &root, now);
        let leaf = leaf(
            "example.com",
            &["example.com", "*.example.com"],
            &intermediate,
            now,
        );
        Self {
            root,
            intermediate,
            leaf,
        }
    }

    /// Leaf, intermediate, root
    pub fn full_chain(&self) -> Vec<CertificateDer<'static>> {
        vec![self.leaf.der(), self.intermediate.der(), self.root.der()]
    }
}
