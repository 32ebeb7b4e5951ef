//! Cipher suite decomposition and compatibility scoring
//!
//! Splits an IANA cipher suite identifier into key exchange, encryption and
//! MAC components, grades its strength and estimates which client platforms
//! can negotiate it.

use crate::models::{
    CipherAnalysis, CipherComponents, CipherStrength, Issue, IssueType, PlatformCompatibility,
};

/// Key exchange reported for TLS 1.3 suites, which negotiate it separately
pub const TLS13_KEY_EXCHANGE: &str = "N/A (TLS 1.3)";

const UNKNOWN: &str = "Unknown";

const WEAK_ENCRYPTION: &[&str] = &["RC4", "DES", "3DES", "NULL", "EXPORT"];
const AEAD_ENCRYPTION: &[&str] = &["GCM", "CCM", "CHACHA20", "POLY1305"];
const FORWARD_SECRET_KX: &[&str] = &["ECDHE", "DHE", TLS13_KEY_EXCHANGE];
const IOS_UNSUPPORTED_ENCRYPTION: &[&str] = &["ARIA", "CAMELLIA", "SEED", "CCM8"];

/// Analyze the negotiated cipher suite, returning the analysis and the
/// issues it raises
pub fn analyze_cipher_suite(cipher: &str, tls_version: Option<&str>) -> (CipherAnalysis, Vec<Issue>) {
    let is_tls13 = is_tls13_suite(cipher, tls_version);
    let components = parse_components(cipher, is_tls13);
    let strength = evaluate_strength(&components);
    let forward_secrecy = FORWARD_SECRET_KX.contains(&components.key_exchange.as_str());
    let is_aead = contains_any(&components.encryption.to_uppercase(), AEAD_ENCRYPTION);

    let mut issues = Vec::new();

    if strength == CipherStrength::Weak {
        issues.push(Issue::warning(
            IssueType::CipherWeak,
            "Weak cipher suite",
            format!(
                "The cipher '{}' uses algorithms considered weak. \
                 A modern cipher (AES-GCM, ChaCha20) is recommended.",
                cipher
            ),
        ));
    }

    if !forward_secrecy && !is_tls13 {
        issues.push(Issue::warning(
            IssueType::CipherNoForwardSecrecy,
            "No forward secrecy",
            format!(
                "The cipher '{}' does not use ECDHE or DHE. Without forward secrecy, \
                 a compromised server private key exposes all past traffic.",
                cipher
            ),
        ));
    }

    let compatibility = evaluate_compatibility(cipher, is_tls13, &components);

    let analysis = CipherAnalysis {
        name: cipher.to_string(),
        key_exchange: components.key_exchange,
        encryption: components.encryption,
        mac: components.mac,
        strength,
        forward_secrecy,
        is_tls13,
        is_aead,
        compatibility,
    };

    (analysis, issues)
}

/// A suite is treated as TLS 1.3 when 1.3 was negotiated, or when the name
/// has the 1.3 shape (`TLS_` prefix and no `WITH` marker)
pub fn is_tls13_suite(cipher: &str, tls_version: Option<&str>) -> bool {
    tls_version == Some("TLSv1.3") || (cipher.starts_with("TLS_") && !cipher.contains("WITH"))
}

/// Parse an IANA cipher suite name into its components. Never fails:
/// unrecognized shapes yield `Unknown` parts.
///
/// TLS 1.3: `TLS_AES_256_GCM_SHA384`
/// TLS 1.2: `TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256`
pub fn parse_components(cipher: &str, is_tls13: bool) -> CipherComponents {
    if is_tls13 {
        let parts = cipher.strip_prefix("TLS_").unwrap_or(cipher);
        let mac = mac_suffix(parts, &["SHA384", "SHA256"]);
        let encryption = strip_mac(parts, &mac).replace('_', "-");
        return CipherComponents {
            key_exchange: TLS13_KEY_EXCHANGE.to_string(),
            encryption,
            mac,
        };
    }

    match cipher.find("_WITH_") {
        Some(with_index) if with_index > 0 => {
            let kx_part = &cipher[..with_index];
            let kx_part = kx_part
                .strip_prefix("TLS_")
                .or_else(|| kx_part.strip_prefix("SSL_"))
                .unwrap_or(kx_part);
            let rest = &cipher[with_index + "_WITH_".len()..];

            let mac = mac_suffix(rest, &["SHA384", "SHA256", "SHA", "MD5"]);
            let encryption = strip_mac(rest, &mac).replace('_', "-");

            CipherComponents {
                key_exchange: key_exchange_family(kx_part),
                encryption,
                mac,
            }
        }
        _ => CipherComponents {
            key_exchange: UNKNOWN.to_string(),
            encryption: cipher.to_string(),
            mac: UNKNOWN.to_string(),
        },
    }
}

fn key_exchange_family(kx_part: &str) -> String {
    let family = if kx_part.starts_with("ECDHE") {
        "ECDHE"
    } else if kx_part.starts_with("DHE") {
        "DHE"
    } else if kx_part.starts_with("RSA") {
        "RSA"
    } else if kx_part.starts_with("ECDH_") {
        "ECDH"
    } else if kx_part.starts_with("DH_") {
        "DH"
    } else {
        kx_part.split('_').next().unwrap_or(kx_part)
    };
    family.to_string()
}

/// First known MAC token the name ends with, else the last `_` segment
fn mac_suffix(name: &str, known: &[&str]) -> String {
    known
        .iter()
        .find(|mac| name.ends_with(*mac))
        .map(|mac| mac.to_string())
        .unwrap_or_else(|| name.rsplit('_').next().unwrap_or(name).to_string())
}

fn strip_mac<'a>(name: &'a str, mac: &str) -> &'a str {
    name.strip_suffix(mac)
        .and_then(|head| head.strip_suffix('_'))
        .unwrap_or(name)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Grade a parsed suite. Weak markers win over AEAD markers.
pub fn evaluate_strength(components: &CipherComponents) -> CipherStrength {
    let enc = components.encryption.to_uppercase();
    let mac = components.mac.to_uppercase();

    if contains_any(&enc, WEAK_ENCRYPTION) || mac == "MD5" {
        return CipherStrength::Weak;
    }

    if contains_any(&enc, AEAD_ENCRYPTION) {
        return CipherStrength::Strong;
    }

    // AES-CBC and friends with a SHA-family MAC
    CipherStrength::Acceptable
}

/// Platform verdicts, always in this order: recent Android, iOS/Safari,
/// modern browsers, legacy systems
pub fn evaluate_compatibility(
    cipher: &str,
    is_tls13: bool,
    components: &CipherComponents,
) -> Vec<PlatformCompatibility> {
    let enc = components.encryption.to_uppercase();
    let kx = components.key_exchange.to_uppercase();
    let modern_encryption = enc.contains("AES") || enc.contains("CHACHA20");

    let mut compatibility = Vec::with_capacity(4);

    // Android 10 (API 29) added TLS 1.3; Android 8 (API 26) covers modern 1.2 suites
    compatibility.push(if is_tls13 {
        PlatformCompatibility {
            platform: "Android 10+".to_string(),
            supported: true,
            detail: "TLS 1.3 supported natively since Android 10 (API 29)".to_string(),
        }
    } else {
        PlatformCompatibility {
            platform: "Android 8+".to_string(),
            supported: modern_encryption,
            detail: if modern_encryption {
                "Cipher supported on Android 8+ (API 26+)".to_string()
            } else {
                format!("'{}' may be unavailable on some Android versions", cipher)
            },
        }
    });

    // iOS accepts ECDHE but not DHE, and a narrow set of encryption families
    if is_tls13 {
        compatibility.push(PlatformCompatibility {
            platform: "iOS 12.2+ / Safari".to_string(),
            supported: true,
            detail: "TLS 1.3 supported since iOS 12.2".to_string(),
        });
    } else {
        let dhe_unsupported = kx == "DHE";
        let encryption_unsupported = contains_any(&enc, IOS_UNSUPPORTED_ENCRYPTION);
        let supported = !dhe_unsupported && !encryption_unsupported && modern_encryption;

        let detail = if dhe_unsupported {
            "iOS does not support DHE ciphers (ECDHE only). \
             This blocks Safari and native iOS apps"
                .to_string()
        } else if encryption_unsupported {
            format!(
                "iOS does not support {}. This blocks Safari and native iOS apps",
                components.encryption
            )
        } else if !supported {
            "This cipher may not be supported by iOS".to_string()
        } else {
            "Cipher supported on iOS / Safari".to_string()
        };

        compatibility.push(PlatformCompatibility {
            platform: "iOS / Safari".to_string(),
            supported,
            detail,
        });
    }

    let browsers_supported = is_tls13
        || (modern_encryption && FORWARD_SECRET_KX.iter().any(|fs| kx == fs.to_uppercase()));
    compatibility.push(PlatformCompatibility {
        platform: "Chrome / Edge / Firefox".to_string(),
        supported: browsers_supported,
        detail: if browsers_supported {
            "Supported by modern browsers".to_string()
        } else {
            "This cipher may be rejected by recent browsers".to_string()
        },
    });

    let legacy_detail = if is_tls13 {
        "Older systems (before Windows 10, Android 10, IE 11) do not support TLS 1.3"
    } else if kx == "RSA" && enc.contains("AES") {
        "Compatible with older systems (IE 11, Java 7, ...)"
    } else if kx == "ECDHE" && enc.contains("AES") {
        "Compatible with most systems (Java 8+, Windows 7+)"
    } else {
        "Compatibility varies between systems"
    };
    compatibility.push(PlatformCompatibility {
        platform: "Legacy systems".to_string(),
        supported: !is_tls13,
        detail: legacy_detail.to_string(),
    });

    compatibility
}
