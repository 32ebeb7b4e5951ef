use certcheck::checks::analyze_cipher_suite;
use certcheck::models::{CipherStrength, IssueType};

fn platforms(cipher: &str, version: &str) -> Vec<(String, bool)> {
    let (analysis, _) = analyze_cipher_suite(cipher, Some(version));
    analysis
        .compatibility
        .into_iter()
        .map(|c| (c.platform, c.supported))
        .collect()
}

#[test]
fn test_tls13_suite() {
    let (analysis, issues) = analyze_cipher_suite("TLS_AES_256_GCM_SHA384", Some("TLSv1.3"));

    assert!(issues.is_empty());
    assert!(analysis.is_tls13);
    assert!(analysis.is_aead);
    assert!(analysis.forward_secrecy);
    assert_eq!(analysis.key_exchange, "N/A (TLS 1.3)");
    assert_eq!(analysis.encryption, "AES-256-GCM");
    assert_eq!(analysis.mac, "SHA384");
    assert_eq!(analysis.strength, CipherStrength::Strong);

    assert_eq!(
        platforms("TLS_AES_256_GCM_SHA384", "TLSv1.3"),
        vec![
            ("Android 10+".to_string(), true),
            ("iOS 12.2+ / Safari".to_string(), true),
            ("Chrome / Edge / Firefox".to_string(), true),
            ("Legacy systems".to_string(), false),
        ]
    );
}

#[test]
fn test_modern_tls12_suite() {
    let cipher = "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256";
    let (analysis, issues) = analyze_cipher_suite(cipher, Some("TLSv1.2"));

    assert!(issues.is_empty());
    assert_eq!(analysis.key_exchange, "ECDHE");
    assert_eq!(analysis.encryption, "AES-128-GCM");
    assert_eq!(analysis.mac, "SHA256");
    assert!(analysis.forward_secrecy);
    assert!(!analysis.is_tls13);

    assert!(platforms(cipher, "TLSv1.2").iter().all(|(_, supported)| *supported));
}

#[test]
fn test_dhe_blocks_ios() {
    let cipher = "TLS_DHE_RSA_WITH_AES_256_GCM_SHA384";
    let (analysis, issues) = analyze_cipher_suite(cipher, Some("TLSv1.2"));

    assert!(issues.is_empty());
    let ios = &analysis.compatibility[1];
    assert_eq!(ios.platform, "iOS / Safari");
    assert!(!ios.supported);
    assert!(ios.detail.contains("DHE"));
}

#[test]
fn test_static_rsa_lacks_forward_secrecy() {
    let (analysis, issues) =
        analyze_cipher_suite("TLS_RSA_WITH_AES_128_CBC_SHA", Some("TLSv1.2"));

    assert_eq!(analysis.strength, CipherStrength::Acceptable);
    assert!(!analysis.forward_secrecy);
    assert!(!analysis.is_aead);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::CipherNoForwardSecrecy);
    assert!(!analysis.compatibility[2].supported);
}

#[test]
fn test_rc4_is_weak() {
    let (analysis, issues) = analyze_cipher_suite("SSL_RSA_WITH_RC4_128_MD5", Some("TLSv1"));

    assert_eq!(analysis.strength, CipherStrength::Weak);
    assert_eq!(analysis.mac, "MD5");
    let types: Vec<IssueType> = issues.iter().map(|i| i.issue_type).collect();
    assert_eq!(
        types,
        vec![IssueType::CipherWeak, IssueType::CipherNoForwardSecrecy]
    );
}

#[test]
fn test_unrecognized_name_never_fails() {
    let (analysis, _) = analyze_cipher_suite("GARBAGE", None);
    assert_eq!(analysis.name, "GARBAGE");
    assert_eq!(analysis.key_exchange, "Unknown");
    assert_eq!(analysis.compatibility.len(), 4);
}
