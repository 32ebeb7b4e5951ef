//! Check orchestration engine
//!
//! Drives one inspection end to end: parse the target, capture the
//! handshake, then run every verification stage over the captured chain and
//! merge their findings into a single `CheckResult`. Every stage runs even
//! when an earlier one found problems.

use crate::checks::certificate::parse_der;
use crate::checks::chain::{extract_dns_sans, hostname_mismatch_issue, linkage_issue};
use crate::checks::trust::unix_time;
use crate::checks::{
    analyze_cipher_suite, check_chain_length, check_tls_version, perform_handshake,
    verify_chain_linkage, verify_hostname, CertificateAnalyzer, Handshake, TrustAnchors,
};
use crate::config::CheckSettings;
use crate::models::{sort_by_severity, CheckResult, IssueType};
use crate::utils::CheckError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use x509_parser::prelude::X509Certificate;

/// Check a host against the platform trust store with default settings.
///
/// `host_input` may carry an `http://` or `https://` scheme, a path and a
/// `:port` suffix. This never fails: problems are reported in the result.
pub fn check(host_input: &str, default_port: u16) -> CheckResult {
    Checker::new(CheckSettings::default()).check_with_port(host_input, default_port)
}

/// Split user input into a hostname and port.
///
/// The scheme and anything from the first `/` are dropped. A `:port`
/// suffix overrides `default_port` when it parses as a port number.
pub fn parse_host_and_port(input: &str, default_port: u16) -> Result<(String, u16), CheckError> {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim();

    let host_part = match without_scheme.find('/') {
        Some(index) => &without_scheme[..index],
        None => without_scheme,
    };

    let (host, port) = match host_part.rsplit_once(':') {
        Some((host, port_text)) => {
            let port = port_text
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .unwrap_or(default_port);
            (host, port)
        }
        None => (host_part, default_port),
    };

    let host = host.trim();
    if host.is_empty() {
        return Err(CheckError::EmptyHostname);
    }

    Ok((host.to_string(), port))
}

/// Runs checks with fixed settings and trust anchors.
///
/// Holds no mutable state, so one checker can serve concurrent checks.
pub struct Checker {
    settings: CheckSettings,
    anchors: Arc<TrustAnchors>,
    analyzer: CertificateAnalyzer,
}

impl Checker {
    /// Create a checker backed by the operating system's root store
    pub fn new(settings: CheckSettings) -> Self {
        Self::with_anchors(settings, Arc::new(TrustAnchors::system()))
    }

    /// Create a checker with an explicit trust anchor set
    pub fn with_anchors(settings: CheckSettings, anchors: Arc<TrustAnchors>) -> Self {
        let analyzer =
            CertificateAnalyzer::new().with_expiry_warning_days(settings.expiry_warning_days);
        Self {
            settings,
            anchors,
            analyzer,
        }
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Check using the configured default port
    pub fn check(&self, host_input: &str) -> CheckResult {
        self.check_with_port(host_input, self.settings.default_port)
    }

    /// Check `host_input`, using `default_port` when the input names none
    pub fn check_with_port(&self, host_input: &str, default_port: u16) -> CheckResult {
        let now = Utc::now();

        let (hostname, port) = match parse_host_and_port(host_input, default_port) {
            Ok(target) => target,
            Err(e) => return CheckResult::failed("", default_port, now, e.to_string()),
        };

        info!("Checking {}:{}", hostname, port);

        let handshake = match perform_handshake(&hostname, port, &self.settings) {
            Ok(handshake) => handshake,
            Err(e) => {
                warn!("Handshake with {}:{} failed: {}", hostname, port, e);
                return CheckResult::failed(hostname, port, now, e.to_string());
            }
        };

        let result = self.assemble(&hostname, port, handshake, now);
        info!(
            "{}:{} {} ({} issues)",
            hostname,
            port,
            result.overall_status(),
            result.issues.len()
        );
        result
    }

    /// Build the result for a captured handshake, evaluated at `now`.
    ///
    /// Failures keep whatever protocol and cipher were negotiated.
    pub fn assemble(
        &self,
        hostname: &str,
        port: u16,
        handshake: Handshake,
        now: DateTime<Utc>,
    ) -> CheckResult {
        match self.try_assemble(hostname, port, &handshake, now) {
            Ok(result) => result,
            Err(e) => {
                warn!("Analysis of {}:{} failed: {}", hostname, port, e);
                let mut result = CheckResult::failed(hostname, port, now, e.to_string());
                result.tls_version = Some(handshake.tls_version);
                result.cipher_suite = Some(handshake.cipher_suite);
                result
            }
        }
    }

    fn try_assemble(
        &self,
        hostname: &str,
        port: u16,
        handshake: &Handshake,
        now: DateTime<Utc>,
    ) -> Result<CheckResult, CheckError> {
        let chain = &handshake.certificates;
        if chain.is_empty() {
            return Err(CheckError::NoCertificate);
        }

        let parsed = chain
            .iter()
            .map(parse_der)
            .collect::<Result<Vec<X509Certificate<'_>>, _>>()?;
        let leaf = &parsed[0];

        let mut issues = Vec::new();

        let trusted_by_platform = self.anchors.is_trusted_by_platform(chain, unix_time(now));
        if !trusted_by_platform {
            issues.push(self.anchors.diagnose_trust_failure(&parsed));
        }

        let hostname_matches = verify_hostname(hostname, leaf);
        if !hostname_matches {
            issues.push(hostname_mismatch_issue(hostname, &extract_dns_sans(leaf)));
        }

        let chain_valid = verify_chain_linkage(&parsed);
        if !chain_valid
            && !issues
                .iter()
                .any(|issue| issue.issue_type == IssueType::IncompleteChain)
        {
            issues.push(linkage_issue());
        }

        let mut certificates = Vec::with_capacity(chain.len());
        for position in 0..chain.len() {
            let (info, cert_issues) = self.analyzer.analyze_at(chain, position, now)?;
            certificates.push(info);
            issues.extend(cert_issues);
        }

        issues.extend(check_tls_version(&handshake.tls_version));
        issues.extend(check_chain_length(chain.len(), self.settings.max_chain_length));

        let (cipher_analysis, cipher_issues) =
            analyze_cipher_suite(&handshake.cipher_suite, Some(&handshake.tls_version));
        issues.extend(cipher_issues);

        sort_by_severity(&mut issues);

        debug!(
            "{}: trusted={} hostname={} chain={}",
            hostname, trusted_by_platform, hostname_matches, chain_valid
        );

        Ok(CheckResult {
            hostname: hostname.to_string(),
            port,
            timestamp: now,
            tls_version: Some(handshake.tls_version.clone()),
            cipher_suite: Some(handshake.cipher_suite.clone()),
            cipher_analysis: Some(cipher_analysis),
            certificates,
            chain_valid,
            trusted_by_platform,
            hostname_matches,
            issues,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        assert_eq!(
            parse_host_and_port("https://example.com:8443/path", 443).unwrap(),
            ("example.com".to_string(), 8443)
        );
        assert_eq!(
            parse_host_and_port("example.com", 443).unwrap(),
            ("example.com".to_string(), 443)
        );
        assert_eq!(
            parse_host_and_port("  http://example.com/a/b  ", 443).unwrap(),
            ("example.com".to_string(), 443)
        );
    }

    #[test]
    fn test_unparsable_port_uses_default() {
        assert_eq!(
            parse_host_and_port("example.com:abc", 443).unwrap(),
            ("example.com".to_string(), 443)
        );
        assert_eq!(
            parse_host_and_port("example.com:", 8443).unwrap(),
            ("example.com".to_string(), 8443)
        );
        assert_eq!(
            parse_host_and_port("example.com:70000", 443).unwrap(),
            ("example.com".to_string(), 443)
        );
    }

    #[test]
    fn test_blank_host_rejected() {
        for input in ["", "   ", "https://", "http:///path", ":443"] {
            assert_eq!(
                parse_host_and_port(input, 443).unwrap_err(),
                CheckError::EmptyHostname,
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_check_empty_host_returns_error_result() {
        let checker = Checker::with_anchors(CheckSettings::default(), Arc::new(TrustAnchors::empty()));
        let result = checker.check("https://");
        assert_eq!(result.error.as_deref(), Some("empty hostname"));
        assert!(result.certificates.is_empty());
        assert!(result.tls_version.is_none());
    }

    #[test]
    fn test_assemble_without_certificates_keeps_negotiation() {
        let checker = Checker::with_anchors(CheckSettings::default(), Arc::new(TrustAnchors::empty()));
        let handshake = Handshake {
            certificates: Vec::new(),
            tls_version: "TLSv1.3".to_string(),
            cipher_suite: "TLS_AES_128_GCM_SHA256".to_string(),
        };
        let result = checker.assemble("example.com", 443, handshake, Utc::now());
        assert_eq!(result.error.as_deref(), Some("no certificate received"));
        assert_eq!(result.tls_version.as_deref(), Some("TLSv1.3"));
        assert_eq!(result.cipher_suite.as_deref(), Some("TLS_AES_128_GCM_SHA256"));
    }
}
