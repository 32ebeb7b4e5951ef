//! Rich terminal output formatting

use crate::models::{
    CertificateInfo, CheckResult, CheckStatus, CipherAnalysis, CipherStrength, Issue, Severity,
};
use console::style;
use std::fmt::Write as _;

/// Print section header
pub fn print_header(title: &str) {
    print!("{}", format_header(title));
}

fn format_header(title: &str) -> String {
    format!("\n{}\n\n", style(format!("━━━ {} ━━━", title)).cyan().bold())
}

/// Print a full check result
pub fn print_result(result: &CheckResult, verbose: bool) {
    print!("{}", format_result(result, verbose));
}

/// Render a full check result as terminal text
pub fn format_result(result: &CheckResult, verbose: bool) -> String {
    let mut out = String::new();
    let status = result.overall_status();

    let _ = writeln!(
        out,
        "{} {}:{}  {}",
        status_styled(status),
        style(&result.hostname).bold(),
        result.port,
        style(result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")).dim()
    );

    if let Some(error) = &result.error {
        let _ = writeln!(out, "  {} {}", style("Error:").red().bold(), error);
        write_negotiation(&mut out, result);
        return out;
    }

    let _ = writeln!(
        out,
        "  Platform trust: {}   Hostname: {}   Chain: {}",
        yes_no(result.trusted_by_platform),
        yes_no(result.hostname_matches),
        yes_no(result.chain_valid)
    );

    write_negotiation(&mut out, result);

    if let Some(analysis) = &result.cipher_analysis {
        write_cipher(&mut out, analysis, verbose);
    }

    out.push_str(&format_header("Certificate Chain"));
    for cert in &result.certificates {
        write_certificate(&mut out, cert, verbose);
    }

    out.push_str(&format_header("Issues"));
    if result.issues.is_empty() {
        let _ = writeln!(out, "  {} No issues found", style("✓").green().bold());
    }
    for issue in &result.issues {
        write_issue(&mut out, issue);
    }

    out
}

fn write_negotiation(out: &mut String, result: &CheckResult) {
    if let Some(version) = &result.tls_version {
        let _ = writeln!(out, "  Protocol: {}", version);
    }
    if let Some(cipher) = &result.cipher_suite {
        let _ = writeln!(out, "  Cipher:   {}", cipher);
    }
}

fn write_cipher(out: &mut String, analysis: &CipherAnalysis, verbose: bool) {
    out.push_str(&format_header("Cipher Suite"));

    let strength = match analysis.strength {
        CipherStrength::Strong => style(analysis.strength.to_string()).green(),
        CipherStrength::Acceptable => style(analysis.strength.to_string()).yellow(),
        CipherStrength::Weak => style(analysis.strength.to_string()).red().bold(),
    };

    let _ = writeln!(out, "  {}  {}", style(&analysis.name).bold(), strength);
    let _ = writeln!(
        out,
        "  Key exchange: {}  Encryption: {}  MAC: {}",
        analysis.key_exchange, analysis.encryption, analysis.mac
    );
    let _ = writeln!(
        out,
        "  Forward secrecy: {}  AEAD: {}",
        yes_no(analysis.forward_secrecy),
        yes_no(analysis.is_aead)
    );

    out.push('\n');
    for compat in &analysis.compatibility {
        let mark = if compat.supported {
            style("✓").green()
        } else {
            style("✗").red()
        };
        let _ = write!(out, "  {} {}", mark, compat.platform);
        if verbose || !compat.supported {
            let _ = write!(out, " {}", style(format!("({})", compat.detail)).dim());
        }
        out.push('\n');
    }
}

fn write_certificate(out: &mut String, cert: &CertificateInfo, verbose: bool) {
    let _ = writeln!(
        out,
        "  {} {}",
        style(format!("[{}] {}", cert.position, cert.label())).cyan().bold(),
        cert.subject_cn()
    );
    let _ = writeln!(out, "      Issuer:     {}", cert.issuer);
    let _ = writeln!(
        out,
        "      Valid:      {} to {}",
        cert.not_before.format("%Y-%m-%d"),
        cert.not_after.format("%Y-%m-%d")
    );
    let _ = writeln!(out, "      Expires in: {}", format_expiry_days(cert.days_until_expiry));
    let _ = writeln!(
        out,
        "      Key:        {} {} bits, {}",
        cert.public_key_algorithm, cert.public_key_size, cert.signature_algorithm
    );

    if cert.position == 0 && !cert.subject_alt_names.is_empty() {
        let _ = writeln!(out, "      SANs:       {}", cert.subject_alt_names.join(", "));
    }

    if verbose {
        let _ = writeln!(out, "      Subject:    {}", cert.subject);
        let _ = writeln!(out, "      Serial:     {}", cert.serial_number);
        let _ = writeln!(out, "      Version:    v{}", cert.version);
        let _ = writeln!(out, "      SHA-256:    {}", cert.fingerprints.sha256);
        let _ = writeln!(out, "      SHA-1:      {}", cert.fingerprints.sha1);
    }
}

fn write_issue(out: &mut String, issue: &Issue) {
    let icon = match issue.severity {
        Severity::Critical => style(issue.severity.icon()).red().bold(),
        Severity::Warning => style(issue.severity.icon()).yellow().bold(),
        Severity::Info => style(issue.severity.icon()).blue(),
    };
    let _ = writeln!(
        out,
        "  {} {} {}",
        icon,
        style(&issue.title).bold(),
        style(format!("[{}]", issue.issue_type)).dim()
    );
    let _ = writeln!(out, "      {}", issue.description);
}

fn status_styled(status: CheckStatus) -> String {
    let text = format!("{} {}", status.icon(), status);
    match status {
        CheckStatus::Ok => style(text).green().bold().to_string(),
        CheckStatus::Warning => style(text).yellow().bold().to_string(),
        CheckStatus::Critical | CheckStatus::Error => style(text).red().bold().to_string(),
    }
}

fn yes_no(value: bool) -> String {
    if value {
        style("yes").green().to_string()
    } else {
        style("no").red().to_string()
    }
}

pub(crate) fn format_expiry_days(days: i64) -> String {
    if days < 0 {
        style(format!("Expired {} days ago", days.abs()))
            .red()
            .to_string()
    } else if days == 0 {
        style("Expires today!").red().bold().to_string()
    } else if days <= 7 {
        style(format!("{} days (critical)", days))
            .red()
            .bold()
            .to_string()
    } else if days <= 30 {
        style(format!("{} days (warning)", days))
            .yellow()
            .to_string()
    } else {
        style(format!("{} days", days)).green().to_string()
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print batch check summary
pub fn print_batch_summary(results: &[CheckResult]) {
    print_header("Batch Check Summary");

    let count = |status: CheckStatus| {
        results
            .iter()
            .filter(|r| r.overall_status() == status)
            .count()
    };

    println!("  Total hosts checked: {}", style(results.len()).bold());
    println!("  OK: {}", style(count(CheckStatus::Ok)).green());
    println!("  Warning: {}", style(count(CheckStatus::Warning)).yellow());
    println!("  Critical: {}", style(count(CheckStatus::Critical)).red());
    println!("  Failed: {}", style(count(CheckStatus::Error)).red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_error_result_rendering() {
        console::set_colors_enabled(false);
        let result = CheckResult::failed("example.com", 443, Utc::now(), "empty hostname");
        let text = format_result(&result, false);
        assert!(text.contains("ERROR"));
        assert!(text.contains("example.com:443"));
        assert!(text.contains("empty hostname"));
        assert!(!text.contains("Certificate Chain"));
    }

    #[test]
    fn test_expiry_days_text() {
        console::set_colors_enabled(false);
        assert_eq!(format_expiry_days(-3), "Expired 3 days ago");
        assert_eq!(format_expiry_days(0), "Expires today!");
        assert_eq!(format_expiry_days(20), "20 days (warning)");
        assert_eq!(format_expiry_days(90), "90 days");
    }
}
