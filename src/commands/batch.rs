//! Batch check command implementation

use crate::config::CheckSettings;
use crate::models::{CheckResult, CheckStatus};
use crate::output::{print_batch_summary, print_batch_table, to_json_array};
use crate::runner::Checker;
use crate::utils::progress::create_progress_bar;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Hosts listed in a batch file: one per line, blank lines and `#`
/// comments skipped
pub fn parse_host_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Check every host on an independent blocking task, at most `parallel`
/// at a time
pub async fn check_all(
    checker: Arc<Checker>,
    hosts: Vec<String>,
    parallel: usize,
    show_progress: bool,
) -> Vec<CheckResult> {
    let pb = show_progress.then(|| create_progress_bar(hosts.len() as u64, "Checking hosts"));

    let results: Vec<CheckResult> = stream::iter(hosts)
        .map(|host| {
            let checker = Arc::clone(&checker);
            async move {
                let target = host.clone();
                let port = checker.settings().default_port;
                match tokio::task::spawn_blocking(move || checker.check(&target)).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Check task for {} failed: {}", host, e);
                        CheckResult::failed(host, port, Utc::now(), format!("TaskError: {}", e))
                    }
                }
            }
        })
        .buffer_unordered(parallel.max(1))
        .inspect(|_| {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        })
        .collect()
        .await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    results
}

/// Run the batch check command. Returns true when any host is CRITICAL or
/// failed.
pub async fn run_batch(
    file: &Path,
    parallel: usize,
    settings: CheckSettings,
    json: bool,
    issues_only: bool,
) -> Result<bool> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to open file: {}", file.display()))?;
    let hosts = parse_host_list(&content);

    if hosts.is_empty() {
        bail!("No hosts found in {}", file.display());
    }

    let checker = Arc::new(Checker::new(settings));
    let results = check_all(checker, hosts, parallel, !json).await;

    let any_failure = results.iter().any(|r| {
        matches!(
            r.overall_status(),
            CheckStatus::Critical | CheckStatus::Error
        )
    });

    let display_results: Vec<CheckResult> = if issues_only {
        results
            .iter()
            .filter(|r| r.overall_status() != CheckStatus::Ok)
            .cloned()
            .collect()
    } else {
        results.clone()
    };

    if json {
        println!("{}", to_json_array(&display_results)?);
    } else {
        println!();
        print_batch_table(&display_results);
        print_batch_summary(&results);
    }

    Ok(any_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_list() {
        let content = "# production\nexample.com\n\n  https://api.example.com:8443/health  \n# old\n";
        assert_eq!(
            parse_host_list(content),
            vec![
                "example.com".to_string(),
                "https://api.example.com:8443/health".to_string()
            ]
        );
    }
}
