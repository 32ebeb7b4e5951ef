//! Check command implementation

use crate::config::CheckSettings;
use crate::models::CheckResult;
use crate::output::{print_json, print_result, print_success, write_json_file};
use crate::runner::Checker;
use crate::utils::progress::create_spinner;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the check command. Returns the result so the caller can derive the
/// exit status.
pub async fn run_check(
    host: &str,
    port: Option<u16>,
    settings: CheckSettings,
    json: bool,
    output: Option<&Path>,
    verbose: bool,
) -> Result<CheckResult> {
    let default_port = port.unwrap_or(settings.default_port);

    let spinner = (!json).then(|| create_spinner(&format!("Checking {}...", host)));

    let target = host.to_string();
    let result = tokio::task::spawn_blocking(move || {
        Checker::new(settings).check_with_port(&target, default_port)
    })
    .await
    .context("check task failed")?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        print_json(&result)?;
    } else {
        print_result(&result, verbose);
    }

    if let Some(path) = output {
        write_json_file(&result, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !json {
            print_success(&format!("Result written to {}", path.display()));
        }
    }

    Ok(result)
}
