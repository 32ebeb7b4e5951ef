//! JSON output formatter

use crate::models::{CheckResult, CheckStatus};
use serde::Serialize;
use std::path::Path;

/// JSON-serializable output structure
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub overall_status: CheckStatus,
    #[serde(flatten)]
    pub result: &'a CheckResult,
}

impl<'a> From<&'a CheckResult> for JsonOutput<'a> {
    fn from(result: &'a CheckResult) -> Self {
        Self {
            overall_status: result.overall_status(),
            result,
        }
    }
}

/// Serialize a result, including its derived overall status
pub fn to_json(result: &CheckResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonOutput::from(result))?)
}

/// Serialize several results as one JSON array
pub fn to_json_array(results: &[CheckResult]) -> anyhow::Result<String> {
    let outputs: Vec<JsonOutput<'_>> = results.iter().map(JsonOutput::from).collect();
    Ok(serde_json::to_string_pretty(&outputs)?)
}

/// Print a CheckResult as JSON to stdout
pub fn print_json(result: &CheckResult) -> anyhow::Result<()> {
    println!("{}", to_json(result)?);
    Ok(())
}

/// Write a CheckResult as JSON to a file
pub fn write_json_file(result: &CheckResult, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, to_json(result)?)?;
    Ok(())
}
