//! Table rendering using comfy-table

use crate::models::CheckResult;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, ContentArrangement, Table};

/// Format a table with headers and rows, indented for terminal output
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    // Constrain table width to terminal width minus indent, default to 120 if detection fails
    let width = console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols)
        .unwrap_or(120)
        .saturating_sub(4);
    table.set_width(width);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .iter()
            .map(|cell_text| {
                let mut cell = Cell::new(cell_text);
                // Color status cells
                if cell_text.contains("✓") {
                    cell = cell.fg(Color::Green);
                } else if cell_text.contains("⚠") {
                    cell = cell.fg(Color::Yellow);
                } else if cell_text.contains("✗") {
                    cell = cell.fg(Color::Red);
                }
                cell
            })
            .collect();
        table.add_row(cells);
    }

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// One row per host: status, negotiation, leaf expiry and top issue
pub fn batch_rows(results: &[CheckResult]) -> Vec<Vec<String>> {
    results
        .iter()
        .map(|result| {
            let status = result.overall_status();
            let leaf_days = result
                .leaf()
                .map(|leaf| leaf.days_until_expiry.to_string())
                .unwrap_or_else(|| "-".to_string());
            let detail = match (&result.error, result.issues.first()) {
                (Some(error), _) => error.clone(),
                (None, Some(issue)) => format!("{} ({} total)", issue.title, result.issues.len()),
                (None, None) => String::new(),
            };

            vec![
                format!("{}:{}", result.hostname, result.port),
                format!("{} {}", status.icon(), status),
                result.tls_version.clone().unwrap_or_else(|| "-".to_string()),
                leaf_days,
                detail,
            ]
        })
        .collect()
}

/// Print the batch results table
pub fn print_batch_table(results: &[CheckResult]) {
    let headers = ["Host", "Status", "Protocol", "Days left", "Issues"];
    print!("{}", format_table(&headers, &batch_rows(results)));
}
