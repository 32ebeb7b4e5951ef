//! Favorites command implementation

use crate::cli::FavoriteAction;
use crate::output::{format_table, print_info, print_success};
use crate::runner::parse_host_and_port;
use crate::store::{CheckRepository, JsonFileRepository};
use crate::utils::Result;
use std::path::Path;

/// Run a favorites subcommand against the store at `store`
pub fn run_favorites(action: &FavoriteAction, store: &Path, default_port: u16) -> Result<()> {
    let mut repository = JsonFileRepository::open(store)?;

    match action {
        FavoriteAction::Add { host, port } => {
            let (hostname, port) = parse_host_and_port(host, port.unwrap_or(default_port))?;
            let favorite = repository.add_favorite(&hostname, port)?;
            print_success(&format!("Saved {} as #{}", favorite.target(), favorite.id));
        }
        FavoriteAction::Remove { id } => {
            repository.remove_favorite(*id)?;
            print_success(&format!("Removed favorite #{}", id));
        }
        FavoriteAction::Notify { id, off } => {
            repository.set_notifications(*id, !off)?;
            let state = if *off { "disabled" } else { "enabled" };
            print_success(&format!("Alerts {} for favorite #{}", state, id));
        }
        FavoriteAction::List => {
            let favorites = repository.favorites();
            if favorites.is_empty() {
                print_info("No favorites saved");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = favorites
                .iter()
                .map(|f| {
                    vec![
                        f.id.to_string(),
                        f.target(),
                        f.created_at.format("%Y-%m-%d").to_string(),
                        f.last_checked_at
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| "never".to_string()),
                        if f.notifications_enabled { "✓ on" } else { "✗ off" }.to_string(),
                    ]
                })
                .collect();

            print!(
                "{}",
                format_table(&["ID", "Host", "Added", "Last checked", "Alerts"], &rows)
            );
        }
        FavoriteAction::History { id } => {
            let history = repository.history(*id);
            if history.is_empty() {
                print_info(&format!("No history for favorite #{}", id));
                return Ok(());
            }

            let rows: Vec<Vec<String>> = history
                .iter()
                .map(|entry| {
                    vec![
                        entry.checked_at.format("%Y-%m-%d %H:%M").to_string(),
                        format!("{} {}", entry.overall_status.icon(), entry.overall_status),
                        entry
                            .days_until_expiry
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        entry
                            .error
                            .clone()
                            .unwrap_or_else(|| entry.issues_summary.clone()),
                    ]
                })
                .collect();

            print!(
                "{}",
                format_table(&["Checked", "Status", "Days left", "Issues"], &rows)
            );

            if let Some(changes) = repository.check_changes(*id) {
                print_info(&format!("Latest changes: {}", changes.changes.join("; ")));
            }
        }
    }

    Ok(())
}
