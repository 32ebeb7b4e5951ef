//! Watch command implementation
//!
//! Re-checks saved hosts on an interval, records every result and raises
//! alerts for upcoming expiry, hosts that stop being valid and failed
//! connections.

use crate::config::{Settings, WatchSettings};
use crate::models::{CheckStatus, Favorite};
use crate::output::{print_error, print_info, print_warning};
use crate::runner::{parse_host_and_port, Checker};
use crate::store::{ChangeDetection, CheckRepository, HistoryEntry, JsonFileRepository, MemoryRepository};
use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Something the user should be told about after a round of checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The leaf expires within the alert threshold
    ExpiringSoon { target: String, days: i64 },
    /// The previous check was OK and this one is not
    BecameInvalid { target: String, changes: Vec<String> },
    /// The check could not complete
    CheckFailed { target: String, error: String },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::ExpiringSoon { target, days } => {
                write!(f, "Certificate expiring soon: {} expires in {} days", target, days)
            }
            Alert::BecameInvalid { target, changes } => {
                write!(f, "Certificate invalid: {}: {}", target, changes.join(", "))
            }
            Alert::CheckFailed { target, error } => {
                write!(f, "Connection error: {}: {}", target, error)
            }
        }
    }
}

/// Alerts raised by one recorded check. Nothing is raised when alerts are
/// disabled globally or for this favorite.
pub fn alerts_for(
    favorite: &Favorite,
    entry: &HistoryEntry,
    changes: Option<&ChangeDetection>,
    settings: &WatchSettings,
) -> Vec<Alert> {
    if !settings.notifications_enabled || !favorite.notifications_enabled {
        return Vec::new();
    }

    let target = favorite.target();
    let mut alerts = Vec::new();

    if let Some(days) = entry.days_until_expiry {
        if days <= settings.alert_threshold_days {
            alerts.push(Alert::ExpiringSoon {
                target: target.clone(),
                days,
            });
        }
    }

    if let Some(changes) = changes {
        if changes.previous_status == CheckStatus::Ok && changes.new_status != CheckStatus::Ok {
            alerts.push(Alert::BecameInvalid {
                target: target.clone(),
                changes: changes.changes.clone(),
            });
        }
    }

    if let Some(error) = &entry.error {
        alerts.push(Alert::CheckFailed {
            target,
            error: error.clone(),
        });
    }

    alerts
}

/// Check every favorite once, record the results and collect alerts
pub async fn run_round(
    checker: &Arc<Checker>,
    repository: &mut dyn CheckRepository,
    settings: &WatchSettings,
) -> Result<Vec<Alert>> {
    let mut alerts = Vec::new();

    for favorite in repository.favorites() {
        let worker = Arc::clone(checker);
        let target = favorite.target();
        let result = tokio::task::spawn_blocking(move || worker.check(&target))
            .await
            .context("check task failed")?;

        print_status_line(&favorite, &result.overall_status(), result.error.as_deref());

        let entry = match repository.record(favorite.id, &result) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to record result for {}: {}", favorite.target(), e);
                continue;
            }
        };
        let changes = repository.check_changes(favorite.id);

        if let Some(changes) = &changes {
            debug!("{}: {}", favorite.target(), changes.changes.join("; "));
        }

        alerts.extend(alerts_for(&favorite, &entry, changes.as_ref(), settings));
    }

    Ok(alerts)
}

fn print_status_line(favorite: &Favorite, status: &CheckStatus, error: Option<&str>) {
    let status_text = match status {
        CheckStatus::Ok => style(format!("{} {}", status.icon(), status)).green(),
        CheckStatus::Warning => style(format!("{} {}", status.icon(), status)).yellow(),
        CheckStatus::Critical | CheckStatus::Error => {
            style(format!("{} {}", status.icon(), status)).red()
        }
    };

    println!(
        "{} {} {}{}",
        style(format!("[{}]", Utc::now().format("%Y-%m-%d %H:%M:%S"))).dim(),
        status_text,
        favorite.target(),
        error
            .map(|e| format!(" • {}", style(e).red()))
            .unwrap_or_default()
    );
}

/// Run the watch command over a single host (kept in memory) or over the
/// favorites saved in `store`
pub async fn run_watch(
    host: Option<&str>,
    port: Option<u16>,
    interval_secs: Option<u64>,
    count: u64,
    store: &Path,
    settings: Settings,
) -> Result<()> {
    let mut repository: Box<dyn CheckRepository> = match host {
        Some(host) => {
            let default_port = port.unwrap_or(settings.check.default_port);
            let (hostname, port) = parse_host_and_port(host, default_port)?;
            let mut memory = MemoryRepository::new();
            memory.add_favorite(&hostname, port)?;
            Box::new(memory)
        }
        None => Box::new(
            JsonFileRepository::open(store)
                .with_context(|| format!("Failed to open store {}", store.display()))?,
        ),
    };

    if repository.favorites().is_empty() {
        print_warning("No favorites saved. Add one with 'certcheck favorites add <HOST>'.");
        return Ok(());
    }

    let interval = interval_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.watch.interval());

    println!(
        "\n{} Watching {} host(s) (interval: {}s, press Ctrl+C to stop)\n",
        style("👁").cyan(),
        style(repository.favorites().len()).yellow().bold(),
        interval.as_secs()
    );

    let checker = Arc::new(Checker::new(settings.check.clone()));
    let mut rounds = 0u64;

    loop {
        rounds += 1;

        match run_round(&checker, repository.as_mut(), &settings.watch).await {
            Ok(alerts) => {
                for alert in alerts {
                    warn!("{}", alert);
                    println!("{} {}", style("ALERT:").red().bold(), alert);
                }
            }
            Err(e) => print_error(&format!("{:#}", e)),
        }

        if count > 0 && rounds >= count {
            print_info("Watch limit reached, stopping");
            break;
        }

        tokio::select! {
            _ = sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                print_info("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::TrustAnchors;
    use crate::config::CheckSettings;
    use crate::models::CheckResult;
    use crate::utils::StoreError;

    fn entry(days: Option<i64>, error: Option<&str>) -> HistoryEntry {
        HistoryEntry {
            id: 1,
            favorite_id: 1,
            hostname: "example.com".to_string(),
            port: 443,
            checked_at: Utc::now(),
            overall_status: if error.is_some() { CheckStatus::Error } else { CheckStatus::Ok },
            trusted_by_platform: true,
            hostname_matches: true,
            chain_valid: true,
            issues_summary: String::new(),
            certificate_fingerprint: None,
            days_until_expiry: days,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_expiry_alert_threshold() {
        let favorite = Favorite::new(1, "example.com", 443);
        let settings = WatchSettings::default();

        let alerts = alerts_for(&favorite, &entry(Some(30), None), None, &settings);
        assert_eq!(
            alerts,
            vec![Alert::ExpiringSoon {
                target: "example.com:443".to_string(),
                days: 30
            }]
        );

        assert!(alerts_for(&favorite, &entry(Some(31), None), None, &settings).is_empty());
    }

    #[test]
    fn test_status_transition_and_error_alerts() {
        let favorite = Favorite::new(1, "example.com", 443);
        let settings = WatchSettings::default();
        let changes = ChangeDetection {
            favorite_id: 1,
            hostname: "example.com".to_string(),
            changes: vec!["Status changed from OK to ERROR".to_string()],
            new_status: CheckStatus::Error,
            previous_status: CheckStatus::Ok,
        };

        let alerts = alerts_for(
            &favorite,
            &entry(None, Some("ConnectionError: TimedOut: timed out")),
            Some(&changes),
            &settings,
        );
        assert_eq!(alerts.len(), 2);
        assert!(matches!(alerts[0], Alert::BecameInvalid { .. }));
        assert!(matches!(alerts[1], Alert::CheckFailed { .. }));
        assert!(alerts[1].to_string().contains("TimedOut"));
    }

    #[test]
    fn test_muted_favorite_raises_nothing() {
        let mut favorite = Favorite::new(1, "example.com", 443);
        favorite.notifications_enabled = false;
        let alerts = alerts_for(
            &favorite,
            &entry(Some(1), Some("boom")),
            None,
            &WatchSettings::default(),
        );
        assert!(alerts.is_empty());
    }

    /// Memory store whose `record` fails for one favorite
    struct FailingRecord {
        inner: MemoryRepository,
        fail_for: u64,
    }

    impl CheckRepository for FailingRecord {
        fn add_favorite(&mut self, hostname: &str, port: u16) -> Result<Favorite, StoreError> {
            self.inner.add_favorite(hostname, port)
        }

        fn remove_favorite(&mut self, id: u64) -> Result<(), StoreError> {
            self.inner.remove_favorite(id)
        }

        fn set_notifications(&mut self, id: u64, enabled: bool) -> Result<(), StoreError> {
            self.inner.set_notifications(id, enabled)
        }

        fn favorites(&self) -> Vec<Favorite> {
            self.inner.favorites()
        }

        fn find_favorite(&self, hostname: &str, port: u16) -> Option<Favorite> {
            self.inner.find_favorite(hostname, port)
        }

        fn record(
            &mut self,
            favorite_id: u64,
            result: &CheckResult,
        ) -> Result<HistoryEntry, StoreError> {
            if favorite_id == self.fail_for {
                return Err(StoreError::WriteError {
                    path: "store.json".to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.inner.record(favorite_id, result)
        }

        fn history(&self, favorite_id: u64) -> Vec<HistoryEntry> {
            self.inner.history(favorite_id)
        }
    }

    #[tokio::test]
    async fn test_record_failure_does_not_stop_the_round() {
        let mut inner = MemoryRepository::new();
        let first = inner.add_favorite("127.0.0.1", 1).unwrap();
        let second = inner.add_favorite("127.0.0.1", 2).unwrap();
        let mut repository = FailingRecord {
            inner,
            fail_for: first.id,
        };

        let settings = CheckSettings {
            connect_timeout_secs: 2,
            read_timeout_secs: 2,
            ..CheckSettings::default()
        };
        let checker = Arc::new(Checker::with_anchors(
            settings,
            Arc::new(TrustAnchors::empty()),
        ));

        let alerts = run_round(&checker, &mut repository, &WatchSettings::default())
            .await
            .unwrap();

        assert!(repository.history(first.id).is_empty());
        assert_eq!(repository.history(second.id).len(), 1);
        assert_eq!(alerts.len(), 1);
        assert!(matches!(
            &alerts[0],
            Alert::CheckFailed { target, .. } if target == "127.0.0.1:2"
        ));
    }
}
