//! Favorites and check history
//!
//! The repository persists a summary of each check rather than the full
//! result, and compares the two most recent summaries to detect changes.

mod file;
mod memory;

pub use file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::models::{CheckResult, CheckStatus, Favorite};
use crate::utils::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted summary of one check of a favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub favorite_id: u64,
    pub hostname: String,
    pub port: u16,
    pub checked_at: DateTime<Utc>,
    pub overall_status: CheckStatus,
    pub trusted_by_platform: bool,
    pub hostname_matches: bool,
    pub chain_valid: bool,
    /// `TYPE: title` pairs joined by `; `
    pub issues_summary: String,
    /// SHA-256 fingerprint of the leaf
    pub certificate_fingerprint: Option<String>,
    pub days_until_expiry: Option<i64>,
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Summarize `result` for storage
    pub fn from_result(id: u64, favorite_id: u64, result: &CheckResult) -> Self {
        let leaf = result.leaf();
        Self {
            id,
            favorite_id,
            hostname: result.hostname.clone(),
            port: result.port,
            checked_at: result.timestamp,
            overall_status: result.overall_status(),
            trusted_by_platform: result.trusted_by_platform,
            hostname_matches: result.hostname_matches,
            chain_valid: result.chain_valid,
            issues_summary: result
                .issues
                .iter()
                .map(|issue| format!("{}: {}", issue.issue_type, issue.title))
                .collect::<Vec<_>>()
                .join("; "),
            certificate_fingerprint: leaf.map(|cert| cert.fingerprints.sha256.clone()),
            days_until_expiry: leaf.map(|cert| cert.days_until_expiry),
            error: result.error.clone(),
        }
    }
}

/// Differences between the two most recent checks of a favorite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDetection {
    pub favorite_id: u64,
    pub hostname: String,
    pub changes: Vec<String>,
    pub new_status: CheckStatus,
    pub previous_status: CheckStatus,
}

/// Compare two history entries, returning `None` when nothing changed
pub fn detect_changes(previous: &HistoryEntry, current: &HistoryEntry) -> Option<ChangeDetection> {
    let mut changes = Vec::new();

    if previous.overall_status != current.overall_status {
        changes.push(format!(
            "Status changed from {} to {}",
            previous.overall_status, current.overall_status
        ));
    }

    if previous.trusted_by_platform != current.trusted_by_platform {
        changes.push(format!(
            "Platform trust changed: {} -> {}",
            previous.trusted_by_platform, current.trusted_by_platform
        ));
    }

    if previous.certificate_fingerprint != current.certificate_fingerprint {
        changes.push("Certificate fingerprint changed".to_string());
    }

    if previous.days_until_expiry != current.days_until_expiry {
        changes.push(format!(
            "Days until expiry changed: {} -> {}",
            display_days(previous.days_until_expiry),
            display_days(current.days_until_expiry)
        ));
    }

    if changes.is_empty() {
        return None;
    }

    Some(ChangeDetection {
        favorite_id: current.favorite_id,
        hostname: current.hostname.clone(),
        changes,
        new_status: current.overall_status,
        previous_status: previous.overall_status,
    })
}

fn display_days(days: Option<i64>) -> String {
    days.map(|d| d.to_string()).unwrap_or_else(|| "none".to_string())
}

/// Storage for favorites and their check history
pub trait CheckRepository {
    /// Save a new favorite. Fails if the same host and port is already saved.
    fn add_favorite(&mut self, hostname: &str, port: u16) -> Result<Favorite, StoreError>;

    /// Delete a favorite and its history
    fn remove_favorite(&mut self, id: u64) -> Result<(), StoreError>;

    /// Enable or disable alerts for a favorite
    fn set_notifications(&mut self, id: u64, enabled: bool) -> Result<(), StoreError>;

    /// All favorites, oldest first
    fn favorites(&self) -> Vec<Favorite>;

    fn find_favorite(&self, hostname: &str, port: u16) -> Option<Favorite>;

    /// Store the summary of `result` and mark the favorite as checked
    fn record(&mut self, favorite_id: u64, result: &CheckResult)
        -> Result<HistoryEntry, StoreError>;

    /// History of one favorite, newest first
    fn history(&self, favorite_id: u64) -> Vec<HistoryEntry>;

    /// The two most recent entries, newest first
    fn last_two(&self, favorite_id: u64) -> Vec<HistoryEntry> {
        self.history(favorite_id).into_iter().take(2).collect()
    }

    /// Changes between the two most recent checks, if there are two
    fn check_changes(&self, favorite_id: u64) -> Option<ChangeDetection> {
        match self.last_two(favorite_id).as_slice() {
            [current, previous] => detect_changes(previous, current),
            _ => None,
        }
    }
}

/// State shared by the repository implementations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    next_favorite_id: u64,
    next_history_id: u64,
    favorites: Vec<Favorite>,
    history: Vec<HistoryEntry>,
}

impl StoreData {
    fn add_favorite(&mut self, hostname: &str, port: u16) -> Result<Favorite, StoreError> {
        if self.find_favorite(hostname, port).is_some() {
            return Err(StoreError::DuplicateFavorite {
                target: format!("{}:{}", hostname, port),
            });
        }

        self.next_favorite_id += 1;
        let favorite = Favorite::new(self.next_favorite_id, hostname, port);
        self.favorites.push(favorite.clone());
        Ok(favorite)
    }

    fn remove_favorite(&mut self, id: u64) -> Result<(), StoreError> {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.id != id);
        if self.favorites.len() == before {
            return Err(StoreError::FavoriteNotFound { id });
        }
        self.history.retain(|entry| entry.favorite_id != id);
        Ok(())
    }

    fn favorite_mut(&mut self, id: u64) -> Result<&mut Favorite, StoreError> {
        self.favorites
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FavoriteNotFound { id })
    }

    fn set_notifications(&mut self, id: u64, enabled: bool) -> Result<(), StoreError> {
        self.favorite_mut(id)?.notifications_enabled = enabled;
        Ok(())
    }

    fn find_favorite(&self, hostname: &str, port: u16) -> Option<Favorite> {
        self.favorites
            .iter()
            .find(|f| f.hostname.eq_ignore_ascii_case(hostname) && f.port == port)
            .cloned()
    }

    fn record(&mut self, favorite_id: u64, result: &CheckResult) -> Result<HistoryEntry, StoreError> {
        self.favorite_mut(favorite_id)?.last_checked_at = Some(result.timestamp);

        self.next_history_id += 1;
        let entry = HistoryEntry::from_result(self.next_history_id, favorite_id, result);
        self.history.push(entry.clone());
        Ok(entry)
    }

    fn history(&self, favorite_id: u64) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .history
            .iter()
            .filter(|entry| entry.favorite_id == favorite_id)
            .cloned()
            .collect();
        // Newest first; ids break ties between checks in the same instant
        entries.sort_by(|a, b| b.checked_at.cmp(&a.checked_at).then(b.id.cmp(&a.id)));
        entries
    }
}
