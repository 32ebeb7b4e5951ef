//! JSON file repository
//!
//! The whole store is one JSON document, rewritten after every change.

use super::{CheckRepository, HistoryEntry, StoreData};
use crate::models::{CheckResult, Favorite};
use crate::utils::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Repository persisted to a JSON file
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileRepository {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            serde_json::from_str(&content).map_err(|e| StoreError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            StoreData::default()
        };

        debug!(
            "Opened store {} ({} favorites)",
            path.display(),
            data.favorites.len()
        );

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the store and keep it only once written
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut staged = self.data.clone();
        let value = change(&mut staged)?;
        self.save(&staged)?;
        self.data = staged;
        Ok(value)
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let write_error = |message: String| StoreError::WriteError {
            path: self.path.display().to_string(),
            message,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(data).map_err(|e| write_error(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| write_error(e.to_string()))
    }
}

impl CheckRepository for JsonFileRepository {
    fn add_favorite(&mut self, hostname: &str, port: u16) -> Result<Favorite, StoreError> {
        self.commit(|data| data.add_favorite(hostname, port))
    }

    fn remove_favorite(&mut self, id: u64) -> Result<(), StoreError> {
        self.commit(|data| data.remove_favorite(id))
    }

    fn set_notifications(&mut self, id: u64, enabled: bool) -> Result<(), StoreError> {
        self.commit(|data| data.set_notifications(id, enabled))
    }

    fn favorites(&self) -> Vec<Favorite> {
        self.data.favorites.clone()
    }

    fn find_favorite(&self, hostname: &str, port: u16) -> Option<Favorite> {
        self.data.find_favorite(hostname, port)
    }

    fn record(
        &mut self,
        favorite_id: u64,
        result: &CheckResult,
    ) -> Result<HistoryEntry, StoreError> {
        self.commit(|data| data.record(favorite_id, result))
    }

    fn history(&self, favorite_id: u64) -> Vec<HistoryEntry> {
        self.data.history(favorite_id)
    }
}
