//! In-memory repository

use super::{CheckRepository, HistoryEntry, StoreData};
use crate::models::{CheckResult, Favorite};
use crate::utils::StoreError;

/// Repository that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryRepository {
    data: StoreData,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckRepository for MemoryRepository {
    fn add_favorite(&mut self, hostname: &str, port: u16) -> Result<Favorite, StoreError> {
        self.data.add_favorite(hostname, port)
    }

    fn remove_favorite(&mut self, id: u64) -> Result<(), StoreError> {
        self.data.remove_favorite(id)
    }

    fn set_notifications(&mut self, id: u64, enabled: bool) -> Result<(), StoreError> {
        self.data.set_notifications(id, enabled)
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
        self.data.record(favorite_id, result)
    }

    fn history(&self, favorite_id: u64) -> Vec<HistoryEntry> {
        self.data.history(favorite_id)
    }
}
