//! Saved targets, owned by the repository collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A host the user wants re-checked periodically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub hostname: String,
    pub port: u16,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

fn default_notifications() -> bool {
    true
}

impl Favorite {
    pub fn new(id: u64, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            id,
            hostname: hostname.into(),
            port,
            created_at: Utc::now(),
            last_checked_at: None,
            notifications_enabled: true,
        }
    }

    /// `host:port` target string
    pub fn target(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}
