//! Saved-notice archive.
//!
//! Best effort by contract: the plain methods log storage failures and hand
//! back an empty or negative result instead of an error. The `try_*`
//! variants expose the underlying [`Result`] for callers that care.

use crate::error::{AppError, Result};
use crate::models::Notice;
use crate::storage::KeyValueStore;

/// Notices the user chose to keep, keyed by code.
pub struct LocalArchive<S> {
    store: S,
}

impl<S: KeyValueStore> LocalArchive<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn try_keys(&self) -> Result<Vec<String>> {
        self.store.keys().await
    }

    /// Read every stored notice, skipping entries that cannot be read.
    pub async fn try_read_all(&self) -> Result<Vec<Notice>> {
        let mut notices = Vec::new();
        for key in self.store.keys().await? {
            match self.read_one(&key).await {
                Ok(Some(notice)) => notices.push(notice),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping unreadable saved notice {}: {}", key, e),
            }
        }
        Ok(notices)
    }

    async fn read_one(&self, key: &str) -> Result<Option<Notice>> {
        match self.store.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Store a notice under its key, replacing any previous copy.
    pub async fn try_save(&self, notice: &Notice) -> Result<()> {
        let json = serde_json::to_string(notice).map_err(AppError::storage)?;
        self.store.set(&notice.key(), &json).await
    }

    pub async fn try_delete(&self, key: &str) -> Result<()> {
        self.store.remove(key).await
    }

    pub async fn try_clear(&self) -> Result<()> {
        self.store.clear().await
    }

    /// All stored keys, or none if the store is unreadable.
    pub async fn keys(&self) -> Vec<String> {
        self.try_keys().await.unwrap_or_else(|e| {
            log::warn!("Failed to list saved notices: {}", e);
            Vec::new()
        })
    }

    /// All readable notices, or none if the store is unreadable.
    pub async fn read_all(&self) -> Vec<Notice> {
        self.try_read_all().await.unwrap_or_else(|e| {
            log::warn!("Failed to read saved notices: {}", e);
            Vec::new()
        })
    }

    /// Returns whether the notice was stored.
    pub async fn save(&self, notice: &Notice) -> bool {
        report(self.try_save(notice).await, "save", &notice.key())
    }

    /// Returns whether the key was removed.
    pub async fn delete(&self, key: &str) -> bool {
        report(self.try_delete(key).await, "delete", key)
    }

    /// Returns whether the archive was emptied.
    pub async fn clear(&self) -> bool {
        report(self.try_clear().await, "clear", "all")
    }
}

fn report(result: Result<()>, action: &str, key: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to {} saved notice {}: {}", action, key, e);
            false
        }
    }
}
