//! Local filesystem key/value store.
//!
//! Each key is one `{key}.json` file in the root directory. Writes go to a
//! temp file first and are renamed into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;
use crate::utils::fs::{read_optional, write_atomic};

const EXTENSION: &str = "json";

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    root_dir: PathBuf,
}

impl FileStore {
    /// Create a FileStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a key, rejecting keys that are not plain file names.
    fn path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'));
        if !valid {
            return Err(AppError::storage(format!("invalid key {key:?}")));
        }
        Ok(self.root_dir.join(format!("{key}.{EXTENSION}")))
    }

    async fn entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut dir = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(storage_error(&self.root_dir, e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| storage_error(&self.root_dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                entries.push((stem.to_string(), path.clone()));
            }
        }
        entries.sort();
        Ok(entries)
    }
}

fn storage_error(path: &Path, error: impl std::fmt::Display) -> AppError {
    AppError::storage(format!("{}: {}", path.display(), error))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        let Some(bytes) = read_optional(&path)
            .await
            .map_err(|e| storage_error(&path, e))?
        else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| storage_error(&path, e))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        write_atomic(&path, value.as_bytes())
            .await
            .map_err(|e| storage_error(&path, e))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, e)),
        }
    }

    async fn clear(&self) -> Result<()> {
        for (_, path) in self.entries().await? {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| storage_error(&path, e))?;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }
}
