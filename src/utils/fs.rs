//! File system utilities.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Write bytes atomically (write to temp, then rename).
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Read bytes, returning None if the file doesn't exist.
pub async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Save data to a JSON file with pretty printing.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(data)?;
    write_atomic(path, &bytes).await
}

/// Load JSON data, returning None if the file doesn't exist.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match read_optional(path).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/test.txt");

        write_atomic(&path, b"hello").await.unwrap();
        let data = read_optional(&path).await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let data = read_optional(&tmp.path().join("nope.txt")).await.unwrap();
        assert!(data.is_none());
    }
}
