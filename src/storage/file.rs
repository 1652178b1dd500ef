//! File-backed session storage.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temporary sibling first and are
//! renamed into place, so a crash mid-write never leaves a truncated slot behind.

use super::{SessionStorage, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Storage that keeps one JSON file per key under a session directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the storage, making the session directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::Backend(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("session"))
            .await
            .unwrap();

        storage.set_bytes("mealOrders", b"[]".to_vec()).await.unwrap();
        assert!(storage.exists("mealOrders").await.unwrap());
        assert!(temp_dir.path().join("session/mealOrders.json").exists());

        // A second handle on the same directory sees the same session.
        let reopened = FileStorage::open(storage.dir()).await.unwrap();
        assert_eq!(reopened.get_bytes("mealOrders").await.unwrap(), b"[]");

        reopened.delete("mealOrders").await.unwrap();
        assert!(matches!(
            storage.get_bytes("mealOrders").await,
            Err(StorageError::NotFound)
        ));
        // Deleting twice is fine.
        reopened.delete("mealOrders").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path()).await.unwrap();

        assert!(storage.set_bytes("../escape", b"x".to_vec()).await.is_err());
        assert!(storage.get_bytes("").await.is_err());
    }
}
