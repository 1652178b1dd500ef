//! In-memory session storage.
//!
//! The map lives exactly as long as the process, which makes a single run of the
//! binary one session.

use super::{SessionStorage, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage implementation.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a backend error, as a full quota would.
    ///
    /// Clones share the switch, so a test can keep one handle and pass another to the
    /// store.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let store = self.store.read().await;
        store.get(key).cloned().ok_or(StorageError::NotFound)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("storage quota exceeded".into()));
        }
        let mut store = self.store.write().await;
        store.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let store = self.store.read().await;
        Ok(store.contains_key(key))
    }
}
