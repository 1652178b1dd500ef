//! # Session Storage
//!
//! Key/value persistence scoped to one session, plus the typed [`SessionSlot`] the
//! order store mirrors itself into.
//!
//! ## Backends
//!
//! | Backend | Lifetime | Use |
//! |---------|----------|-----|
//! | [`MemoryStorage`] | The process | Default session, tests |
//! | [`FileStorage`] | Until the slot is cleared | A session spanning several runs |
//!
//! Every backend speaks raw bytes. [`SessionSlot`] layers JSON on top and binds a
//! fixed key, so the store only ever deals with its own typed value.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key holds no value.
    #[error("Not found")]
    NotFound,
    /// The value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The backend itself failed (I/O, quota, ...).
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Low-level interface every session storage backend implements.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Retrieves raw bytes for the given key.
    async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Stores raw bytes under the given key, replacing any previous value.
    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Deletes the value associated with the given key. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Checks if a key exists in storage.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// A typed value stored as JSON under one fixed key.
///
/// The order store owns exactly one slot for its whole lifetime; reads happen once at
/// startup ([`SessionSlot::load`]) and writes after every mutation ([`SessionSlot::save`]).
pub struct SessionSlot<T> {
    backend: Arc<dyn SessionStorage>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SessionSlot<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> SessionSlot<T> {
    pub fn new(backend: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the persisted value.
    ///
    /// Absent, unreadable and unparseable values all come back as `None`; the caller
    /// starts from an empty state instead of surfacing an error.
    pub async fn load(&self) -> Option<T> {
        let bytes = match self.backend.get_bytes(&self.key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound) => {
                debug!(key = %self.key, "Slot empty");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Slot unreadable, starting empty");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Slot unparseable, starting empty");
                None
            }
        }
    }

    /// Serializes and writes the value, replacing the previous one.
    pub async fn save(&self, value: &T) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.set_bytes(&self.key, bytes).await
    }

    /// Removes the persisted value, ending the session for this slot.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.backend.delete(&self.key).await
    }
}
