//! Durable storage seam.
//!
//! The store persists one keyed record holding the serialized sheet. Backends
//! only move text; encoding and decoding stay in the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Storage backend failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not read the record.
    #[error("failed to read sheet from storage")]
    Read {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Backend could not write the record.
    #[error("failed to write sheet to storage")]
    Write {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A single keyed record of durable storage.
pub trait Storage {
    /// Read the persisted record, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the persisted record.
    fn save(&mut self, contents: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryRecord {
    contents: Option<String>,
    saves: usize,
    fail_writes: bool,
}

/// In-process storage.
///
/// Clones share the same record, so a test can keep a handle while the store
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<MemoryRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().contents = Some(contents.into());
        storage
    }

    /// Currently stored record.
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Make every following save fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn save(&mut self, contents: &str) -> Result<(), StorageError> {
        let mut record = self.lock();
        if record.fail_writes {
            return Err(StorageError::Write {
                source: Box::new(std::io::Error::other("storage quota exceeded")),
            });
        }
        record.contents = Some(contents.to_string());
        record.saves += 1;
        Ok(())
    }
}
