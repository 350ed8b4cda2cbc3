//! Durable storage for the question sheet.
//!
//! The document store persists a single keyed record, `{ "topics": [...] }`.
//! This crate keeps that record in a JSON file, `<dir>/<key>.json`.
//!
//! # Features
//!
//! - **Atomic writes** (temp file + rename) to prevent data corruption
//! - **Missing file is not an error**: a first start simply has nothing saved
//!
//! # Example
//!
//! ```no_run
//! use qsheet_core::{DocumentStore, StoreConfig};
//! use qsheet_persistence::{DEFAULT_STORAGE_KEY, FileStorage};
//!
//! let storage = FileStorage::new("/var/lib/qsheet", DEFAULT_STORAGE_KEY)?;
//! let mut store = DocumentStore::open(storage, StoreConfig::default());
//! store.add_topic("Dynamic Programming")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod io;
mod storage;

pub use error::{PersistenceError, Result};
pub use io::{read_record, write_atomic};
pub use storage::{DEFAULT_STORAGE_KEY, FileStorage};
