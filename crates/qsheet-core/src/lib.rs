//! Document store for the question sheet.
//!
//! This crate owns the sheet's editing semantics:
//!
//! - **Mutation engine** (`engine`) - pure `(&Tree, params) -> Tree` transformations
//! - **History** (`history`) - bounded linear undo/redo over full snapshots
//! - **Document store** (`store`) - the command surface that validates input,
//!   records history, applies mutations and persists the result
//! - **Search and statistics** - derived, read-only views of a snapshot
//! - **Exchange format** (`exchange`) - JSON export/import payloads
//!
//! Storage, time and id generation are injected through the [`Storage`],
//! [`Clock`] and [`IdGenerator`] traits so the store can be exercised with
//! in-memory fakes.
//!
//! # Example
//!
//! ```
//! use qsheet_core::{DocumentStore, MemoryStorage, StoreConfig};
//!
//! let mut store = DocumentStore::open(MemoryStorage::new(), StoreConfig::default());
//! let topic = store.add_topic("Graphs").unwrap();
//! store.add_sub_topic(&topic, "BFS").unwrap();
//!
//! assert!(store.can_undo());
//! store.undo();
//! assert!(store.can_redo());
//! ```

mod clock;
pub mod engine;
mod error;
pub mod exchange;
pub mod history;
pub mod search;
mod stats;
mod storage;
mod store;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidIds};
pub use engine::{NewQuestion, QuestionPatch};
pub use error::{ImportError, StoreError};
pub use exchange::{EXPORT_FORMAT_VERSION, PersistedSheet};
pub use history::{DEFAULT_MAX_HISTORY, History};
pub use search::filter_tree;
pub use stats::{Statistics, TopicInsight, compute_statistics, topic_insights};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{CommandOutcome, DocumentStore, StoreConfig};
