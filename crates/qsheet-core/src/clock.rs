//! Time and id sources.
//!
//! The store never calls `Utc::now()` or generates ids directly; it asks the
//! injected [`Clock`] and [`IdGenerator`], which lets tests pin both.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of creation timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of fresh node ids.
///
/// Implementations must never hand out the same id twice during one session;
/// the store additionally skips ids already present in the target collection.
pub trait IdGenerator {
    /// Produce a new id with the given prefix (`topic`, `sub`, `q`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random ids (`topic-3f2a...`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

/// Counter-based ids (`topic-1`, `sub-2`, ...), one counter shared by all prefixes.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next);
        self.next += 1;
        id
    }
}
