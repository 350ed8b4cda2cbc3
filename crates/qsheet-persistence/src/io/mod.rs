//! File I/O for the persisted sheet.
//!
//! This module handles:
//! - Saving records with atomic writes
//! - Loading records, treating a missing file as "nothing saved yet"

mod load;
mod save;

pub use load::read_record;
pub use save::write_atomic;
