//! Bounded linear undo/redo over full tree snapshots.

use std::collections::VecDeque;

use qsheet_model::Tree;

/// Undo steps kept when no other bound is configured.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// A linear history of [`Tree`] snapshots.
///
/// Snapshots are stored oldest at the front, newest at the back. Recording
/// after an undo discards every snapshot past the cursor, so there is never
/// more than one branch.
///
/// The snapshot at the cursor is the visible tree; every snapshot before it
/// is one undo step. The bound counts undo steps, so a full history holds
/// `max_size` earlier snapshots plus the visible one.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Tree>,
    /// Position of the visible snapshot. `None` only while `entries` is empty.
    ///
    /// **Invariant**: `cursor < entries.len()` whenever it is `Some`.
    cursor: Option<usize>,
    /// Undo steps kept. **Invariant**: `max_size >= 1`
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    /// Creates an empty history keeping at most `max_size` undo steps.
    ///
    /// A bound of zero is treated as one.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_size: max_size.max(1),
        }
    }

    /// Append a snapshot after the cursor, dropping any redo branch and
    /// evicting the oldest snapshots beyond the bound.
    pub fn record(&mut self, snapshot: Tree) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);
        while self.entries.len() > self.max_size + 1 {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot and return it.
    pub fn undo(&mut self) -> Option<Tree> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    /// Step forward one snapshot and return it.
    pub fn redo(&mut self) -> Option<Tree> {
        if !self.can_redo() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Tree> {
        self.entries.get(self.cursor?)
    }

    /// Cursor position, `-1` when the history is empty.
    pub fn index(&self) -> isize {
        self.cursor
            .and_then(|c| isize::try_from(c).ok())
            .unwrap_or(-1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
