//! Bounded linear undo/redo history.
//!
//! DESIGN
//! ======
//! The history is a list of immutable snapshots of the whole component list
//! plus a cursor pointing at the snapshot that matches the live canvas.
//! Pushing after an undo discards everything past the cursor, so there is
//! never more than one redo branch. Snapshots are `Arc<[_]>` so handing them
//! out is cheap; restoring one clones it into a fresh live list.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::component::ComponentInstance;
use crate::consts::HISTORY_LIMIT;

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// One recorded canvas state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub components: Arc<[ComponentInstance]>,
    pub timestamp_ms: i64,
}

impl Snapshot {
    fn capture(components: &[ComponentInstance]) -> Self {
        Self { components: Arc::from(components), timestamp_ms: now_ms() }
    }
}

/// Snapshot list with a cursor. The cursor is `None` only while the list is
/// empty; otherwise it is a valid index.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: Option<usize>,
    limit: usize,
}

impl History {
    /// Empty history holding at most [`HISTORY_LIMIT`] snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Empty history with a custom capacity (at least one snapshot).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { entries: VecDeque::new(), index: None, limit: limit.max(1) }
    }

    /// Record `components` after the cursor, dropping any redo branch and
    /// evicting the oldest snapshot when over capacity.
    pub fn push(&mut self, components: &[ComponentInstance]) {
        match self.index {
            Some(index) => self.entries.truncate(index + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(Snapshot::capture(components));
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Replace everything with a single snapshot at index 0.
    pub fn reset(&mut self, components: &[ComponentInstance]) {
        self.entries.clear();
        self.entries.push_back(Snapshot::capture(components));
        self.index = Some(0);
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    /// Step the cursor back and return a copy of that snapshot.
    /// `None` when already at the oldest state.
    pub fn undo(&mut self) -> Option<Vec<ComponentInstance>> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(index);
        self.entries.get(index).map(|snap| snap.components.to_vec())
    }

    /// Step the cursor forward and return a copy of that snapshot.
    /// `None` when already at the newest state.
    pub fn redo(&mut self) -> Option<Vec<ComponentInstance>> {
        let index = self.index? + 1;
        if index >= self.entries.len() {
            return None;
        }
        self.index = Some(index);
        self.entries.get(index).map(|snap| snap.components.to_vec())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Cursor position; `None` for an empty history.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|i| self.entries.get(i))
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
