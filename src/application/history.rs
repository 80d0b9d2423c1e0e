//! Undo/redo history as a log of collection snapshots with a cursor.

use std::collections::VecDeque;

use tracing::{instrument, trace};

use crate::domain::TreeNode;

/// Immutable copy of the whole node collection.
pub type Snapshot = Vec<TreeNode>;

/// Append-only snapshot log with a cursor.
///
/// Recording after an undo truncates the undone "future". When a limit is
/// set, the oldest snapshots are dropped first. A limit of 0 means unbounded.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[instrument(level = "trace", skip_all, fields(nodes = snapshot.len()))]
    pub fn record(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(snapshot);

        if self.limit > 0 {
            while self.entries.len() > self.limit {
                self.entries.pop_front();
            }
        }
        self.cursor = self.entries.len() - 1;
        trace!(cursor = self.cursor, entries = self.entries.len(), "recorded snapshot");
    }

    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(labels: &[&str]) -> Snapshot {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| TreeNode::root(i, *l))
            .collect()
    }

    #[test]
    fn given_empty_history_when_undoing_then_nothing() {
        let mut history = History::new(0);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn given_recorded_snapshots_when_undo_redo_then_moves_cursor() {
        let mut history = History::new(0);
        history.record(snap(&["a"]));
        history.record(snap(&["a", "b"]));

        assert_eq!(history.undo(), Some(&snap(&["a"])));
        assert!(history.undo().is_none());
        assert_eq!(history.redo(), Some(&snap(&["a", "b"])));
        assert!(history.redo().is_none());
    }

    #[test]
    fn given_undone_state_when_recording_then_future_is_truncated() {
        let mut history = History::new(0);
        history.record(snap(&["a"]));
        history.record(snap(&["a", "b"]));
        history.undo();
        history.record(snap(&["a", "c"]));

        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current(), Some(&snap(&["a", "c"])));
    }

    #[test]
    fn given_limit_when_recording_past_it_then_oldest_dropped() {
        let mut history = History::new(2);
        history.record(snap(&["a"]));
        history.record(snap(&["b"]));
        history.record(snap(&["c"]));

        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(&snap(&["b"])));
        assert!(!history.can_undo());
    }
}
