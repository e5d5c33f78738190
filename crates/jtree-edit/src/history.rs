//! Line editor history. Grounded on `core-state/src/undo.rs`'s bounded
//! append-only list shape, repurposed from undo snapshots to submitted
//! command/search lines.

pub const DEFAULT_MAX: usize = 100;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    max: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX)
    }
}

impl History {
    pub fn new(max: usize) -> Self {
        History {
            entries: Vec::new(),
            max: max.max(1),
        }
    }

    /// Rehydrate history from a persisted line list (most-recent last),
    /// e.g. loaded from a history file by the host binary.
    pub fn from_lines(lines: Vec<String>, max: usize) -> Self {
        let mut history = History::new(max);
        for line in lines {
            history.push(line);
        }
        history
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Append a submitted line, suppressing consecutive duplicates and
    /// trimming to `max` entries.
    pub fn push(&mut self, line: String) {
        if line.is_empty() {
            return;
        }
        if self.entries.last().is_some_and(|last| last == &line) {
            return;
        }
        self.entries.push(line);
        if self.entries.len() > self.max {
            self.entries.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `0` is the most recently pushed entry, counting backward.
    pub fn get(&self, index_from_most_recent: usize) -> Option<&str> {
        let len = self.entries.len();
        if index_from_most_recent >= len {
            return None;
        }
        Some(&self.entries[len - 1 - index_from_most_recent])
    }
}
