//! Bounded short-term observation buffer.
//!
//! Most-recent-first: new observations go to the front, the oldest entry
//! falls off the back once capacity is exceeded. Process-local and
//! single-writer; nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default buffer capacity.
pub const DEFAULT_CAPACITY: usize = 10;

/// One raw file observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Raw file content at observation time.
    pub content: String,
    /// When the observation was made.
    pub timestamp: DateTime<Utc>,
    /// Observed file path.
    pub file_path: String,
}

/// Bounded most-recent-first buffer of [`Observation`]s.
#[derive(Debug)]
pub struct ShortTermBuffer {
    entries: VecDeque<Observation>,
    capacity: usize,
}

impl ShortTermBuffer {
    /// Create a buffer with the default capacity (10).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a buffer with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new observation to the front, evicting the oldest entry
    /// when the buffer is full. O(1) amortized.
    pub fn push(&mut self, observation: Observation) {
        self.entries.push_front(observation);
        if self.entries.len() > self.capacity {
            let _ = self.entries.pop_back();
        }
    }

    /// Observations, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &Observation> {
        self.entries.iter()
    }

    /// Number of buffered observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShortTermBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(name: &str) -> Observation {
        Observation {
            content: format!("content of {name}"),
            timestamp: Utc::now(),
            file_path: name.to_string(),
        }
    }

    #[test]
    fn new_buffer_is_empty() {
        let buf = ShortTermBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn push_puts_newest_first() {
        let mut buf = ShortTermBuffer::new();
        buf.push(obs("a.ts"));
        buf.push(obs("b.ts"));

        let paths: Vec<&str> = buf.recent().map(|o| o.file_path.as_str()).collect();
        assert_eq!(paths, vec!["b.ts", "a.ts"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut buf = ShortTermBuffer::with_capacity(3);
        for name in ["a", "b", "c", "d"] {
            buf.push(obs(name));
        }
        assert_eq!(buf.len(), 3);
        let paths: Vec<&str> = buf.recent().map(|o| o.file_path.as_str()).collect();
        assert_eq!(paths, vec!["d", "c", "b"]);
    }

    #[test]
    fn default_capacity_is_ten() {
        let mut buf = ShortTermBuffer::new();
        for i in 0..25 {
            buf.push(obs(&format!("f{i}")));
        }
        assert_eq!(buf.len(), DEFAULT_CAPACITY);
    }
}
