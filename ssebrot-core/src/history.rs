use std::collections::VecDeque;

use tracing::debug;

use crate::rect::ComplexRect;

/// Bounded undo stack of viewport rectangles.
///
/// Reads are last-in first-out.  When full, a push evicts the oldest entry
/// first, so the stack always holds the `capacity` most recent states.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<ComplexRect>,
    capacity: usize,
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 5000;

    /// Create an empty history holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Save `rect`, evicting the oldest entry if the history is full.
    pub fn push(&mut self, rect: ComplexRect) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            debug!(capacity = self.capacity, "History full, evicted oldest entry");
        }
        self.entries.push_back(rect);
    }

    /// Take the most recent entry, or `None` if there is nothing to undo.
    pub fn pop(&mut self) -> Option<ComplexRect> {
        self.entries.pop_back()
    }

    /// Number of valid entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
