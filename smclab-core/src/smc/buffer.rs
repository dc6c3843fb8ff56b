//! Bounded buffer that keeps the most recent entries.

use std::collections::VecDeque;

/// Fixed-capacity FIFO: pushing past capacity evicts the oldest entry.
///
/// Each detector call owns a fresh buffer; nothing survives between calls.
#[derive(Debug, Clone)]
pub struct RecentBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RecentBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}
