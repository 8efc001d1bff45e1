//! In-memory FIFO queue with identity removal.

use std::collections::VecDeque;

use crate::core::WaitQueue;

/// In-memory queue backed by a `VecDeque`.
///
/// Enqueue and dequeue are O(1); removal by identity is a bounded O(n) scan
/// that keeps the relative order of the remaining entries.
#[derive(Debug, Clone)]
pub struct InMemoryQueue<T> {
    entries: VecDeque<T>,
}

impl<T> InMemoryQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<T> Default for InMemoryQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq + Send> WaitQueue<T> for InMemoryQueue<T> {
    fn enqueue(&mut self, entry: T) {
        self.entries.push_back(entry);
    }

    fn requeue_front(&mut self, entry: T) {
        self.entries.push_front(entry);
    }

    fn dequeue(&mut self) -> Option<T> {
        self.entries.pop_front()
    }

    fn remove(&mut self, entry: &T) -> bool {
        match self.entries.iter().position(|e| e == entry) {
            Some(idx) => self.entries.remove(idx).is_some(),
            None => false,
        }
    }

    fn contains(&self, entry: &T) -> bool {
        self.entries.contains(entry)
    }

    fn snapshot(&self) -> Vec<&T> {
        self.entries.iter().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = InMemoryQueue::new();
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);

        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut q = InMemoryQueue::new();
        for i in 1..=4 {
            q.enqueue(i);
        }

        assert!(q.remove(&2));
        assert!(!q.remove(&2));
        assert_eq!(q.len(), 3);
        assert_eq!(q.snapshot(), vec![&1, &3, &4]);
    }

    #[test]
    fn test_requeue_front() {
        let mut q = InMemoryQueue::new();
        q.enqueue("b");
        q.requeue_front("a");
        assert!(q.contains(&"a"));
        assert_eq!(q.dequeue(), Some("a"));
        assert_eq!(q.dequeue(), Some("b"));
    }

    #[test]
    fn test_empty_queue() {
        let mut q = InMemoryQueue::<u32>::new();
        assert!(q.dequeue().is_none());
        assert!(q.is_empty());
    }
}
