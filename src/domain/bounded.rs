//! Fixed-capacity, most-recent-first sequence.

use std::collections::VecDeque;

use serde::{Serialize, Serializer};

/// Ordered sequence with a hard capacity, newest element first.
///
/// Pushing onto a full sequence evicts the oldest (tail) element, so the
/// length never exceeds the capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedSequence<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedSequence<T> {
    /// Create an empty sequence. A capacity of zero holds nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest element if full.
    ///
    /// Returns the evicted element, if any.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_back()
        } else {
            None
        };
        self.items.push_front(item);
        evicted
    }

    /// Replace the contents with the first `capacity` items, in the given order.
    pub fn replace<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.clear();
        self.items.extend(items.into_iter().take(self.capacity));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest element.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: Clone> BoundedSequence<T> {
    /// Copy out the contents, newest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a BoundedSequence<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for BoundedSequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}
