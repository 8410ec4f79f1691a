// Bounded, insertion-ordered sample window
//
// A sliding window over recent history: appends go to the back, and once
// capacity is exceeded the oldest entries are dropped from the front.
// Eviction is strictly FIFO; the only other removal is a full clear on
// session reset.

use crate::sync::types::Sample;
use std::collections::VecDeque;

/// Default window size per channel
pub const DEFAULT_BUFFER_CAPACITY: usize = 600;

/// Fixed-capacity per-channel sample buffer.
///
/// Not internally synchronized; the owning session wraps channel state in
/// a lock and readers take owned snapshots.
#[derive(Debug, Clone)]
pub struct ChannelBuffer {
    entries: VecDeque<Sample>,
    capacity: usize,
}

impl ChannelBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append samples in order, then trim from the front to capacity
    pub fn append(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.entries.extend(samples);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Immutable copy of the current contents, oldest first.
    ///
    /// Estimators read this copy, so a concurrent append can never mutate
    /// a window mid-computation.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.entries.iter().cloned().collect()
    }

    /// Current values only, oldest first
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|s| s.value).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

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

impl Default for ChannelBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: i64) -> Sample {
        Sample {
            id,
            ts: format!("t{}", id),
            value: id as f64,
        }
    }

    #[test]
    fn append_preserves_order() {
        let mut buffer = ChannelBuffer::new(10);
        buffer.append((1..=4).map(sample));

        let ids: Vec<i64> = buffer.snapshot().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn eviction_is_fifo_and_capped() {
        let mut buffer = ChannelBuffer::new(3);
        buffer.append((1..=2).map(sample));
        buffer.append((3..=5).map(sample));

        assert_eq!(buffer.len(), 3);
        let ids: Vec<i64> = buffer.snapshot().iter().map(|s| s.id).collect();
        // Holds the 3 most recently appended, oldest dropped first
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn oversized_single_append_keeps_tail() {
        let mut buffer = ChannelBuffer::new(4);
        buffer.append((1..=10).map(sample));

        let ids: Vec<i64> = buffer.snapshot().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10]);
    }

    #[test]
    fn snapshot_is_isolated_from_later_appends() {
        let mut buffer = ChannelBuffer::new(10);
        buffer.append((1..=2).map(sample));

        let snap = buffer.snapshot();
        buffer.append((3..=4).map(sample));

        assert_eq!(snap.len(), 2);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buffer = ChannelBuffer::new(5);
        buffer.append((1..=5).map(sample));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 5);
    }
}
