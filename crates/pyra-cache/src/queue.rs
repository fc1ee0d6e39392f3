//! Approximate recency ordering over fixed-capacity buckets.
//!
//! Entries are grouped into buckets; the bucket sequence is a FIFO, oldest
//! at the head. Touching an entry moves it to the newest bucket, so recency
//! is tracked at bucket granularity, never per entry within a bucket. That
//! is the approximation: a full reordering structure is traded away for an
//! O(1) amortized touch.
//!
//! A bucket that empties in the middle of the queue is left in place and
//! only dropped when the eviction scan reaches it from the head. Under
//! workloads with little eviction pressure the deque can therefore
//! accumulate empty buckets; this is a known, harmless consequence of the
//! lazy pruning.
//!
//! Buckets join at the tail and leave at the head only, so a bucket's
//! position is `serial - head_serial`, and [`BucketId`] serials index the
//! deque in O(1) without entry-to-bucket references.

use std::collections::{HashSet, VecDeque};

/// Serial number identifying a bucket for the lifetime of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BucketId(u64);

impl BucketId {
    #[cfg(test)]
    pub(crate) fn for_tests(serial: u64) -> Self {
        Self(serial)
    }
}

/// FIFO of identifier buckets; see the module docs.
pub(crate) struct RecencyQueue {
    buckets: VecDeque<HashSet<u64>>,
    /// Serial of the bucket currently at the front of the deque.
    head_serial: u64,
    capacity: usize,
}

impl RecencyQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut queue = Self {
            buckets: VecDeque::new(),
            head_serial: 0,
            capacity: capacity.max(1),
        };
        queue.buckets.push_back(HashSet::with_capacity(queue.capacity));
        queue
    }

    fn tail_serial(&self) -> Option<u64> {
        if self.buckets.is_empty() {
            None
        } else {
            Some(self.head_serial + self.buckets.len() as u64 - 1)
        }
    }

    /// Whether `bucket` is the newest bucket, the only one that receives
    /// touched entries.
    pub(crate) fn is_newest(&self, bucket: BucketId) -> bool {
        self.tail_serial() == Some(bucket.0)
    }

    /// Inserts `id` into the newest bucket, opening a fresh one if the tail
    /// is full or the queue was drained empty.
    pub(crate) fn append(&mut self, id: u64) -> BucketId {
        if self
            .buckets
            .back()
            .is_none_or(|tail| tail.len() >= self.capacity)
        {
            self.buckets.push_back(HashSet::with_capacity(self.capacity));
        }
        // The unwrap-free tail access: a bucket was just ensured above.
        if let Some(tail) = self.buckets.back_mut() {
            tail.insert(id);
        }
        BucketId(self.head_serial + self.buckets.len() as u64 - 1)
    }

    /// Removes `id` from the bucket it was appended to.
    ///
    /// The bucket is left in place even if now empty; pruning happens at
    /// the head during eviction scans.
    pub(crate) fn remove(&mut self, bucket: BucketId, id: u64) {
        if let Some(idx) = bucket.0.checked_sub(self.head_serial) {
            if let Some(b) = self.buckets.get_mut(idx as usize) {
                b.remove(&id);
            }
        }
    }

    /// Identifiers in the oldest non-empty bucket, pruning empty buckets
    /// from the head on the way. `None` when the queue holds nothing.
    pub(crate) fn head_snapshot(&mut self) -> Option<Vec<u64>> {
        loop {
            let front = self.buckets.front()?;
            if !front.is_empty() {
                return Some(front.iter().copied().collect());
            }
            self.buckets.pop_front();
            self.head_serial += 1;
        }
    }

    /// Drops `id` from the head bucket, for identifiers found stale during
    /// an eviction scan.
    pub(crate) fn remove_from_head(&mut self, id: u64) {
        if let Some(front) = self.buckets.front_mut() {
            front.remove(&id);
        }
    }

    /// Resets to a single empty bucket.
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.head_serial = 0;
        self.buckets.push_back(HashSet::with_capacity(self.capacity));
    }

    /// Number of buckets currently queued, empty ones included.
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
