//! The cache façade: identifier map, byte budget, eviction driver.
//!
//! [`PyramidCache`] ties the footprint model, the recency queue, and the
//! per-identifier pyramids together. Reads touch the owning entry; writes
//! additionally run `fit`, which may evict other entries inline on the
//! caller's thread. There is no background reclamation.
//!
//! # Single-writer contract
//!
//! The cache performs no internal locking. Exactly one logical caller must
//! drive it, or all operations must be serialized behind one external lock;
//! the recency-queue invariants are not safely decomposable into finer
//! locks.

use std::collections::HashMap;

use pyra_core::ImageHandle;
use tracing::{trace, warn};

use crate::config::CacheConfig;
use crate::entry::Pyramid;
use crate::queue::RecencyQueue;
use crate::size;
use crate::stats::CacheStats;

/// Stopping predicate for an eviction pass.
#[derive(Clone, Copy)]
enum FlushTarget {
    /// Stop once at least this many bytes were freed.
    Bytes(i64),
    /// Stop once at least this many slots/handles were released.
    Count(usize),
}

/// Byte-budgeted cache of image pyramids with approximate-LRU eviction.
///
/// `I` is the downsampled-representation handle type stored in level slots;
/// `F` is the full-resolution handle type, independent of the slots. Both
/// default to the same type.
///
/// The byte total self-regulates toward `max_bytes`: any `put` that pushes
/// the total over the budget evicts least-recently-touched content (at
/// bucket granularity) until the total fits again. The total may transiently
/// exceed the budget by at most the footprint of the item just inserted,
/// which is never evicted by its own insertion.
///
/// Ownership of every handle transfers to the cache at `put` time; each is
/// released exactly once, by a later replacement, an eviction pass, or an
/// explicit removal.
pub struct PyramidCache<I, F = I> {
    pyramids: HashMap<u64, Pyramid<I, F>>,
    queue: RecencyQueue,
    bytes: i64,
    max_bytes: i64,
    /// Occupied slots + full handles across all entries.
    occupied: usize,
    stats: CacheStats,
}

impl<I: ImageHandle, F: ImageHandle> PyramidCache<I, F> {
    /// Creates a cache with the given byte budget and default bucket
    /// capacity. Negative budgets are accepted; they make the cache evict
    /// essentially everything after each insertion.
    pub fn new(max_bytes: i64) -> Self {
        Self::with_config(CacheConfig::new().with_max_bytes(max_bytes))
    }

    /// Creates a cache from a full [`CacheConfig`].
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            pyramids: HashMap::new(),
            queue: RecencyQueue::new(config.bucket_capacity),
            bytes: 0,
            max_bytes: config.max_bytes,
            occupied: 0,
            stats: CacheStats::default(),
        }
    }

    /// The configured byte budget.
    #[inline]
    pub fn max_bytes(&self) -> i64 {
        self.max_bytes
    }

    /// Current estimated bytes occupied by cached content.
    #[inline]
    pub fn bytes(&self) -> i64 {
        self.bytes
    }

    /// Count of occupied slots and full handles across all entries. Note
    /// this is not the number of distinct identifiers.
    #[inline]
    pub fn size(&self) -> usize {
        self.occupied
    }

    /// Whether the cache holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Usage counters since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of recency buckets currently queued, empty ones included.
    /// Diagnostic only.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.queue.bucket_count()
    }

    /// Adopts a new byte budget. Lowering the budget immediately evicts the
    /// difference between the old and new ceilings.
    pub fn set_max_bytes(&mut self, max_bytes: i64) {
        if max_bytes < self.max_bytes {
            self.flush_some(FlushTarget::Bytes(self.max_bytes - max_bytes), None);
        }
        self.max_bytes = max_bytes;
    }

    /// Whether any representation is cached under `id`.
    pub fn contains(&self, id: u64) -> bool {
        self.pyramids.contains_key(&id)
    }

    /// Whether a representation is cached under `id` at `level`. An
    /// out-of-range level is simply not found, never an error.
    pub fn contains_level(&self, id: u64, level: usize) -> bool {
        self.pyramids
            .get(&id)
            .is_some_and(|p| p.get(level).is_some())
    }

    /// The representation at `level`, touching the entry on a hit.
    pub fn get_level(&mut self, id: u64, level: usize) -> Option<&I> {
        match self.pyramids.get_mut(&id) {
            Some(p) if p.get(level).is_some() => {
                Self::touch(&mut self.queue, p);
                self.stats.hits += 1;
                p.get(level)
            }
            _ => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// The full-resolution handle, touching the entry on a hit.
    pub fn get_full(&mut self, id: u64) -> Option<&F> {
        match self.pyramids.get_mut(&id) {
            Some(p) if p.has_full() => {
                Self::touch(&mut self.queue, p);
                self.stats.hits += 1;
                p.full()
            }
            _ => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Every occupied level for `id`, keyed by level index. Touches the
    /// entry when it exists; absent ids yield an empty map.
    pub fn get_all(&mut self, id: u64) -> HashMap<usize, &I> {
        let mut out = HashMap::new();
        let Some(p) = self.pyramids.get_mut(&id) else {
            return out;
        };
        Self::touch(&mut self.queue, p);
        for level in 0..p.slot_count() {
            if let Some(img) = p.get(level) {
                out.insert(level, img);
            }
        }
        out
    }

    /// The first occupied slot scanning from `level` down toward 0, i.e.
    /// the closest less-downsampled representation at or above `level`.
    pub fn closest_above(&mut self, id: u64, level: usize) -> Option<&I> {
        let Some(p) = self.pyramids.get_mut(&id) else {
            self.stats.misses += 1;
            return None;
        };
        let top = level.min(p.slot_count().saturating_sub(1));
        match (0..=top).rev().find(|&i| p.get(i).is_some()) {
            Some(found) => {
                Self::touch(&mut self.queue, p);
                self.stats.hits += 1;
                p.get(found)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// The first occupied slot scanning from `level` up toward the deepest
    /// level, i.e. the closest more-downsampled representation at or below
    /// `level`.
    pub fn closest_below(&mut self, id: u64, level: usize) -> Option<&I> {
        let Some(p) = self.pyramids.get_mut(&id) else {
            self.stats.misses += 1;
            return None;
        };
        match (level..p.slot_count()).find(|&i| p.get(i).is_some()) {
            Some(found) => {
                Self::touch(&mut self.queue, p);
                self.stats.hits += 1;
                p.get(found)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Stores a downsampled representation under `id` at `level`.
    ///
    /// Creates the entry if `id` is new, sizing its slot array from `level`
    /// and the image's larger dimension. Replacing an occupied slot releases
    /// the previous handle and assumes equal dimensions for accounting; a
    /// put at a level beyond an existing entry's slot array releases the
    /// incoming handle and is otherwise ignored.
    ///
    /// May evict other entries inline; never the one being inserted.
    pub fn put(&mut self, id: u64, image: I, level: usize) {
        let added = size::footprint_of(&image);
        if let Some(p) = self.pyramids.get_mut(&id) {
            Self::touch(&mut self.queue, p);
            if level >= p.slot_count() {
                let mut image = image;
                image.release();
                warn!(
                    id,
                    level,
                    slots = p.slot_count(),
                    "put at out-of-range level rejected"
                );
                return;
            }
            let (freed, _old) = p.replace_slot(level, Some(image));
            if freed == 0 {
                // Newly occupied slot: net increase.
                self.occupied += 1;
                self.fit(added, id);
            }
        } else {
            let bucket = self.queue.append(id);
            self.pyramids
                .insert(id, Pyramid::from_level(id, image, level, bucket));
            self.occupied += 1;
            self.fit(added, id);
        }
    }

    /// Stores a full-resolution handle under `id`.
    ///
    /// `max_dim` is the larger dimension of the image the handle wraps; it
    /// sizes the slot array when the entry is created here. An existing
    /// entry is reused, its previous full handle released on swap.
    pub fn put_full(&mut self, id: u64, full: F, max_dim: u32) {
        let added = size::footprint_of(&full);
        if let Some(p) = self.pyramids.get_mut(&id) {
            Self::touch(&mut self.queue, p);
            let (freed, _old) = p.replace_full(Some(full));
            if freed == 0 {
                self.occupied += 1;
                self.fit(added, id);
            }
        } else {
            let bucket = self.queue.append(id);
            self.pyramids
                .insert(id, Pyramid::from_full(id, full, max_dim, bucket));
            self.occupied += 1;
            self.fit(added, id);
        }
    }

    /// Removes and releases the representation at `level`, returning the
    /// released handle. The entry leaves the map once its last content is
    /// gone.
    pub fn remove_level(&mut self, id: u64, level: usize) -> Option<I> {
        let p = self.pyramids.get_mut(&id)?;
        if level >= p.slot_count() {
            return None;
        }
        let (freed, old) = p.replace_slot(level, None);
        if old.is_some() {
            self.bytes -= freed;
            self.occupied -= 1;
        }
        if p.is_empty() {
            let bucket = p.bucket;
            self.pyramids.remove(&id);
            self.queue.remove(bucket, id);
        }
        old
    }

    /// Removes and releases the full-resolution handle, returning it.
    pub fn remove_full(&mut self, id: u64) -> Option<F> {
        let p = self.pyramids.get_mut(&id)?;
        let (freed, old) = p.replace_full(None);
        if old.is_some() {
            self.bytes -= freed;
            self.occupied -= 1;
        }
        if p.is_empty() {
            let bucket = p.bucket;
            self.pyramids.remove(&id);
            self.queue.remove(bucket, id);
        }
        old
    }

    /// Drops the whole entry for `id`, releasing its full handle and every
    /// slot.
    pub fn remove(&mut self, id: u64) {
        let Some(mut p) = self.pyramids.remove(&id) else {
            return;
        };
        self.queue.remove(p.bucket, id);
        let (freed, count) = p.drain();
        self.bytes -= freed;
        self.occupied -= count;
    }

    /// Releases every level slot for `id` but keeps its full handle. The
    /// entry leaves the map only if the full handle is also absent.
    pub fn flush_pyramid(&mut self, id: u64) {
        let Some(p) = self.pyramids.get_mut(&id) else {
            return;
        };
        if p.live_slots() == 0 {
            return;
        }
        let mut freed = 0;
        let mut count = 0;
        for level in 0..p.slot_count() {
            if p.get(level).is_some() {
                let (b, _) = p.replace_slot(level, None);
                freed += b;
                count += 1;
            }
        }
        self.bytes -= freed;
        self.occupied -= count;
        if p.is_empty() {
            let bucket = p.bucket;
            self.pyramids.remove(&id);
            self.queue.remove(bucket, id);
        }
    }

    /// Releases everything and resets all internal state, the bucket queue
    /// included. Safe to call repeatedly.
    pub fn clear(&mut self) {
        for (_, mut p) in self.pyramids.drain() {
            p.drain();
        }
        self.queue.clear();
        self.bytes = 0;
        self.occupied = 0;
        self.stats = CacheStats::default();
    }

    /// Evicts oldest-touched content until at least `min_bytes` were freed
    /// or the cache is empty. Returns the bytes actually freed.
    pub fn flush_bytes(&mut self, min_bytes: i64) -> i64 {
        self.flush_some(FlushTarget::Bytes(min_bytes), None)
    }

    /// Evicts oldest-touched content until at least `n` slots/handles were
    /// released or the cache is empty. Returns the bytes freed.
    pub fn flush_count(&mut self, n: usize) -> i64 {
        self.flush_some(FlushTarget::Count(n), None)
    }

    /// Ensures at least `min_free_bytes` of headroom under the budget,
    /// evicting the shortfall if needed. Returns the bytes freed.
    pub fn ensure_free(&mut self, min_free_bytes: i64) -> i64 {
        if self.bytes + min_free_bytes > self.max_bytes {
            self.flush_some(
                FlushTarget::Bytes(self.bytes + min_free_bytes - self.max_bytes),
                None,
            )
        } else {
            0
        }
    }

    /// Finds the identifier owning the given full-resolution handle.
    ///
    /// Linear scan over all entries; a diagnostic, rare-path operation.
    pub fn seq_find_full(&self, full: &F) -> Option<u64>
    where
        F: PartialEq,
    {
        self.pyramids
            .values()
            .find(|p| p.full() == Some(full))
            .map(|p| p.id)
    }

    /// Moves the entry to the newest recency bucket unless it already lives
    /// there.
    fn touch(queue: &mut RecencyQueue, p: &mut Pyramid<I, F>) {
        if !queue.is_newest(p.bucket) {
            queue.remove(p.bucket, p.id);
            p.bucket = queue.append(p.id);
        }
    }

    /// Adds `added` to the byte total and evicts the overshoot, sparing the
    /// entry identified by `protect` (the one just inserted).
    fn fit(&mut self, added: i64, protect: u64) {
        self.bytes += added;
        if self.bytes > self.stats.peak_bytes {
            self.stats.peak_bytes = self.bytes;
        }
        if self.bytes > self.max_bytes {
            let target = self.bytes - self.max_bytes;
            trace!(
                bytes = self.bytes,
                max_bytes = self.max_bytes,
                target,
                "over budget, evicting"
            );
            self.flush_some(FlushTarget::Bytes(target), Some(protect));
        }
    }

    /// The eviction driver: scans buckets from the oldest, draining each
    /// entry's full handle first and then its slots in ascending level
    /// order, until the target is met or nothing evictable remains.
    ///
    /// An entry drained empty leaves the map and its bucket; an entry the
    /// pass stops inside keeps its remaining content and its bucket.
    fn flush_some(&mut self, target: FlushTarget, protect: Option<u64>) -> i64 {
        match target {
            FlushTarget::Bytes(b) if b <= 0 => return 0,
            FlushTarget::Count(0) => return 0,
            _ => {}
        }
        let met = move |freed_bytes: i64, freed_count: usize| match target {
            FlushTarget::Bytes(b) => freed_bytes >= b,
            FlushTarget::Count(n) => freed_count >= n,
        };

        let mut freed_bytes: i64 = 0;
        let mut freed_count: usize = 0;
        'scan: loop {
            let Some(candidates) = self.queue.head_snapshot() else {
                break;
            };
            let mut progressed = false;
            for id in candidates {
                if protect == Some(id) {
                    continue;
                }
                progressed = true;
                let drained = match self.pyramids.get_mut(&id) {
                    Some(p) => {
                        let mut entry_bytes = 0i64;
                        let mut entry_count = 0usize;
                        if p.has_full()
                            && !met(freed_bytes + entry_bytes, freed_count + entry_count)
                        {
                            let (b, _) = p.replace_full(None);
                            entry_bytes += b;
                            entry_count += 1;
                        }
                        let mut level = 0;
                        while level < p.slot_count()
                            && !met(freed_bytes + entry_bytes, freed_count + entry_count)
                        {
                            if p.get(level).is_some() {
                                let (b, _) = p.replace_slot(level, None);
                                entry_bytes += b;
                                entry_count += 1;
                            }
                            level += 1;
                        }
                        Some((entry_bytes, entry_count, p.is_empty(), p.bucket))
                    }
                    None => None,
                };
                let Some((entry_bytes, entry_count, emptied, bucket)) = drained else {
                    // Identifier without an entry violates the bucket
                    // invariant; drop it and move on.
                    self.queue.remove_from_head(id);
                    continue;
                };
                freed_bytes += entry_bytes;
                freed_count += entry_count;
                self.bytes -= entry_bytes;
                self.occupied -= entry_count;
                self.stats.evictions += entry_count as u64;
                if emptied {
                    self.pyramids.remove(&id);
                    self.queue.remove(bucket, id);
                }
                if met(freed_bytes, freed_count) {
                    break 'scan;
                }
            }
            if !progressed {
                // Only the protected entry is left in the oldest bucket.
                break;
            }
        }
        trace!(freed_bytes, remaining = self.bytes, "eviction pass complete");
        freed_bytes
    }
}
