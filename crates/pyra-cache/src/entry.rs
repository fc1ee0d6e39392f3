//! Per-identifier pyramid container.
//!
//! A [`Pyramid`] owns every cached representation of one logical image: a
//! fixed-length slot array indexed by level, and an optional full-resolution
//! handle independent of the slots. The slot array length is fixed at
//! creation and never resized.
//!
//! Replacement releases the previous occupant before storing the new one,
//! which keeps the release-exactly-once guarantee local to this type: every
//! handle that leaves a slot has had [`ImageHandle::release`] run on it,
//! whether it is then dropped or handed back to the caller.

use pyra_core::ImageHandle;

use crate::level;
use crate::queue::BucketId;
use crate::size;

/// All cached representations for one identifier.
///
/// `bucket` names the recency bucket currently holding this entry, as a
/// serial into the queue's bucket deque rather than a direct reference, so
/// ownership stays acyclic.
pub(crate) struct Pyramid<I, F> {
    pub(crate) id: u64,
    slots: Box<[Option<I>]>,
    full: Option<F>,
    live_slots: usize,
    pub(crate) bucket: BucketId,
}

impl<I: ImageHandle, F: ImageHandle> Pyramid<I, F> {
    /// Creates an entry seeded with one downsampled representation.
    ///
    /// The slot array is sized for `level` plus the levels the image's own
    /// larger dimension still supports, and never shorter than `level + 1`
    /// so the seed always fits.
    pub(crate) fn from_level(id: u64, image: I, level: usize, bucket: BucketId) -> Self {
        let depth = (level + level::levels_for(image.max_dimension())).max(level + 1);
        let mut slots: Vec<Option<I>> = Vec::with_capacity(depth);
        slots.resize_with(depth, || None);
        slots[level] = Some(image);
        Self {
            id,
            slots: slots.into_boxed_slice(),
            full: None,
            live_slots: 1,
            bucket,
        }
    }

    /// Creates an entry holding only a full-resolution handle.
    ///
    /// `max_dim` is the larger dimension of the image the handle wraps; it
    /// sizes the (initially empty) slot array.
    pub(crate) fn from_full(id: u64, full: F, max_dim: u32, bucket: BucketId) -> Self {
        let depth = level::levels_for(max_dim);
        let mut slots: Vec<Option<I>> = Vec::with_capacity(depth);
        slots.resize_with(depth, || None);
        Self {
            id,
            slots: slots.into_boxed_slice(),
            full: Some(full),
            live_slots: 0,
            bucket,
        }
    }

    /// Length of the slot array.
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn live_slots(&self) -> usize {
        self.live_slots
    }

    /// The slot at `level`, if present. Out-of-range levels are misses.
    #[inline]
    pub(crate) fn get(&self, level: usize) -> Option<&I> {
        self.slots.get(level).and_then(|s| s.as_ref())
    }

    /// The full-resolution handle, if present.
    #[inline]
    pub(crate) fn full(&self) -> Option<&F> {
        self.full.as_ref()
    }

    #[inline]
    pub(crate) fn has_full(&self) -> bool {
        self.full.is_some()
    }

    /// Whether the entry holds nothing and may leave the identifier map.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.live_slots == 0 && self.full.is_none()
    }

    /// Replaces the slot at `level`, releasing the previous occupant.
    ///
    /// Returns the bytes freed (the old occupant's footprint, or 0 when the
    /// slot was empty) and the released old handle. Storing into an empty
    /// slot frees nothing; the caller accounts for the net increase.
    ///
    /// Callers validate `level < slot_count()`.
    pub(crate) fn replace_slot(&mut self, level: usize, img: Option<I>) -> (i64, Option<I>) {
        match (self.slots[level].take(), img) {
            (None, None) => (0, None),
            (None, Some(new)) => {
                self.slots[level] = Some(new);
                self.live_slots += 1;
                (0, None)
            }
            (Some(mut old), None) => {
                self.live_slots -= 1;
                let freed = size::footprint_of(&old);
                old.release();
                (freed, Some(old))
            }
            (Some(mut old), Some(new)) => {
                let freed = size::footprint_of(&old);
                old.release();
                self.slots[level] = Some(new);
                (freed, Some(old))
            }
        }
    }

    /// Replaces the full-resolution handle with the same four-case logic as
    /// [`replace_slot`](Self::replace_slot).
    pub(crate) fn replace_full(&mut self, full: Option<F>) -> (i64, Option<F>) {
        match (self.full.take(), full) {
            (None, None) => (0, None),
            (None, Some(new)) => {
                self.full = Some(new);
                (0, None)
            }
            (Some(mut old), incoming) => {
                let freed = size::footprint_of(&old);
                old.release();
                self.full = incoming;
                (freed, Some(old))
            }
        }
    }

    /// Releases the full handle and every occupied slot.
    ///
    /// Returns the total bytes freed and the number of items released.
    pub(crate) fn drain(&mut self) -> (i64, usize) {
        let mut bytes = 0;
        let mut count = 0;
        if self.has_full() {
            let (b, _) = self.replace_full(None);
            bytes += b;
            count += 1;
        }
        for level in 0..self.slot_count() {
            if self.get(level).is_some() {
                let (b, _) = self.replace_slot(level, None);
                bytes += b;
                count += 1;
            }
        }
        (bytes, count)
    }
}
