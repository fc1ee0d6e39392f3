//! Byte-budgeted in-process cache for multi-resolution image pyramids.
//!
//! The cache maps `u64` identifiers to pyramid entries. Each entry holds a
//! fixed array of level slots (level 0 least downsampled, each further
//! level roughly half the linear size) plus an optional full-resolution
//! handle independent of the slots. Reads return `Option`; a miss is an
//! ordinary outcome, never an error.
//!
//! Budget enforcement is inline: any insertion that pushes the byte total
//! over `max_bytes` evicts least-recently-touched content on the caller's
//! thread before returning, at bucket granularity (see [`cache`] and the
//! recency-queue internals). The total can transiently overshoot the
//! budget by at most the footprint of the item just inserted.
//!
//! # Single-writer contract
//!
//! [`PyramidCache`] performs no internal synchronization. Run it from one
//! logical owner, or wrap the whole cache in a single external lock.
//!
//! ```
//! use pyra_cache::{CacheConfig, PyramidCache, RasterImage, PixelKind};
//!
//! let mut cache: PyramidCache<RasterImage> = CacheConfig::new()
//!     .with_max_bytes(64 << 20)
//!     .build();
//!
//! let thumb = RasterImage::new(256, 256, PixelKind::Gray8).unwrap();
//! cache.put(42, thumb, 2);
//! assert!(cache.contains_level(42, 2));
//! assert!(cache.get_level(42, 0).is_none());
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod level;
pub mod size;
pub mod stats;

mod entry;
mod queue;

pub use cache::PyramidCache;
pub use config::{CacheConfig, DEFAULT_BUCKET_CAPACITY, DEFAULT_MAX_BYTES};
pub use level::levels_for;
pub use size::{footprint_of, FOOTPRINT_OVERHEAD};
pub use stats::CacheStats;

pub use pyra_core::{FootprintHint, ImageHandle, PixelKind, RasterImage};

/// Convenience re-exports for glob import.
pub mod prelude {
    pub use crate::cache::PyramidCache;
    pub use crate::config::CacheConfig;
    pub use crate::stats::CacheStats;
    pub use pyra_core::prelude::*;
}
