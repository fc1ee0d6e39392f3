//! Cache construction parameters.
//!
//! [`PyramidCache::new`](crate::cache::PyramidCache::new) covers the common
//! case; [`CacheConfig`] exposes the remaining knobs. With the `serde`
//! feature the config (de)serializes for applications that keep cache
//! sizing in their settings files.

use pyra_core::ImageHandle;

use crate::cache::PyramidCache;

/// Default byte budget (256MB).
pub const DEFAULT_MAX_BYTES: i64 = 256 * 1024 * 1024;

/// Default recency-bucket capacity.
///
/// Smaller buckets approximate LRU more closely at the cost of more bucket
/// churn; a capacity of 1 degenerates to exact LRU.
pub const DEFAULT_BUCKET_CAPACITY: usize = 20;

/// Construction parameters for a [`PyramidCache`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Byte budget the cache self-regulates toward. Negative values are
    /// accepted and make the cache evict essentially everything.
    pub max_bytes: i64,
    /// Entries per recency bucket; clamped to at least 1.
    pub bucket_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Defaults: 256MB budget, buckets of 20.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the byte budget.
    pub fn with_max_bytes(mut self, max_bytes: i64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Sets the recency-bucket capacity.
    pub fn with_bucket_capacity(mut self, capacity: usize) -> Self {
        self.bucket_capacity = capacity;
        self
    }

    /// Builds the cache.
    pub fn build<I: ImageHandle, F: ImageHandle>(self) -> PyramidCache<I, F> {
        PyramidCache::with_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_knobs() {
        let config = CacheConfig::new()
            .with_max_bytes(1 << 20)
            .with_bucket_capacity(4);
        assert_eq!(config.max_bytes, 1 << 20);
        assert_eq!(config.bucket_capacity, 4);
    }

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(config.bucket_capacity, DEFAULT_BUCKET_CAPACITY);
    }
}
