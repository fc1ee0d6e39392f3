//! Cache usage counters.

/// Counters describing cache behavior since construction (or the last
/// [`clear`](crate::cache::PyramidCache::clear)).
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Lookups that found the requested representation.
    pub hits: u64,
    /// Lookups that found nothing (absent id, empty or out-of-range level).
    pub misses: u64,
    /// Representations released by budget-driven eviction.
    pub evictions: u64,
    /// Highest byte total observed, including the transient overshoot a
    /// `put` may cause before eviction runs.
    pub peak_bytes: i64,
}

impl CacheStats {
    /// Hit rate in [0.0, 1.0]. Zero when nothing has been looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_empty() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_mixed() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < 1e-9);
    }
}
