//! End-to-end behavior tests driving the public API the way an image
//! viewer would: load full-resolution images, populate downsampled levels,
//! browse, and let the budget churn.

use pyra_cache::{
    footprint_of, CacheConfig, ImageHandle, PixelKind, PyramidCache, RasterImage,
    FOOTPRINT_OVERHEAD,
};

fn gray(dim: u32) -> RasterImage {
    RasterImage::new(dim, dim, PixelKind::Gray8).unwrap()
}

#[test]
fn byte_accounting_follows_pixel_formats() {
    let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);

    cache.put(1, RasterImage::new(100, 50, PixelKind::Gray8).unwrap(), 0);
    cache.put(2, RasterImage::new(100, 50, PixelKind::Gray16).unwrap(), 0);
    cache.put(3, RasterImage::new(100, 50, PixelKind::Float32).unwrap(), 0);

    let expected = (100 * 50) * (1 + 2 + 4) + 3 * FOOTPRINT_OVERHEAD;
    assert_eq!(cache.bytes(), expected);
    assert_eq!(cache.size(), 3);

    cache.remove(2);
    assert_eq!(cache.bytes(), expected - (100 * 50 * 2 + FOOTPRINT_OVERHEAD));
    assert_eq!(cache.size(), 2);
}

#[test]
fn viewer_workflow() {
    let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);

    // A 1024px image: full handle plus levels 0 and 3 of its 6-slot array.
    cache.put_full(7, gray(1024), 1024);
    cache.put(7, gray(1024), 0);
    cache.put(7, gray(128), 3);

    assert!(cache.get_full(7).is_some());
    assert_eq!(cache.get_level(7, 3).unwrap().dimensions(), (128, 128));

    // Browsing at level 1 falls back to the nearest cached neighbors.
    assert_eq!(cache.closest_above(7, 1).unwrap().dimensions(), (1024, 1024));
    assert_eq!(cache.closest_below(7, 1).unwrap().dimensions(), (128, 128));

    let all = cache.get_all(7);
    assert_eq!(all.len(), 2);
    assert!(all.contains_key(&0) && all.contains_key(&3));
    drop(all);

    // Dropping the pyramid keeps the full handle available for re-scaling.
    cache.flush_pyramid(7);
    assert!(cache.get_level(7, 0).is_none());
    assert!(cache.get_full(7).is_some());

    cache.remove(7);
    assert!(cache.is_empty());
    assert_eq!(cache.bytes(), 0);
}

#[test]
fn budget_churn_evicts_cold_entries() {
    let per_image = footprint_of(&gray(64));
    let mut cache: PyramidCache<RasterImage> = CacheConfig::new()
        .with_max_bytes(4 * per_image)
        .with_bucket_capacity(1)
        .build();

    for id in 0..4 {
        cache.put(id, gray(64), 0);
    }
    assert_eq!(cache.size(), 4);

    // Keep 0 warm, then overflow; 1 is now the coldest.
    assert!(cache.get_level(0, 0).is_some());
    cache.put(4, gray(64), 0);

    assert!(cache.contains(0));
    assert!(!cache.contains(1));
    assert!(cache.contains(4));
    assert!(cache.bytes() <= cache.max_bytes());
}

#[test]
fn released_evictees_carry_no_pixels() {
    let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);
    cache.put(1, gray(64), 0);

    let removed = cache.remove_level(1, 0).unwrap();
    assert!(removed.is_released());
    assert!(removed.data().is_empty());
    // Geometry survives release so callers can still identify the image.
    assert_eq!(removed.dimensions(), (64, 64));
}

#[test]
fn mixed_full_and_level_pressure() {
    let full_cost = footprint_of(&gray(256));
    let level_cost = footprint_of(&gray(32));
    let mut cache: PyramidCache<RasterImage> = CacheConfig::new()
        .with_max_bytes(2 * full_cost + 4 * level_cost)
        .with_bucket_capacity(1)
        .build();

    cache.put_full(1, gray(256), 256);
    cache.put(1, gray(32), 3);
    cache.put_full(2, gray(256), 256);
    cache.put(2, gray(32), 3);

    // Within budget: nothing evicted yet.
    assert_eq!(cache.stats().evictions, 0);

    // A third full image overflows; the coldest entry loses its full
    // handle first but keeps its cheap level slot.
    cache.put_full(3, gray(256), 256);
    assert!(cache.get_full(1).is_none());
    assert!(cache.contains_level(1, 3));
    assert!(cache.bytes() <= cache.max_bytes());
    assert!(cache.stats().evictions > 0);
}

#[test]
fn stats_track_peak_and_rates() {
    let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);
    cache.put(1, gray(64), 0);
    let peak = cache.bytes();

    assert!(cache.get_level(1, 0).is_some());
    assert!(cache.get_level(1, 1).is_none());
    cache.remove(1);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.peak_bytes, peak);
    assert!((stats.hit_rate() - 0.5).abs() < 1e-9);

    // clear() resets the counters along with the content.
    cache.clear();
    assert_eq!(cache.stats().hits, 0);
    assert_eq!(cache.stats().peak_bytes, 0);
}

#[test]
fn random_churn_respects_budget() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let max_bytes = 64 * 1024;
    let mut cache: PyramidCache<RasterImage> = PyramidCache::new(max_bytes);
    // Largest image the test inserts bounds the transient overshoot.
    let worst_case = footprint_of(&gray(96));

    for _ in 0..2_000 {
        let id = rng.gen_range(0..32);
        match rng.gen_range(0..10) {
            0..=4 => {
                let dim = [32u32, 48, 64, 96][rng.gen_range(0..4)];
                let level = rng.gen_range(0..2);
                cache.put(id, gray(dim), level);
            }
            5..=7 => {
                let _ = cache.get_level(id, rng.gen_range(0..3));
            }
            8 => {
                let _ = cache.closest_above(id, rng.gen_range(0..4));
            }
            _ => cache.remove(id),
        }
        assert!(cache.bytes() >= 0, "byte total went negative");
        assert!(
            cache.bytes() <= max_bytes + worst_case,
            "budget overshoot beyond one insertion"
        );
        if cache.is_empty() {
            assert_eq!(cache.bytes(), 0);
        }
    }

    cache.clear();
    assert_eq!(cache.bytes(), 0);
    assert!(cache.is_empty());
}
