//! Put/get churn under budget pressure.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pyra_cache::{CacheConfig, PixelKind, PyramidCache, RasterImage};

fn img(dim: u32) -> RasterImage {
    RasterImage::new(dim, dim, PixelKind::Gray8).unwrap()
}

fn bench_put_churn(c: &mut Criterion) {
    c.bench_function("put_churn_evicting", |b| {
        // Budget fits roughly 16 of the 64 distinct entries, so most puts
        // trigger an eviction pass.
        let mut cache: PyramidCache<RasterImage> = CacheConfig::new()
            .with_max_bytes(16 * (64 * 64 + 1024))
            .build();
        let mut id = 0u64;
        b.iter(|| {
            cache.put(id % 64, img(64), 0);
            id = id.wrapping_add(1);
        });
    });
}

fn bench_hot_get(c: &mut Criterion) {
    c.bench_function("get_level_hot", |b| {
        let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);
        for id in 0..64 {
            cache.put(id, img(64), 0);
        }
        let mut id = 0u64;
        b.iter(|| {
            let hit = cache.get_level(id % 64, 0);
            black_box(hit.is_some());
            id = id.wrapping_add(1);
        });
    });
}

fn bench_closest_scan(c: &mut Criterion) {
    c.bench_function("closest_above_sparse", |b| {
        let mut cache: PyramidCache<RasterImage> = PyramidCache::new(1 << 30);
        // 4096px entries have 8 slots; populate only the extremes.
        for id in 0..16 {
            cache.put(id, img(4096), 0);
            cache.put(id, img(32), 7);
        }
        let mut id = 0u64;
        b.iter(|| {
            let hit = cache.closest_above(id % 16, 5);
            black_box(hit.is_some());
            id = id.wrapping_add(1);
        });
    });
}

criterion_group!(benches, bench_put_churn, bench_hot_get, bench_closest_scan);
criterion_main!(benches);
