//! Pyramid depth model.
//!
//! An entry must be able to hold every representation obtained by repeated
//! 2x downsampling of its base dimension until that dimension falls to
//! roughly [`MIN_TILE_DIM`]. For a base dimension `d >= 32` the depth is
//! `trunc(0.5 + log2(d / 32)) + 1`; below 32 it is zero.
//!
//! Depths for dimensions up to [`MAX_TABLED_DIM`] are precomputed once into
//! a lookup table for O(1) queries; larger dimensions fall back to the
//! closed form. This module is the sole source of truth for how long an
//! entry's slot array must be.

use std::sync::LazyLock;

/// Dimension at which downsampling stops.
pub const MIN_TILE_DIM: u32 = 32;

/// Largest dimension covered by the precomputed table.
pub const MAX_TABLED_DIM: u32 = 50_000;

static LEVEL_TABLE: LazyLock<Box<[u8]>> = LazyLock::new(|| {
    (0..MAX_TABLED_DIM)
        .map(|d| if d < MIN_TILE_DIM { 0 } else { closed_form(d) as u8 })
        .collect()
});

fn closed_form(dim: u32) -> usize {
    (0.5 + (dim as f64 / MIN_TILE_DIM as f64).log2()) as usize + 1
}

/// Number of pyramid levels an entry with the given base dimension holds.
///
/// Pure and deterministic. Returns 0 for dimensions below [`MIN_TILE_DIM`].
pub fn levels_for(max_dim: u32) -> usize {
    if max_dim < MIN_TILE_DIM {
        0
    } else if max_dim < MAX_TABLED_DIM {
        LEVEL_TABLE[max_dim as usize] as usize
    } else {
        closed_form(max_dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_is_zero() {
        assert_eq!(levels_for(0), 0);
        assert_eq!(levels_for(1), 0);
        assert_eq!(levels_for(31), 0);
    }

    #[test]
    fn halving_series() {
        assert_eq!(levels_for(32), 1);
        // Rounds at the half-octave: 45 is still one level, 46 is two.
        assert_eq!(levels_for(45), 1);
        assert_eq!(levels_for(46), 2);
        assert_eq!(levels_for(64), 2);
        assert_eq!(levels_for(512), 5);
        assert_eq!(levels_for(1024), 6);
        assert_eq!(levels_for(4096), 8);
    }

    #[test]
    fn table_matches_closed_form() {
        for d in [32, 33, 100, 1000, 16_384, 49_999] {
            assert_eq!(levels_for(d), closed_form(d), "dimension {d}");
        }
    }

    #[test]
    fn beyond_table_uses_closed_form() {
        assert_eq!(levels_for(MAX_TABLED_DIM), closed_form(MAX_TABLED_DIM));
        assert_eq!(levels_for(120_000), closed_form(120_000));
        // Depth keeps growing past the table bound.
        assert!(levels_for(120_000) > levels_for(49_999));
    }
}
