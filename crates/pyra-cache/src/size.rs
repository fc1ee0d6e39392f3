//! Byte-footprint model for cached image representations.
//!
//! Footprints are estimates used for budget accounting, not exact
//! allocations: `width * height * bytes-per-pixel` plus a fixed per-item
//! overhead standing in for incidental metadata (a 256-entry color table
//! and change). Handles with no declared format are charged 4 bytes/pixel,
//! a conservative upper bound.
//!
//! The model is pure. It is evaluated once per insertion or removal and
//! never cached, because nothing stops a handle's dimensions from differing
//! between two calls for the same identifier (see the crate-level notes on
//! the equal-size replacement assumption).

use pyra_core::{FootprintHint, ImageHandle};

/// Fixed per-item overhead in bytes: a color lookup table (256 * 3) plus
/// headroom for incidental metadata.
pub const FOOTPRINT_OVERHEAD: i64 = 1024;

/// Bytes-per-pixel assumed for handles that declare no format.
pub const OPAQUE_BYTES_PER_PIXEL: i64 = 4;

/// Approximate byte footprint of a handle, overhead included.
pub fn footprint_of<H: ImageHandle>(handle: &H) -> i64 {
    let (w, h) = handle.dimensions();
    let pixels = w as i64 * h as i64;
    let payload = match handle.footprint_hint() {
        FootprintHint::Opaque => pixels * OPAQUE_BYTES_PER_PIXEL,
        FootprintHint::Format(kind) => pixels * kind.bytes_per_pixel() as i64,
        FootprintHint::Bytes(bytes) => bytes as i64,
    };
    payload + FOOTPRINT_OVERHEAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyra_core::PixelKind;

    struct Probe {
        w: u32,
        h: u32,
        hint: FootprintHint,
    }

    impl ImageHandle for Probe {
        fn dimensions(&self) -> (u32, u32) {
            (self.w, self.h)
        }

        fn footprint_hint(&self) -> FootprintHint {
            self.hint
        }

        fn release(&mut self) {}
    }

    #[test]
    fn format_footprints() {
        let cases = [
            (PixelKind::Gray8, 1),
            (PixelKind::Gray16, 2),
            (PixelKind::Float32, 4),
            (PixelKind::Indexed8, 1),
            (PixelKind::PackedRgba8, 4),
        ];
        for (kind, bpp) in cases {
            let p = Probe {
                w: 100,
                h: 50,
                hint: FootprintHint::Format(kind),
            };
            assert_eq!(footprint_of(&p), 100 * 50 * bpp + FOOTPRINT_OVERHEAD);
        }
    }

    #[test]
    fn opaque_assumes_four_bytes() {
        let p = Probe {
            w: 64,
            h: 64,
            hint: FootprintHint::Opaque,
        };
        assert_eq!(footprint_of(&p), 64 * 64 * 4 + FOOTPRINT_OVERHEAD);
    }

    #[test]
    fn byte_override_wins_over_geometry() {
        let p = Probe {
            w: 4096,
            h: 4096,
            hint: FootprintHint::Bytes(512),
        };
        assert_eq!(footprint_of(&p), 512 + FOOTPRINT_OVERHEAD);
    }
}
