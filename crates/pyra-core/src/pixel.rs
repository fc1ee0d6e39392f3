//! Pixel representations understood by the size model.
//!
//! The cache does not touch pixel data; it only needs enough format
//! information to estimate a byte footprint. [`PixelKind`] enumerates the
//! storage layouts the footprint model knows about.
//!
//! # Variants
//!
//! - `Gray8` - 8-bit grayscale, 1 byte/pixel
//! - `Gray16` - 16-bit grayscale, 2 bytes/pixel
//! - `Float32` - 32-bit float, 4 bytes/pixel
//! - `Indexed8` - 8-bit indexed color (palette), 1 byte/pixel
//! - `PackedRgba8` - packed 8-bit RGBA, 4 bytes/pixel

/// Pixel storage layout of a cacheable image.
///
/// Determines the bytes-per-pixel factor used by the footprint model.
/// Images with no declared kind are assumed packed RGBA (4 bytes/pixel),
/// a conservative upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelKind {
    /// 8-bit grayscale.
    Gray8,
    /// 16-bit grayscale.
    Gray16,
    /// 32-bit single-precision float.
    Float32,
    /// 8-bit indexed color (palette-backed).
    Indexed8,
    /// Packed 8-bit-per-channel RGBA.
    #[default]
    PackedRgba8,
}

impl PixelKind {
    /// Bytes of storage per pixel.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> u32 {
        match self {
            Self::Gray8 | Self::Indexed8 => 1,
            Self::Gray16 => 2,
            Self::Float32 | Self::PackedRgba8 => 4,
        }
    }

    /// Whether this is a floating-point representation.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32)
    }

    /// Whether this representation is backed by a color lookup table.
    #[inline]
    pub const fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed8)
    }

    /// Whether this is a single-channel representation.
    #[inline]
    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::Gray8 | Self::Gray16 | Self::Float32)
    }
}
