//! A concrete owned raster buffer implementing [`ImageHandle`].
//!
//! [`RasterImage`] is the simplest thing the cache can hold: a `Vec<u8>` of
//! pixel storage plus its geometry and [`PixelKind`]. Applications with
//! richer image types (GPU textures, memory maps) implement [`ImageHandle`]
//! on their own types instead; this one exists for consumers that just need
//! a buffer, and for exercising the cache in tests and benches.

use crate::error::{Error, Result};
use crate::handle::{FootprintHint, ImageHandle};
use crate::pixel::PixelKind;

/// An owned raster image: geometry, pixel kind, and storage.
///
/// Release discards the storage but keeps the geometry readable, so a
/// handle handed back by the cache after removal still reports its
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    kind: PixelKind,
    data: Vec<u8>,
    released: bool,
}

impl RasterImage {
    /// Creates a zero-filled image of the given geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either extent is zero or the
    /// byte size overflows `usize`.
    pub fn new(width: u32, height: u32, kind: PixelKind) -> Result<Self> {
        let len = Self::byte_len(width, height, kind)?;
        Ok(Self {
            width,
            height,
            kind,
            data: vec![0; len],
            released: false,
        })
    }

    /// Wraps an existing pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferMismatch`] if `data` does not match the byte
    /// size implied by the geometry, or [`Error::InvalidDimensions`] for a
    /// degenerate geometry.
    pub fn from_bytes(width: u32, height: u32, kind: PixelKind, data: Vec<u8>) -> Result<Self> {
        let len = Self::byte_len(width, height, kind)?;
        if data.len() != len {
            return Err(Error::buffer_mismatch(len, data.len()));
        }
        Ok(Self {
            width,
            height,
            kind,
            data,
            released: false,
        })
    }

    fn byte_len(width: u32, height: u32, kind: PixelKind) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero extent"));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(kind.bytes_per_pixel() as usize))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflow"))
    }

    /// The pixel representation of this image.
    #[inline]
    pub fn kind(&self) -> PixelKind {
        self.kind
    }

    /// Read access to the pixel storage. Empty once released.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the pixel storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Whether [`ImageHandle::release`] has run on this image.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl ImageHandle for RasterImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn footprint_hint(&self) -> FootprintHint {
        FootprintHint::Format(self.kind)
    }

    fn release(&mut self) {
        // Idempotent: a second call finds nothing left to free.
        self.data = Vec::new();
        self.released = true;
    }
}
