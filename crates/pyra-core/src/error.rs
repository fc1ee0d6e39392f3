//! Error types for pyra-core operations.
//!
//! Cache lookups never fail; misses are `Option::None` by contract. The
//! fallible surface of this workspace is small and lives at construction
//! seams: building a [`crate::image::RasterImage`] from caller-supplied
//! dimensions, where zero extents or byte-size overflow must be rejected
//! before any buffer is allocated.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur constructing core image types.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid image dimensions.
    ///
    /// Returned when width or height is zero, or when the dimensions would
    /// overflow the byte-size calculation for the requested pixel kind.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// A supplied pixel buffer does not match the declared geometry.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferMismatch {
        /// Bytes implied by width * height * bytes-per-pixel
        expected: usize,
        /// Bytes actually supplied
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BufferMismatch`] error.
    #[inline]
    pub fn buffer_mismatch(expected: usize, got: usize) -> Self {
        Self::BufferMismatch { expected, got }
    }
}
