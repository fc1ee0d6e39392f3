//! The contract between the cache and the images it stores.
//!
//! Anything placed in the cache must implement [`ImageHandle`]: report its
//! dimensions, optionally declare its storage format via [`FootprintHint`],
//! and free its backing resources on [`release`](ImageHandle::release).
//!
//! # Ownership
//!
//! Ownership of a handle transfers to the cache when it is put. The cache
//! calls `release` exactly once per handle it lets go of, whether through a
//! later replacement, an eviction pass, or an explicit removal. `release`
//! must be fast, synchronous, and have no further observable effect once it
//! has run.

use crate::pixel::PixelKind;

/// How a handle declares its approximate byte footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FootprintHint {
    /// No format information; the size model assumes 4 bytes/pixel.
    Opaque,
    /// A declared pixel representation; bytes/pixel comes from the kind.
    Format(PixelKind),
    /// An explicit byte count overriding the per-pixel model entirely.
    Bytes(u64),
}

/// A cacheable image representation.
///
/// The cache needs nothing else from an image: no pixel access, no decoding,
/// no persistence. Implementations are free to wrap GPU textures, memory-
/// mapped files, or plain buffers.
pub trait ImageHandle {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Footprint declaration used by the size model.
    ///
    /// Defaults to [`FootprintHint::Opaque`] (4 bytes/pixel assumed).
    fn footprint_hint(&self) -> FootprintHint {
        FootprintHint::Opaque
    }

    /// Frees the handle's backing resources.
    ///
    /// The owning cache calls this exactly once. Implementations must make
    /// a second call harmless, since handles returned to the caller after
    /// removal have already been released.
    fn release(&mut self);

    /// Width in pixels.
    #[inline]
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Height in pixels.
    #[inline]
    fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// The larger of width and height.
    ///
    /// This drives how many pyramid levels an entry created from this
    /// handle must be able to hold.
    #[inline]
    fn max_dimension(&self) -> u32 {
        let (w, h) = self.dimensions();
        w.max(h)
    }
}
