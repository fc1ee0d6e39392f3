//! # pyra-core
//!
//! Core types for multi-resolution ("pyramid") image caching.
//!
//! This crate provides the foundational types shared by producers and
//! consumers of cached image representations:
//!
//! - [`PixelKind`] - the pixel representations the size model understands
//! - [`ImageHandle`] - the contract any cacheable image must satisfy
//! - [`FootprintHint`] - how a handle declares its byte footprint
//! - [`RasterImage`] - a concrete owned pixel buffer implementing the contract
//!
//! ## Design Philosophy
//!
//! The cache engine in `pyra-cache` never decodes, produces, or persists
//! images. All it requires of an image is a way to ask for its dimensions,
//! an approximate byte footprint, and a release operation that frees its
//! backing resources. That boundary lives here so that applications can
//! cache their own image types without depending on the engine's internals.
//!
//! ## Crate Structure
//!
//! This crate is the foundation and has no internal dependencies:
//!
//! ```text
//! pyra-core (this crate)
//!    ^
//!    |
//!    +-- pyra-cache (the cache/eviction engine)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod handle;
pub mod image;
pub mod pixel;

// Re-exports for convenience
pub use error::*;
pub use handle::*;
pub use image::*;
pub use pixel::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use pyra_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::handle::{FootprintHint, ImageHandle};
    pub use crate::image::RasterImage;
    pub use crate::pixel::PixelKind;
}
