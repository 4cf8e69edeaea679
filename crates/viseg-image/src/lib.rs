#![deny(missing_docs)]
//! Image and stack container types for the viseg crates.

/// single image representation.
pub mod image;

/// volumetric stack representation.
pub mod stack;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::stack::{Stack, StackSize};
