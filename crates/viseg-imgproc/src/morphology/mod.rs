// Binary morphological operations.

/// Kernel (structuring element) utilities.
pub mod kernel;

/// erosion, dilation, opening and hole filling.
mod ops;

pub use kernel::{kernel_shape, MorphShape};
pub use ops::{dilate, erode, fill_holes, open};
