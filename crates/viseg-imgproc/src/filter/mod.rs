/// kernel generators.
pub mod kernels;

/// separable 2d convolution.
mod separable_filter;

/// filter operations.
mod ops;

pub use ops::{gaussian_blur, sobel};
pub use separable_filter::separable_filter;
