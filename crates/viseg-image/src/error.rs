/// An error type for image and stack operations.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the data length does not match the container shape.
    #[error("Data length ({0}) does not match the container size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch: expected {0}x{1}, got {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a stack slice index is out of bounds.
    #[error("Slice index {0} out of bounds for depth {1}")]
    SliceIndexOutOfBounds(usize, usize),

    /// Error when a stack is built from slices of differing sizes.
    #[error("Slice {0} does not match the stack slice size")]
    InvalidSliceSize(usize),

    /// Error when a stack is built from an empty slice list.
    #[error("Cannot build a stack from an empty slice list")]
    EmptyStack,

    /// Error when a pixel value cannot be casted to the target type.
    #[error("Failed to cast the pixel data")]
    CastError,

    /// Error when a filter kernel is empty or malformed.
    #[error("Invalid kernel length ({0}, {1})")]
    InvalidKernelLength(usize, usize),

    /// Error when a Gaussian sigma is not strictly positive.
    #[error("Sigma must be strictly positive, got {0}")]
    InvalidSigma(f32),
}
