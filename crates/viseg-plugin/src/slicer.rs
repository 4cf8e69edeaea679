use viseg_image::{Image, ImageError, ImageSize, Stack};

/// Apply a 2D operation to every z-slice of a stack.
///
/// # Arguments
///
/// * `stack` - The input stack.
/// * `f` - The per-slice operation; receives each slice in order.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, Stack, StackSize};
/// use viseg_plugin::slicer::map_slices;
///
/// let stack = Stack::<u8>::from_size_val(
///     StackSize { depth: 2, height: 2, width: 2 },
///     1,
/// ).unwrap();
///
/// let doubled = map_slices(&stack, |slice| {
///     let data = slice.as_slice().iter().map(|&v| v * 2).collect();
///     Image::new(slice.size(), data)
/// }).unwrap();
///
/// assert!(doubled.as_slice().iter().all(|&v| v == 2));
/// ```
pub fn map_slices<T, U, F>(stack: &Stack<T>, f: F) -> Result<Stack<U>, ImageError>
where
    T: Clone,
    U: Clone,
    F: Fn(&Image<T, 1>) -> Result<Image<U, 1>, ImageError>,
{
    let mut slices = Vec::with_capacity(stack.num_slices());
    for z in 0..stack.num_slices() {
        let slice = stack.slice(z)?;
        slices.push(f(&slice)?);
    }
    Stack::from_slices(slices)
}

/// Copy the voxel data of a stack into one tall single-channel image.
///
/// Elementwise operations are layout-agnostic, so processing the
/// (D*H, W) image is equivalent to processing the (D, H, W) stack.
pub fn flatten_to_image<T>(stack: &Stack<T>) -> Result<Image<T, 1>, ImageError>
where
    T: Clone,
{
    Image::new(
        ImageSize {
            width: stack.size().width,
            height: stack.size().depth * stack.size().height,
        },
        stack.as_slice().to_vec(),
    )
}

/// Rebuild a stack of the given size from a tall image produced by
/// [`flatten_to_image`].
pub fn unflatten_from_image<T>(
    image: Image<T, 1>,
    size: viseg_image::StackSize,
) -> Result<Stack<T>, ImageError> {
    Stack::new(size, image.into_vec())
}
