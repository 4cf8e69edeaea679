use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// Stack size in voxels
///
/// # Examples
///
/// ```
/// use viseg_image::StackSize;
///
/// let stack_size = StackSize {
///   depth: 5,
///   height: 20,
///   width: 10,
/// };
///
/// assert_eq!(stack_size.depth, 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackSize {
    /// Number of z-slices in the stack
    pub depth: usize,
    /// Height of each slice in pixels
    pub height: usize,
    /// Width of each slice in pixels
    pub width: usize,
}

impl StackSize {
    /// The size of a single z-slice.
    pub fn slice_size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

impl std::fmt::Display for StackSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "StackSize {{ depth: {}, height: {}, width: {} }}",
            self.depth, self.height, self.width
        )
    }
}

/// A single-channel volumetric image stack.
///
/// The voxel data is stored contiguously in (D, H, W) order. A 2D image is
/// represented as a stack of depth 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack<T> {
    size: StackSize,
    data: Vec<T>,
}

impl<T> Stack<T> {
    /// Create a new stack from voxel data.
    ///
    /// # Errors
    ///
    /// If the length of the voxel data does not match the stack size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use viseg_image::{Stack, StackSize};
    ///
    /// let stack = Stack::<u8>::new(
    ///     StackSize { depth: 2, height: 3, width: 4 },
    ///     vec![0u8; 24],
    /// ).unwrap();
    ///
    /// assert_eq!(stack.num_slices(), 2);
    /// ```
    pub fn new(size: StackSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.depth * size.height * size.width {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.depth * size.height * size.width,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new stack with the given size filled with a constant value.
    pub fn from_size_val(size: StackSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.depth * size.height * size.width];
        Stack::new(size, data)
    }

    /// Build a stack from a list of equally sized slices.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty list or when slice sizes differ.
    pub fn from_slices(slices: Vec<Image<T, 1>>) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let first = slices.first().ok_or(ImageError::EmptyStack)?;
        let slice_size = first.size();

        let mut data = Vec::with_capacity(slices.len() * slice_size.height * slice_size.width);
        for (z, slice) in slices.iter().enumerate() {
            if slice.size() != slice_size {
                return Err(ImageError::InvalidSliceSize(z));
            }
            data.extend_from_slice(slice.as_slice());
        }

        Stack::new(
            StackSize {
                depth: slices.len(),
                height: slice_size.height,
                width: slice_size.width,
            },
            data,
        )
    }

    /// Wrap a single image as a depth-1 stack.
    pub fn from_image(image: Image<T, 1>) -> Self {
        let size = StackSize {
            depth: 1,
            height: image.height(),
            width: image.width(),
        };
        Self {
            size,
            data: image.into_vec(),
        }
    }

    /// The size of the stack in voxels.
    pub fn size(&self) -> StackSize {
        self.size
    }

    /// The number of z-slices in the stack.
    pub fn num_slices(&self) -> usize {
        self.size.depth
    }

    /// The size of a single z-slice.
    pub fn slice_size(&self) -> ImageSize {
        self.size.slice_size()
    }

    /// The voxel data as a flat slice in (D, H, W) order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The voxel data as a mutable flat slice in (D, H, W) order.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Extract the z-th slice as an owned image.
    ///
    /// # Errors
    ///
    /// Returns an error when the slice index is out of bounds.
    pub fn slice(&self, z: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Clone,
    {
        if z >= self.size.depth {
            return Err(ImageError::SliceIndexOutOfBounds(z, self.size.depth));
        }

        let len = self.size.height * self.size.width;
        let data = self.data[z * len..(z + 1) * len].to_vec();
        Image::new(self.slice_size(), data)
    }

    /// Overwrite the z-th slice with the given image.
    ///
    /// # Errors
    ///
    /// Returns an error when the slice index is out of bounds or the image
    /// size does not match the slice size.
    pub fn set_slice(&mut self, z: usize, slice: &Image<T, 1>) -> Result<(), ImageError>
    where
        T: Clone,
    {
        if z >= self.size.depth {
            return Err(ImageError::SliceIndexOutOfBounds(z, self.size.depth));
        }
        if slice.size() != self.slice_size() {
            return Err(ImageError::InvalidImageSize(
                self.size.width,
                self.size.height,
                slice.width(),
                slice.height(),
            ));
        }

        let len = self.size.height * self.size.width;
        self.data[z * len..(z + 1) * len].clone_from_slice(slice.as_slice());
        Ok(())
    }

    /// Get a reference to the voxel at (x, y, z).
    ///
    /// Returns `None` when the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height || z >= self.size.depth {
            return None;
        }
        self.data
            .get((z * self.size.height + y) * self.size.width + x)
    }
}
