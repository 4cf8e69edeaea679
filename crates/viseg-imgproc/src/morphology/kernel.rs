/// Shape of a structuring element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorphShape {
    /// Full rectangle.
    Rect,
    /// Axis-aligned ellipse.
    Ellipse,
    /// 4-connected cross.
    Cross,
}

/// Generate a binary structuring element of the given shape.
///
/// # Arguments
///
/// * `shape` - The shape of the element.
/// * `ksize` - The (rows, cols) size of the element.
///
/// # Returns
///
/// A row-major boolean mask of length `rows * cols`.
pub fn kernel_shape(shape: MorphShape, ksize: (usize, usize)) -> Vec<bool> {
    let (rows, cols) = ksize;
    let mut kernel = vec![false; rows * cols];
    let cy = rows / 2;
    let cx = cols / 2;

    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            kernel[idx] = match shape {
                MorphShape::Rect => true,
                MorphShape::Cross => r == cy || c == cx,
                MorphShape::Ellipse => {
                    let dy = (r as f64 - cy as f64) / (rows as f64 / 2.0);
                    let dx = (c as f64 - cx as f64) / (cols as f64 / 2.0);
                    dx * dx + dy * dy <= 1.0
                }
            };
        }
    }

    kernel
}
