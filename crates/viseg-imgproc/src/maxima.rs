use std::collections::VecDeque;

use viseg_image::{Image, ImageError};

use crate::labeling::Connectivity;

/// Detect the regional maxima of an image.
///
/// A regional maximum is a connected plateau of equal value with no
/// strictly greater neighbor. Plateau pixels of a maximum are written as 1,
/// everything else as 0.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `connectivity` - The neighborhood connecting plateau pixels.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::labeling::Connectivity;
/// use viseg_imgproc::maxima::regional_maxima;
///
/// let data = vec![
///     0.0f32, 0.0, 0.0,
///     0.0, 2.0, 0.0,
///     0.0, 0.0, 0.0,
/// ];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let maxima = regional_maxima(&image, Connectivity::Eight).unwrap();
/// assert_eq!(maxima.get_pixel(1, 1, 0), Some(&1));
/// assert_eq!(maxima.get_pixel(0, 0, 0), Some(&0));
/// ```
pub fn regional_maxima(
    src: &Image<f32, 1>,
    connectivity: Connectivity,
) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    let offsets = connectivity.offsets();
    let mut visited = vec![false; rows * cols];
    let mut plateau = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..src_data.len() {
        if visited[start] {
            continue;
        }

        // walk the plateau of equal value around the start pixel
        let value = src_data[start];
        let mut is_max = true;

        visited[start] = true;
        plateau.clear();
        plateau.push(start);
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            let x = (idx % cols) as isize;
            let y = (idx / cols) as isize;

            for &(dx, dy) in offsets {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= cols as isize || ny >= rows as isize {
                    continue;
                }
                let nidx = ny as usize * cols + nx as usize;
                let nval = src_data[nidx];
                if nval > value {
                    is_max = false;
                } else if nval == value && !visited[nidx] {
                    visited[nidx] = true;
                    plateau.push(nidx);
                    queue.push_back(nidx);
                }
            }
        }

        if is_max {
            for &idx in &plateau {
                dst_data[idx] = 1;
            }
        }
    }

    Ok(dst)
}
