use std::collections::VecDeque;

use rayon::prelude::*;

use viseg_image::{Image, ImageError};

use super::{kernel_shape, MorphShape};

fn check_kernel(kernel: &[bool], ksize: (usize, usize)) -> Result<(), ImageError> {
    let (krows, kcols) = ksize;
    if krows == 0 || kcols == 0 || krows % 2 == 0 || kcols % 2 == 0 || kernel.len() != krows * kcols
    {
        return Err(ImageError::InvalidKernelLength(kernel.len(), krows * kcols));
    }
    Ok(())
}

fn check_sizes(src: &Image<u8, 1>, dst: &Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Erode a binary image with the given structuring element.
///
/// A pixel stays foreground (written as 1) when every active kernel
/// position over it covers a foreground pixel. Out-of-image positions count
/// as foreground, so objects touching the border are not eaten from
/// outside.
///
/// # Arguments
///
/// * `src` - The binary input image; any non-zero pixel is foreground.
/// * `dst` - The output mask, same size as the input.
/// * `kernel` - Row-major boolean structuring element.
/// * `ksize` - The (rows, cols) size of the element, both odd.
pub fn erode(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &[bool],
    ksize: (usize, usize),
) -> Result<(), ImageError> {
    check_kernel(kernel, ksize)?;
    check_sizes(src, dst)?;

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let (krows, kcols) = ksize;
    let (half_r, half_c) = (krows as isize / 2, kcols as isize / 2);
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (c, dst_pixel) in dst_row.iter_mut().enumerate() {
                let mut all_covered = true;
                'kernel: for kr in 0..krows {
                    for kc in 0..kcols {
                        if !kernel[kr * kcols + kc] {
                            continue;
                        }
                        let y = r as isize + kr as isize - half_r;
                        let x = c as isize + kc as isize - half_c;
                        if y < 0 || x < 0 || y >= rows as isize || x >= cols as isize {
                            continue;
                        }
                        if src_data[y as usize * cols + x as usize] == 0 {
                            all_covered = false;
                            break 'kernel;
                        }
                    }
                }
                *dst_pixel = u8::from(all_covered && src_data[r * cols + c] != 0);
            }
        });

    Ok(())
}

/// Dilate a binary image with the given structuring element.
///
/// A pixel becomes foreground (written as 1) when any active kernel
/// position over it covers a foreground pixel. Out-of-image positions count
/// as background.
///
/// # Arguments
///
/// * `src` - The binary input image; any non-zero pixel is foreground.
/// * `dst` - The output mask, same size as the input.
/// * `kernel` - Row-major boolean structuring element.
/// * `ksize` - The (rows, cols) size of the element, both odd.
pub fn dilate(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &[bool],
    ksize: (usize, usize),
) -> Result<(), ImageError> {
    check_kernel(kernel, ksize)?;
    check_sizes(src, dst)?;

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let (krows, kcols) = ksize;
    let (half_r, half_c) = (krows as isize / 2, kcols as isize / 2);
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (c, dst_pixel) in dst_row.iter_mut().enumerate() {
                let mut any_covered = false;
                'kernel: for kr in 0..krows {
                    for kc in 0..kcols {
                        if !kernel[kr * kcols + kc] {
                            continue;
                        }
                        let y = r as isize + kr as isize - half_r;
                        let x = c as isize + kc as isize - half_c;
                        if y < 0 || x < 0 || y >= rows as isize || x >= cols as isize {
                            continue;
                        }
                        if src_data[y as usize * cols + x as usize] != 0 {
                            any_covered = true;
                            break 'kernel;
                        }
                    }
                }
                *dst_pixel = u8::from(any_covered);
            }
        });

    Ok(())
}

/// Open a binary image with the 3x3 cross element.
///
/// Erosion followed by dilation; removes isolated pixels and thin
/// protrusions.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::morphology::open;
///
/// let data = vec![
///     1u8, 0, 0,
///     0, 0, 0,
///     0, 0, 0,
/// ];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let mut opened = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// open(&image, &mut opened).unwrap();
/// assert!(opened.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn open(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    let kernel = kernel_shape(MorphShape::Cross, (3, 3));
    let mut eroded = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    erode(src, &mut eroded, &kernel, (3, 3))?;
    dilate(&eroded, dst, &kernel, (3, 3))
}

/// Fill enclosed background holes of a binary image.
///
/// Background pixels reachable from the image border with 4-connectivity
/// stay background, all other pixels are written as foreground (1).
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::morphology::fill_holes;
///
/// let data = vec![
///     1u8, 1, 1,
///     1, 0, 1,
///     1, 1, 1,
/// ];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let mut filled = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// fill_holes(&image, &mut filled).unwrap();
/// assert!(filled.as_slice().iter().all(|&v| v == 1));
/// ```
pub fn fill_holes(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_sizes(src, dst)?;

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let src_data = src.as_slice();

    let mut outside = vec![false; rows * cols];
    let mut queue = VecDeque::new();

    // seed the flood with every background pixel on the border
    for c in 0..cols {
        for r in [0, rows - 1] {
            let idx = r * cols + c;
            if src_data[idx] == 0 && !outside[idx] {
                outside[idx] = true;
                queue.push_back(idx);
            }
        }
    }
    for r in 0..rows {
        for c in [0, cols - 1] {
            let idx = r * cols + c;
            if src_data[idx] == 0 && !outside[idx] {
                outside[idx] = true;
                queue.push_back(idx);
            }
        }
    }

    while let Some(idx) = queue.pop_front() {
        let x = (idx % cols) as isize;
        let y = (idx / cols) as isize;
        for (dx, dy) in [(0isize, -1isize), (-1, 0), (1, 0), (0, 1)] {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= cols as isize || ny >= rows as isize {
                continue;
            }
            let nidx = ny as usize * cols + nx as usize;
            if src_data[nidx] == 0 && !outside[nidx] {
                outside[nidx] = true;
                queue.push_back(nidx);
            }
        }
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(outside.iter())
        .for_each(|(dst_pixel, &is_outside)| {
            *dst_pixel = u8::from(!is_outside);
        });

    Ok(())
}
