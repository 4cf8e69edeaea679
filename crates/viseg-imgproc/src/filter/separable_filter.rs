use rayon::prelude::*;

use viseg_image::{Image, ImageError};

// rough cutoff below which the rayon overhead dominates
const MIN_PARALLEL_PIXELS: usize = 100_000;

fn kernel_offsets(kernel: &[f32]) -> Vec<isize> {
    let half = kernel.len() / 2;
    (0..kernel.len())
        .map(|i| i as isize - half as isize)
        .collect()
}

fn convolve_row(
    src_row: &[f32],
    dst_row: &mut [f32],
    kernel: &[f32],
    offsets: &[isize],
    cols: usize,
) {
    for c in 0..cols {
        let mut acc = 0.0f32;
        for (&k, &off) in kernel.iter().zip(offsets.iter()) {
            let x = c as isize + off;
            if x >= 0 && x < cols as isize {
                acc += src_row[x as usize] * k;
            }
        }
        dst_row[c] = acc;
    }
}

fn convolve_cols(
    src: &[f32],
    dst_row: &mut [f32],
    kernel: &[f32],
    offsets: &[isize],
    r: usize,
    rows: usize,
    cols: usize,
) {
    for (c, dst_val) in dst_row.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (&k, &off) in kernel.iter().zip(offsets.iter()) {
            let y = r as isize + off;
            if y >= 0 && y < rows as isize {
                acc += src[y as usize * cols + c] * k;
            }
        }
        *dst_val = acc;
    }
}

/// Apply a separable filter to a single channel image.
///
/// Performs a horizontal 1D convolution followed by a vertical one. Taps
/// falling outside the image are skipped, which is equivalent to zero
/// padding.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
pub fn separable_filter(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if kernel_x.is_empty() || kernel_y.is_empty() {
        return Err(ImageError::InvalidKernelLength(
            kernel_x.len(),
            kernel_y.len(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let offsets_x = kernel_offsets(kernel_x);
    let offsets_y = kernel_offsets(kernel_y);

    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();
    let mut temp = vec![0.0f32; src_data.len()];

    if rows * cols >= MIN_PARALLEL_PIXELS {
        temp.par_chunks_exact_mut(cols)
            .zip(src_data.par_chunks_exact(cols))
            .for_each(|(temp_row, src_row)| {
                convolve_row(src_row, temp_row, kernel_x, &offsets_x, cols);
            });

        dst_data
            .par_chunks_exact_mut(cols)
            .enumerate()
            .for_each(|(r, dst_row)| {
                convolve_cols(&temp, dst_row, kernel_y, &offsets_y, r, rows, cols);
            });
    } else {
        for (temp_row, src_row) in temp.chunks_exact_mut(cols).zip(src_data.chunks_exact(cols)) {
            convolve_row(src_row, temp_row, kernel_x, &offsets_x, cols);
        }

        for (r, dst_row) in dst_data.chunks_exact_mut(cols).enumerate() {
            convolve_cols(&temp, dst_row, kernel_y, &offsets_y, r, rows, cols);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::ImageSize;

    #[test]
    fn test_separable_filter_box() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        let kernel_x = vec![1.0, 1.0, 1.0];
        let kernel_y = vec![1.0, 1.0, 1.0];
        separable_filter(&img, &mut dst, &kernel_x, &kernel_y)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        let xsum = dst.as_slice().iter().sum::<f32>();
        assert_eq!(xsum, 9.0);

        Ok(())
    }

    #[test]
    fn test_separable_filter_empty_kernel() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0.0,
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        assert!(separable_filter(&img, &mut dst, &[], &[1.0]).is_err());
        Ok(())
    }

    #[test]
    fn test_separable_filter_zero_width() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 4,
        };
        let img = Image::<f32, 1>::new(size, vec![])?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        separable_filter(&img, &mut dst, &[1.0, 1.0], &[1.0, 1.0])?;
        assert!(dst.as_slice().is_empty());
        Ok(())
    }

    #[test]
    fn test_separable_filter_preserves_mass_inside() -> Result<(), ImageError> {
        // a normalized kernel applied away from the border preserves total mass
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut data = vec![0.0f32; 81];
        data[4 * 9 + 4] = 1.0;
        let img = Image::new(size, data)?;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let kernel = vec![0.25, 0.5, 0.25];
        separable_filter(&img, &mut dst, &kernel, &kernel)?;

        let sum = dst.as_slice().iter().sum::<f32>();
        assert!((sum - 1.0).abs() < 1e-5);
        Ok(())
    }
}
