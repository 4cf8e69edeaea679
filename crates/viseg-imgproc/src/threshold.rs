use num_traits::Zero;
use std::cmp::PartialOrd;

use viseg_image::{Image, ImageError};

use crate::parallel;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as the input.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The value assigned where the input is strictly greater
///   than the threshold.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T>(
    src: &Image<T, 1>,
    dst: &mut Image<T, 1>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Compute the Otsu threshold level of an 8-bit image.
///
/// Builds a 256-bin histogram and picks the level maximizing the
/// between-class variance.
pub fn otsu_level(src: &Image<u8, 1>) -> u8 {
    const BINS: usize = 256;
    let mut histogram = [0u32; BINS];

    for &pixel in src.as_slice() {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = src.num_pixels() as f64;
    let mut sum_total = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_total += i as f64 * count as f64;
    }

    let mut best_variance = 0.0;
    let mut best_threshold = 0u8;

    let mut weight_back = 0.0;
    let mut sum_back = 0.0;

    for (current_threshold, &hist_count) in histogram.iter().enumerate() {
        weight_back += hist_count as f64;
        sum_back += current_threshold as f64 * hist_count as f64;

        // skip empty classes
        if weight_back == 0.0 || weight_back == total_pixels {
            continue;
        }

        let mean_back = sum_back / weight_back;
        let weight_fore = total_pixels - weight_back;
        let sum_fore = sum_total - sum_back;
        let mean_fore = sum_fore / weight_fore;

        let variance = weight_back * weight_fore * (mean_back - mean_fore).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = current_threshold as u8;
        }
    }

    best_threshold
}

/// Apply Otsu's thresholding to an 8-bit image.
///
/// Pixels strictly greater than the computed level receive `max_value`,
/// the rest zero.
///
/// # Arguments
///
/// * `src` - The input 8-bit image.
/// * `dst` - The output image, same size as the input.
/// * `max_value` - The foreground value.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::threshold::otsu_threshold;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
/// otsu_threshold(&image, &mut thresholded, 255).unwrap();
///
/// assert_eq!(thresholded.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    max_value: u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let level = otsu_level(src);
    threshold_binary(src, dst, level, max_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::{ImageError, ImageSize};

    #[test]
    fn threshold_binary_basic() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;
        threshold_binary(&image, &mut thresholded, 100, 255)?;

        assert_eq!(thresholded.as_slice(), data_expected);
        Ok(())
    }

    #[test]
    fn otsu_level_bimodal() -> Result<(), ImageError> {
        // two well separated intensity populations
        let mut data = vec![10u8; 32];
        data.extend(vec![200u8; 32]);
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;

        let level = otsu_level(&image);
        assert!(level >= 10 && level < 200);
        Ok(())
    }

    #[test]
    fn otsu_threshold_separates_classes() -> Result<(), ImageError> {
        let mut data = vec![10u8; 32];
        data.extend(vec![200u8; 32]);
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;
        otsu_threshold(&image, &mut thresholded, 1)?;

        let foreground = thresholded.as_slice().iter().filter(|&&v| v == 1).count();
        assert_eq!(foreground, 32);
        assert_eq!(thresholded.as_slice()[0], 0);
        assert_eq!(thresholded.as_slice()[63], 1);
        Ok(())
    }

    #[test]
    fn threshold_zero_width_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 0,
            height: 3,
        };
        let image = Image::<u8, 1>::new(size, vec![])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        threshold_binary(&image, &mut dst, 10, 255)?;
        otsu_threshold(&image, &mut dst, 1)?;
        assert!(dst.as_slice().is_empty());
        Ok(())
    }

    #[test]
    fn otsu_threshold_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;
        assert!(otsu_threshold(&image, &mut dst, 255).is_err());
        Ok(())
    }
}
