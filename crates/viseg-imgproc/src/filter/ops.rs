use viseg_image::{Image, ImageError};

use super::{kernels, separable_filter};

/// Blur an image using a gaussian filter.
///
/// The kernel size is derived from sigma to cover three sigmas on each side.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `sigma` - The sigma of the gaussian kernel, strictly positive.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::filter::gaussian_blur;
///
/// let image = Image::<f32, 1>::from_size_val(
///     ImageSize { width: 5, height: 5 },
///     1.0,
/// ).unwrap();
///
/// let mut blurred = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
/// gaussian_blur(&image, &mut blurred, 1.0).unwrap();
/// ```
pub fn gaussian_blur(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    sigma: f32,
) -> Result<(), ImageError> {
    if sigma <= 0.0 {
        return Err(ImageError::InvalidSigma(sigma));
    }

    let kernel_size = kernels::gaussian_kernel_size(sigma);
    let kernel = kernels::gaussian_kernel_1d(kernel_size, sigma);
    separable_filter(src, dst, &kernel, &kernel)
}

/// Compute the sobel gradient magnitude of an image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W), receives
///   `sqrt(gx^2 + gy^2)`.
pub fn sobel(src: &Image<f32, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (kernel_deriv, kernel_smooth) = kernels::sobel_kernel_1d();

    // apply the sobel filter using separable passes
    let mut gx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    separable_filter(src, &mut gx, &kernel_deriv, &kernel_smooth)?;

    let mut gy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    separable_filter(src, &mut gy, &kernel_smooth, &kernel_deriv)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(gx.as_slice().iter())
        .zip(gy.as_slice().iter())
        .for_each(|((dst, &gx), &gy)| {
            *dst = (gx * gx + gy * gy).sqrt();
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::ImageSize;

    #[test]
    fn gaussian_blur_invalid_sigma() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0.0,
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        assert!(gaussian_blur(&img, &mut dst, 0.0).is_err());
        assert!(gaussian_blur(&img, &mut dst, -1.0).is_err());
        Ok(())
    }

    #[test]
    fn gaussian_blur_spreads_peak() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 7,
        };
        let mut data = vec![0.0f32; 49];
        data[3 * 7 + 3] = 1.0;
        let img = Image::new(size, data)?;

        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        gaussian_blur(&img, &mut dst, 0.8)?;

        let center = *dst.get_pixel(3, 3, 0).unwrap();
        let neighbor = *dst.get_pixel(3, 2, 0).unwrap();
        assert!(center > neighbor);
        assert!(neighbor > 0.0);
        Ok(())
    }

    #[test]
    fn sobel_flat_image_is_zero_inside() -> Result<(), ImageError> {
        let img = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            3.0,
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(img.size(), 0.0)?;
        sobel(&img, &mut dst)?;
        // interior pixels see a constant neighborhood
        assert_eq!(dst.get_pixel(2, 2, 0), Some(&0.0));
        Ok(())
    }

    #[test]
    fn sobel_vertical_edge() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        #[rustfmt::skip]
        let img = Image::new(
            size,
            vec![
                0.0, 0.0, 1.0, 1.0,
                0.0, 0.0, 1.0, 1.0,
                0.0, 0.0, 1.0, 1.0,
            ],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        sobel(&img, &mut dst)?;

        // the edge column responds, flat columns away from it do not
        assert!(*dst.get_pixel(1, 1, 0).unwrap() > 0.0);
        assert!(*dst.get_pixel(2, 1, 0).unwrap() > 0.0);
        assert_eq!(*dst.get_pixel(0, 1, 0).unwrap(), 0.0);
        Ok(())
    }
}
