use viseg_image::{Image, ImageError};

use crate::parallel;

/// Scale an image into the 8-bit range by its maximum value.
///
/// Each pixel is mapped to `v / max * 255`. An image whose maximum is not
/// strictly positive maps to all zeros.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output 8-bit image, same size as the input.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::normalize::scale_to_u8;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![0.0f32, 2.0],
/// ).unwrap();
///
/// let mut scaled = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// scale_to_u8(&image, &mut scaled).unwrap();
///
/// assert_eq!(scaled.as_slice(), &[0, 255]);
/// ```
pub fn scale_to_u8(src: &Image<f32, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let max = src.as_slice().iter().fold(f32::MIN, |acc, &v| acc.max(v));
    if max <= 0.0 {
        dst.as_slice_mut().fill(0);
        return Ok(());
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = (*src_pixel / max * 255.0).clamp(0.0, 255.0) as u8;
    });

    Ok(())
}
