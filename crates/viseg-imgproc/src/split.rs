use viseg_image::{Image, ImageError};

use crate::distance::{distance_transform, DistanceMetric};
use crate::filter::{gaussian_blur, sobel};
use crate::labeling::{connected_components, Connectivity};
use crate::maxima::regional_maxima;
use crate::morphology::open;
use crate::parallel;
use crate::watershed::watershed;

/// Draw cuts between touching objects of a binary image.
///
/// Composes the classic marker-based pipeline: the squared euclidean
/// distance map of the mask is smoothed with a gaussian, its regional
/// maxima become watershed markers on the negated map, and the borders
/// where the resulting label edges disagree with the mask edges are carved
/// out of the mask. A final opening cleans up single-pixel debris.
///
/// # Arguments
///
/// * `binary` - The binary input mask; any non-zero pixel is foreground.
/// * `sigma` - The gaussian sigma smoothing the distance map; larger
///   values split less aggressively.
///
/// # Returns
///
/// A 0/1 mask equal to the input foreground with one-pixel background cuts
/// between touching objects.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::split::split_touching_objects;
///
/// let image = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 8, height: 8 },
///     0,
/// ).unwrap();
///
/// let cut = split_touching_objects(&image, 3.5).unwrap();
/// assert!(cut.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn split_touching_objects(binary: &Image<u8, 1>, sigma: f32) -> Result<Image<u8, 1>, ImageError> {
    let size = binary.size();

    // smoothed distance map, maxima as markers
    let distance = distance_transform(binary, DistanceMetric::SquaredEuclidean)?;
    let mut blurred_distance = Image::<f32, 1>::from_size_val(size, 0.0)?;
    gaussian_blur(&distance, &mut blurred_distance, sigma)?;

    let maxima = regional_maxima(&blurred_distance, Connectivity::Eight)?;
    let (markers, _num_markers) = connected_components(&maxima, Connectivity::Four)?;

    // flood the inverted map so the maxima become basins
    let inverted = Image::<f32, 1>::new(
        size,
        blurred_distance.as_slice().iter().map(|&v| -v).collect(),
    )?;
    let labels = watershed(&inverted, &markers)?;

    // identify label-cutting edges
    let labels_f32 = Image::<f32, 1>::new(
        size,
        labels.as_slice().iter().map(|&v| v as f32).collect(),
    )?;
    let mut label_edges = Image::<f32, 1>::from_size_val(size, 0.0)?;
    sobel(&labels_f32, &mut label_edges)?;

    let mask_f32 = Image::<f32, 1>::new(
        size,
        binary
            .as_slice()
            .iter()
            .map(|&v| f32::from(u8::from(v != 0)))
            .collect(),
    )?;
    let mut mask_edges = Image::<f32, 1>::from_size_val(size, 0.0)?;
    sobel(&mask_f32, &mut mask_edges)?;

    // keep foreground where both edge responses agree
    let mut almost = Image::<u8, 1>::from_size_val(size, 0)?;
    parallel::par_iter_rows_val_two(&label_edges, &mask_edges, &mut almost, |a, b, d| {
        *d = u8::from((*a != 0.0) == (*b != 0.0));
    });
    let almost_data = almost.as_slice_mut();
    for (d, &fg) in almost_data.iter_mut().zip(binary.as_slice().iter()) {
        if fg == 0 {
            *d = 0;
        }
    }

    let mut opened = Image::<u8, 1>::from_size_val(size, 0)?;
    open(&almost, &mut opened)?;

    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::ImageSize;

    fn two_touching_disks(width: usize, height: usize, r: f32) -> Image<u8, 1> {
        // two disks side by side, overlapping slightly in the middle
        let cy = height as f32 / 2.0;
        let cx1 = width as f32 / 2.0 - r + 1.0;
        let cx2 = width as f32 / 2.0 + r - 1.0;

        let mut data = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                let (xf, yf) = (x as f32, y as f32);
                let d1 = (xf - cx1).powi(2) + (yf - cy).powi(2);
                let d2 = (xf - cx2).powi(2) + (yf - cy).powi(2);
                if d1 <= r * r || d2 <= r * r {
                    data[y * width + x] = 1;
                }
            }
        }
        Image::new(
            ImageSize { width, height },
            data,
        )
        .unwrap()
    }

    #[test]
    fn empty_mask_stays_empty() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            0,
        )?;
        let cut = split_touching_objects(&image, 3.5)?;
        assert!(cut.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn output_is_subset_of_input() -> Result<(), ImageError> {
        let image = two_touching_disks(40, 24, 8.0);
        let cut = split_touching_objects(&image, 2.0)?;
        for (out, fg) in cut.as_slice().iter().zip(image.as_slice().iter()) {
            if *out != 0 {
                assert_ne!(*fg, 0);
            }
        }
        Ok(())
    }

    #[test]
    fn touching_disks_become_two_objects() -> Result<(), ImageError> {
        let image = two_touching_disks(48, 28, 9.0);
        let (_, objects_before) = connected_components(&image, Connectivity::Four)?;
        assert_eq!(objects_before, 1);

        let cut = split_touching_objects(&image, 2.0)?;
        let (_, objects_after) = connected_components(&cut, Connectivity::Four)?;
        assert!(objects_after >= 2, "expected a cut, got {objects_after} objects");
        Ok(())
    }

    #[test]
    fn isolated_disk_survives() -> Result<(), ImageError> {
        // a single convex object must not be cut apart
        let size = ImageSize {
            width: 24,
            height: 24,
        };
        let mut data = vec![0u8; 24 * 24];
        for y in 0..24 {
            for x in 0..24 {
                let d = (x as f32 - 12.0).powi(2) + (y as f32 - 12.0).powi(2);
                if d <= 49.0 {
                    data[y * 24 + x] = 1;
                }
            }
        }
        let image = Image::<_, 1>::new(size, data)?;

        let cut = split_touching_objects(&image, 3.5)?;
        let (_, objects) = connected_components(&cut, Connectivity::Four)?;
        assert_eq!(objects, 1);
        Ok(())
    }
}
