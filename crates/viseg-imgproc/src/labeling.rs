use std::collections::VecDeque;

use viseg_image::{Image, ImageError};

/// Pixel neighborhood used by region operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-connected cross neighborhood.
    #[default]
    Four,
    /// 8-connected full neighborhood.
    Eight,
}

impl Connectivity {
    /// The (dx, dy) neighbor offsets of the neighborhood.
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &[(0, -1), (-1, 0), (1, 0), (0, 1)],
            Connectivity::Eight => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
        }
    }
}

/// Label connected regions of non-zero pixels.
///
/// Labels are assigned from 1 upwards in raster-scan discovery order,
/// background pixels stay 0.
///
/// # Arguments
///
/// * `src` - The binary input image; any non-zero pixel is foreground.
/// * `connectivity` - The neighborhood connecting foreground pixels.
///
/// # Returns
///
/// The label map and the number of labeled regions.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::labeling::{connected_components, Connectivity};
///
/// let data = vec![
///     1u8, 0, 1,
///     1, 0, 0,
///     0, 0, 1,
/// ];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let (labels, count) = connected_components(&image, Connectivity::Four).unwrap();
/// assert_eq!(count, 3);
/// assert_eq!(labels.as_slice(), [1, 0, 2, 1, 0, 0, 0, 0, 3]);
/// ```
pub fn connected_components(
    src: &Image<u8, 1>,
    connectivity: Connectivity,
) -> Result<(Image<u32, 1>, u32), ImageError> {
    let mut labels = Image::<u32, 1>::from_size_val(src.size(), 0)?;

    let cols = src.cols();
    let rows = src.rows();
    let src_data = src.as_slice();
    let labels_data = labels.as_slice_mut();

    let offsets = connectivity.offsets();
    let mut queue = VecDeque::new();
    let mut next_label = 0u32;

    for start in 0..src_data.len() {
        if src_data[start] == 0 || labels_data[start] != 0 {
            continue;
        }

        next_label += 1;
        labels_data[start] = next_label;
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
                if src_data[nidx] != 0 && labels_data[nidx] == 0 {
                    labels_data[nidx] = next_label;
                    queue.push_back(nidx);
                }
            }
        }
    }

    Ok((labels, next_label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::ImageSize;

    #[test]
    fn labels_empty_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 3,
            },
            0,
        )?;
        let (labels, count) = connected_components(&image, Connectivity::Four)?;
        assert_eq!(count, 0);
        assert!(labels.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn diagonal_regions_depend_on_connectivity() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let data = vec![
            1u8, 0,
            0, 1,
        ];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            data,
        )?;

        let (_, count_four) = connected_components(&image, Connectivity::Four)?;
        assert_eq!(count_four, 2);

        let (_, count_eight) = connected_components(&image, Connectivity::Eight)?;
        assert_eq!(count_eight, 1);
        Ok(())
    }

    #[test]
    fn labels_are_raster_ordered() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let data = vec![
            0u8, 1, 0,
            0, 0, 0,
            1, 0, 0,
        ];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            data,
        )?;

        let (labels, count) = connected_components(&image, Connectivity::Four)?;
        assert_eq!(count, 2);
        assert_eq!(labels.get_pixel(1, 0, 0), Some(&1));
        assert_eq!(labels.get_pixel(0, 2, 0), Some(&2));
        Ok(())
    }

    #[test]
    fn single_blob_keeps_one_label() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 5,
            },
            1,
        )?;
        let (labels, count) = connected_components(&image, Connectivity::Four)?;
        assert_eq!(count, 1);
        assert!(labels.as_slice().iter().all(|&v| v == 1));
        Ok(())
    }
}
