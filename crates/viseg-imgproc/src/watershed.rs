use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use viseg_image::{Image, ImageError};

/// A pixel queued for flooding, ordered by height with insertion-order
/// tie-break.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FloodItem {
    pub(crate) height: f32,
    pub(crate) order: u64,
    pub(crate) index: usize,
    pub(crate) label: u32,
}

impl PartialEq for FloodItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloodItem {}

impl PartialOrd for FloodItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloodItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.height
            .total_cmp(&other.height)
            .then(self.order.cmp(&other.order))
    }
}

/// Flood an intensity surface from labeled seeds.
///
/// Implements the priority-flood watershed: seed pixels keep their labels
/// and the surface is flooded lowest-first, so every remaining pixel
/// receives the label of the basin reaching it earliest. Flooding uses the
/// 4-connected neighborhood.
///
/// # Arguments
///
/// * `heights` - The topographic surface; valleys are flooded first.
/// * `seeds` - The seed label map, same size as the surface; 0 is unseeded.
///
/// # Returns
///
/// A label map where every pixel connected to a seed carries a seed label.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::watershed::watershed;
///
/// let heights = Image::<f32, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![0.0, 1.0, 9.0, 1.0, 0.0],
/// ).unwrap();
/// let seeds = Image::<u32, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![1, 0, 0, 0, 2],
/// ).unwrap();
///
/// let labels = watershed(&heights, &seeds).unwrap();
/// assert_eq!(labels.as_slice()[0], 1);
/// assert_eq!(labels.as_slice()[1], 1);
/// assert_eq!(labels.as_slice()[3], 2);
/// assert_eq!(labels.as_slice()[4], 2);
/// ```
pub fn watershed(heights: &Image<f32, 1>, seeds: &Image<u32, 1>) -> Result<Image<u32, 1>, ImageError> {
    if heights.size() != seeds.size() {
        return Err(ImageError::InvalidImageSize(
            heights.cols(),
            heights.rows(),
            seeds.cols(),
            seeds.rows(),
        ));
    }

    let rows = heights.rows();
    let cols = heights.cols();
    let height_data = heights.as_slice();

    let mut labels = seeds.clone();
    let labels_data = labels.as_slice_mut();

    let mut heap = BinaryHeap::new();
    let mut order = 0u64;

    for (index, &label) in labels_data.iter().enumerate() {
        if label != 0 {
            heap.push(Reverse(FloodItem {
                height: height_data[index],
                order,
                index,
                label,
            }));
            order += 1;
        }
    }

    while let Some(Reverse(item)) = heap.pop() {
        let x = (item.index % cols) as isize;
        let y = (item.index / cols) as isize;

        for (dx, dy) in [(0isize, -1isize), (-1, 0), (1, 0), (0, 1)] {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= cols as isize || ny >= rows as isize {
                continue;
            }
            let nidx = ny as usize * cols + nx as usize;
            if labels_data[nidx] == 0 {
                labels_data[nidx] = item.label;
                heap.push(Reverse(FloodItem {
                    height: height_data[nidx],
                    order,
                    index: nidx,
                    label: item.label,
                }));
                order += 1;
            }
        }
    }

    Ok(labels)
}
