use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use viseg_image::{Image, ImageError, Stack};

use crate::distance::{lower_envelope_sq, DistanceMetric};
use crate::filter::{kernels, separable_filter};
use crate::labeling::Connectivity;
use crate::watershed::FloodItem;

fn offsets_3d(connectivity: Connectivity) -> Vec<(isize, isize, isize)> {
    match connectivity {
        Connectivity::Four => vec![
            (0, 0, -1),
            (0, -1, 0),
            (-1, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (0, 0, 1),
        ],
        Connectivity::Eight => {
            let mut offsets = Vec::with_capacity(26);
            for dz in -1isize..=1 {
                for dy in -1isize..=1 {
                    for dx in -1isize..=1 {
                        if (dx, dy, dz) != (0, 0, 0) {
                            offsets.push((dx, dy, dz));
                        }
                    }
                }
            }
            offsets
        }
    }
}

/// Label connected regions of non-zero voxels across the whole volume.
///
/// `Connectivity::Four` connects the 6 face neighbors,
/// `Connectivity::Eight` all 26 neighbors. Labels are assigned from 1
/// upwards in raster-scan discovery order, background voxels stay 0.
///
/// # Returns
///
/// The label stack and the number of labeled regions.
///
/// # Examples
///
/// ```
/// use viseg_image::{Stack, StackSize};
/// use viseg_imgproc::labeling::Connectivity;
/// use viseg_imgproc::volume::connected_components_3d;
///
/// // one voxel per slice, stacked on top of each other
/// let stack = Stack::<u8>::new(
///     StackSize { depth: 2, height: 1, width: 2 },
///     vec![1u8, 0, 1, 0],
/// ).unwrap();
///
/// let (labels, count) = connected_components_3d(&stack, Connectivity::Four).unwrap();
/// assert_eq!(count, 1);
/// assert_eq!(labels.as_slice(), [1, 0, 1, 0]);
/// ```
pub fn connected_components_3d(
    src: &Stack<u8>,
    connectivity: Connectivity,
) -> Result<(Stack<u32>, u32), ImageError> {
    let mut labels = Stack::<u32>::from_size_val(src.size(), 0)?;

    let size = src.size();
    let (depth, rows, cols) = (size.depth, size.height, size.width);
    let src_data = src.as_slice();
    let labels_data = labels.as_slice_mut();

    let offsets = offsets_3d(connectivity);
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
            let y = (idx / cols % rows) as isize;
            let z = (idx / (rows * cols)) as isize;

            for &(dx, dy, dz) in &offsets {
                let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                if nx < 0
                    || ny < 0
                    || nz < 0
                    || nx >= cols as isize
                    || ny >= rows as isize
                    || nz >= depth as isize
                {
                    continue;
                }
                let nidx = (nz as usize * rows + ny as usize) * cols + nx as usize;
                if src_data[nidx] != 0 && labels_data[nidx] == 0 {
                    labels_data[nidx] = next_label;
                    queue.push_back(nidx);
                }
            }
        }
    }

    Ok((labels, next_label))
}

/// Compute the exact euclidean distance transform of a binary volume.
///
/// Every non-zero voxel receives the distance to the nearest zero voxel,
/// measured across all three axes. A volume without any background voxel
/// saturates to `f32::MAX`.
///
/// # Arguments
///
/// * `src` - The binary input volume; any non-zero voxel is foreground.
/// * `metric` - Report euclidean or squared euclidean distances.
pub fn distance_transform_3d(
    src: &Stack<u8>,
    metric: DistanceMetric,
) -> Result<Stack<f32>, ImageError> {
    let size = src.size();
    let (depth, rows, cols) = (size.depth, size.height, size.width);
    let src_data = src.as_slice();

    let mut dst = Stack::<f32>::from_size_val(size, 0.0)?;

    if !src_data.iter().any(|&v| v == 0) {
        dst.as_slice_mut().fill(f32::MAX);
        return Ok(dst);
    }

    // larger than any axis run, squares stay above any true distance
    let inf = (depth + rows + cols) as f64;
    let plane = rows * cols;

    // pass 1: nearest background along z
    let mut g = vec![0.0f64; src_data.len()];
    for (gv, &v) in g.iter_mut().zip(src_data.iter()) {
        *gv = if v == 0 { 0.0 } else { inf };
    }
    for z in 1..depth {
        for i in 0..plane {
            let idx = z * plane + i;
            let above = g[idx - plane] + 1.0;
            if above < g[idx] {
                g[idx] = above;
            }
        }
    }
    for z in (0..depth.saturating_sub(1)).rev() {
        for i in 0..plane {
            let idx = z * plane + i;
            let below = g[idx + plane] + 1.0;
            if below < g[idx] {
                g[idx] = below;
            }
        }
    }
    for v in g.iter_mut() {
        *v *= *v;
    }

    // passes 2 and 3: parabola envelopes along y, then along x
    let line_len = rows.max(cols);
    let mut f = vec![0.0f64; line_len];
    let mut envelope = vec![0.0f64; line_len];
    let mut hull_pos = vec![0usize; line_len];
    let mut hull_sep = vec![0.0f64; line_len + 1];

    for z in 0..depth {
        for x in 0..cols {
            for y in 0..rows {
                f[y] = g[z * plane + y * cols + x];
            }
            lower_envelope_sq(&f[..rows], &mut envelope[..rows], &mut hull_pos, &mut hull_sep);
            for y in 0..rows {
                g[z * plane + y * cols + x] = envelope[y];
            }
        }
    }

    let dst_data = dst.as_slice_mut();
    for z in 0..depth {
        for y in 0..rows {
            let base = z * plane + y * cols;
            f[..cols].copy_from_slice(&g[base..base + cols]);
            lower_envelope_sq(&f[..cols], &mut envelope[..cols], &mut hull_pos, &mut hull_sep);
            for (x, &dist_sq) in envelope[..cols].iter().enumerate() {
                dst_data[base + x] = match metric {
                    DistanceMetric::Euclidean => dist_sq.sqrt() as f32,
                    DistanceMetric::SquaredEuclidean => dist_sq as f32,
                };
            }
        }
    }

    Ok(dst)
}

/// Flood an intensity volume from labeled seeds.
///
/// The priority-flood watershed of [`crate::watershed::watershed`], lifted
/// to volumes: flooding crosses slice boundaries through the 6-connected
/// neighborhood.
///
/// # Errors
///
/// Returns an error when the two stacks differ in size.
pub fn watershed_3d(heights: &Stack<f32>, seeds: &Stack<u32>) -> Result<Stack<u32>, ImageError> {
    if heights.size() != seeds.size() {
        return Err(ImageError::InvalidImageSize(
            heights.size().width,
            heights.size().depth * heights.size().height,
            seeds.size().width,
            seeds.size().depth * seeds.size().height,
        ));
    }

    let size = heights.size();
    let (depth, rows, cols) = (size.depth, size.height, size.width);
    let plane = rows * cols;
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
        let y = (item.index / cols % rows) as isize;
        let z = (item.index / plane) as isize;

        for (dx, dy, dz) in [
            (0isize, 0isize, -1isize),
            (0, -1, 0),
            (-1, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (0, 0, 1),
        ] {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            if nx < 0
                || ny < 0
                || nz < 0
                || nx >= cols as isize
                || ny >= rows as isize
                || nz >= depth as isize
            {
                continue;
            }
            let nidx = (nz as usize * rows + ny as usize) * cols + nx as usize;
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

/// Blur a volume with a separable gaussian over all three axes.
///
/// The kernel size is derived from sigma to cover three sigmas on each
/// side; taps falling outside the volume are skipped.
///
/// # Errors
///
/// Returns an error when sigma is not strictly positive.
pub fn gaussian_blur_3d(src: &Stack<f32>, sigma: f32) -> Result<Stack<f32>, ImageError> {
    if sigma <= 0.0 {
        return Err(ImageError::InvalidSigma(sigma));
    }

    let size = src.size();
    let (depth, rows, cols) = (size.depth, size.height, size.width);
    let mut dst = Stack::<f32>::from_size_val(size, 0.0)?;
    if depth == 0 || rows == 0 || cols == 0 {
        return Ok(dst);
    }

    let kernel_size = kernels::gaussian_kernel_size(sigma);
    let kernel = kernels::gaussian_kernel_1d(kernel_size, sigma);

    // x and y passes, per slice
    for z in 0..depth {
        let slice = src.slice(z)?;
        let mut blurred = Image::<f32, 1>::from_size_val(slice.size(), 0.0)?;
        separable_filter(&slice, &mut blurred, &kernel, &kernel)?;
        dst.set_slice(z, &blurred)?;
    }

    // z pass over the already filtered planes; a single plane has no
    // z extent to blur along
    if depth == 1 {
        return Ok(dst);
    }
    let plane = rows * cols;
    let half = kernel.len() as isize / 2;
    let filtered = dst.as_slice().to_vec();
    let dst_data = dst.as_slice_mut();

    for z in 0..depth {
        for i in 0..plane {
            let mut acc = 0.0f32;
            for (t, &k) in kernel.iter().enumerate() {
                let zz = z as isize + t as isize - half;
                if zz >= 0 && zz < depth as isize {
                    acc += filtered[zz as usize * plane + i] * k;
                }
            }
            dst_data[z * plane + i] = acc;
        }
    }

    Ok(dst)
}
