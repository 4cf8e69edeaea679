use viseg_image::{Image, ImageError};

/// The metric reported by the distance transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance.
    #[default]
    Euclidean,
    /// Squared euclidean distance.
    SquaredEuclidean,
}

/// One-dimensional lower envelope of the parabolas `(x - i)^2 + f(i)`.
///
/// `f` holds squared distances, `out` receives the squared minima.
/// `hull_pos` must hold at least `f.len()` entries and `hull_sep` one more.
pub(crate) fn lower_envelope_sq(
    f: &[f64],
    out: &mut [f64],
    hull_pos: &mut [usize],
    hull_sep: &mut [f64],
) {
    let n = f.len();
    if n == 0 {
        return;
    }

    let mut k = 0usize;
    hull_pos[0] = 0;
    hull_sep[0] = f64::NEG_INFINITY;
    hull_sep[1] = f64::INFINITY;

    for q in 1..n {
        let mut s;
        loop {
            let p = hull_pos[k];
            s = ((f[q] + (q * q) as f64) - (f[p] + (p * p) as f64))
                / (2.0 * q as f64 - 2.0 * p as f64);
            if s <= hull_sep[k] && k > 0 {
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        hull_pos[k] = q;
        hull_sep[k] = s;
        hull_sep[k + 1] = f64::INFINITY;
    }

    k = 0;
    for x in 0..n {
        while hull_sep[k + 1] < x as f64 {
            k += 1;
        }
        let p = hull_pos[k];
        let dx = x as f64 - p as f64;
        out[x] = dx * dx + f[p];
    }
}

/// Compute the exact euclidean distance transform of a binary image.
///
/// Every non-zero pixel receives the distance to the nearest zero pixel,
/// zero pixels map to 0. Uses the two-phase column/row scan: a vertical
/// nearest-background pass followed by a per-row lower envelope of
/// parabolas.
///
/// An image without any background pixel saturates to `f32::MAX`;
/// out-of-image is not treated as background.
///
/// # Arguments
///
/// * `src` - The binary input image; any non-zero pixel is foreground.
/// * `metric` - Report euclidean or squared euclidean distances.
///
/// # Examples
///
/// ```
/// use viseg_image::{Image, ImageSize};
/// use viseg_imgproc::distance::{distance_transform, DistanceMetric};
///
/// let data = vec![
///     0u8, 1, 1,
///     0, 1, 1,
///     0, 1, 1,
/// ];
/// let image = Image::<_, 1>::new(ImageSize { width: 3, height: 3 }, data).unwrap();
///
/// let dist = distance_transform(&image, DistanceMetric::Euclidean).unwrap();
/// assert_eq!(dist.get_pixel(0, 1, 0), Some(&0.0));
/// assert_eq!(dist.get_pixel(1, 1, 0), Some(&1.0));
/// assert_eq!(dist.get_pixel(2, 1, 0), Some(&2.0));
/// ```
pub fn distance_transform(
    src: &Image<u8, 1>,
    metric: DistanceMetric,
) -> Result<Image<f32, 1>, ImageError> {
    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();

    let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

    if !src_data.iter().any(|&v| v == 0) {
        dst.as_slice_mut().fill(f32::MAX);
        return Ok(dst);
    }

    // larger than any vertical run, squares stay above any true distance
    let inf = (rows + cols) as f64;

    // phase 1: per-column distance to the nearest background pixel
    let mut g = vec![0.0f64; rows * cols];
    for c in 0..cols {
        g[c] = if src_data[c] == 0 { 0.0 } else { inf };
    }
    for r in 1..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            g[idx] = if src_data[idx] == 0 {
                0.0
            } else {
                g[idx - cols] + 1.0
            };
        }
    }
    for r in (0..rows - 1).rev() {
        for c in 0..cols {
            let idx = r * cols + c;
            let below = g[idx + cols] + 1.0;
            if below < g[idx] {
                g[idx] = below;
            }
        }
    }

    // phase 2: per-row lower envelope of the parabolas (x - i)^2 + g(i)^2
    let dst_data = dst.as_slice_mut();
    let mut f = vec![0.0f64; cols];
    let mut envelope = vec![0.0f64; cols];
    let mut hull_pos = vec![0usize; cols];
    let mut hull_sep = vec![0.0f64; cols + 1];

    for r in 0..rows {
        let row = &g[r * cols..(r + 1) * cols];
        for (fv, &gv) in f.iter_mut().zip(row.iter()) {
            *fv = gv * gv;
        }
        lower_envelope_sq(&f, &mut envelope, &mut hull_pos, &mut hull_sep);

        for (x, &dist_sq) in envelope.iter().enumerate() {
            dst_data[r * cols + x] = match metric {
                DistanceMetric::Euclidean => dist_sq.sqrt() as f32,
                DistanceMetric::SquaredEuclidean => dist_sq as f32,
            };
        }
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::ImageSize;

    #[test]
    fn background_stays_zero() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0,
        )?;
        let dist = distance_transform(&image, DistanceMetric::Euclidean)?;
        assert!(dist.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }

    #[test]
    fn all_foreground_saturates() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            1,
        )?;
        let dist = distance_transform(&image, DistanceMetric::SquaredEuclidean)?;
        assert!(dist.as_slice().iter().all(|&v| v == f32::MAX));
        Ok(())
    }

    #[test]
    fn single_background_pixel_exact() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let mut data = vec![1u8; 25];
        data[2 * 5 + 2] = 0;
        let image = Image::<_, 1>::new(size, data)?;

        let dist = distance_transform(&image, DistanceMetric::SquaredEuclidean)?;
        // squared distances to the center background pixel
        assert_eq!(dist.get_pixel(2, 2, 0), Some(&0.0));
        assert_eq!(dist.get_pixel(3, 2, 0), Some(&1.0));
        assert_eq!(dist.get_pixel(3, 3, 0), Some(&2.0));
        assert_eq!(dist.get_pixel(0, 0, 0), Some(&8.0));
        assert_eq!(dist.get_pixel(4, 0, 0), Some(&8.0));
        Ok(())
    }

    #[test]
    fn euclidean_is_sqrt_of_squared() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 7,
            height: 3,
        };
        let mut data = vec![1u8; 21];
        data[7] = 0; // (0, 1)
        let image = Image::<_, 1>::new(size, data)?;

        let sq = distance_transform(&image, DistanceMetric::SquaredEuclidean)?;
        let eu = distance_transform(&image, DistanceMetric::Euclidean)?;
        for (s, e) in sq.as_slice().iter().zip(eu.as_slice().iter()) {
            assert!((e * e - s).abs() < 1e-3);
        }
        Ok(())
    }

    #[test]
    fn ridge_between_two_background_columns() -> Result<(), ImageError> {
        // background on the left and right borders, distance peaks mid-row
        let size = ImageSize {
            width: 7,
            height: 1,
        };
        let mut data = vec![1u8; 7];
        data[0] = 0;
        data[6] = 0;
        let image = Image::<_, 1>::new(size, data)?;

        let dist = distance_transform(&image, DistanceMetric::Euclidean)?;
        assert_eq!(dist.as_slice(), &[0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
        Ok(())
    }
}
