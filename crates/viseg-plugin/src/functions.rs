use viseg_image::{Image, ImageError, Stack};
use viseg_imgproc::distance::DistanceMetric;
use viseg_imgproc::filter;
use viseg_imgproc::labeling::Connectivity;
use viseg_imgproc::morphology;
use viseg_imgproc::normalize::scale_to_u8;
use viseg_imgproc::split;
use viseg_imgproc::threshold;
use viseg_imgproc::volume;

use crate::slicer::{flatten_to_image, map_slices, unflatten_from_image};
use crate::viewer::ViewerContext;

fn log_invocation(name: &str, viewer: Option<&dyn ViewerContext>) {
    match viewer {
        Some(ctx) => log::debug!("{name}: time step {}", ctx.current_time_step()),
        None => log::debug!("{name}"),
    }
}

/// Filter a stack using a gaussian kernel with the given sigma.
///
/// The blur is separable over all three axes, so intensity spreads across
/// slices as well.
pub fn gaussian_blur(
    image: &Stack<f32>,
    sigma: f32,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<f32>, ImageError> {
    log_invocation("gaussian_blur", viewer);
    volume::gaussian_blur_3d(image, sigma)
}

/// Threshold a stack using Otsu's technique.
///
/// The stack is scaled into the 8-bit range over the whole volume, a single
/// Otsu level is computed from the volume histogram, and voxels strictly
/// above it become foreground (1).
pub fn threshold_otsu(
    image: &Stack<f32>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<u8>, ImageError> {
    log_invocation("threshold_otsu", viewer);

    let flat = flatten_to_image(image)?;
    let mut flat_u8 = Image::<u8, 1>::from_size_val(flat.size(), 0)?;
    scale_to_u8(&flat, &mut flat_u8)?;

    let mut mask = Image::<u8, 1>::from_size_val(flat.size(), 0)?;
    threshold::otsu_threshold(&flat_u8, &mut mask, 1)?;

    unflatten_from_image(mask, image.size())
}

/// Label connected regions of a binary stack.
///
/// Regions are connected across slices through the 6-connected
/// neighborhood, so an object spanning several slices gets one label.
pub fn connected_component_labeling(
    binary_image: &Stack<u8>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<u32>, ImageError> {
    log_invocation("connected_component_labeling", viewer);
    let (labels, _count) = volume::connected_components_3d(binary_image, Connectivity::Four)?;
    Ok(labels)
}

/// Enhance edges of a stack using the sobel operator, slice by slice.
pub fn sobel_edge_detector(
    image: &Stack<f32>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<f32>, ImageError> {
    log_invocation("sobel_edge_detector", viewer);
    map_slices(image, |slice| {
        let mut edges = Image::<f32, 1>::from_size_val(slice.size(), 0.0)?;
        filter::sobel(slice, &mut edges)?;
        Ok(edges)
    })
}

/// Fill enclosed holes of a binary stack, slice by slice.
pub fn binary_fill_holes(
    binary_image: &Stack<u8>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<u8>, ImageError> {
    log_invocation("binary_fill_holes", viewer);
    map_slices(binary_image, |slice| {
        let mut filled = Image::<u8, 1>::from_size_val(slice.size(), 0)?;
        morphology::fill_holes(slice, &mut filled)?;
        Ok(filled)
    })
}

/// Label a stack by flooding intensity valleys from labeled seed regions.
///
/// Flooding crosses slice boundaries, so a seed in one slice can claim
/// voxels in its neighbors.
pub fn seeded_watershed(
    image: &Stack<f32>,
    labeled_seeds: &Stack<u32>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<u32>, ImageError> {
    log_invocation("seeded_watershed", viewer);
    volume::watershed_3d(image, labeled_seeds)
}

/// Draw cuts between touching objects of a binary stack, slice by slice.
pub fn split_touching_objects(
    binary: &Stack<u8>,
    sigma: f32,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<u8>, ImageError> {
    log_invocation("split_touching_objects", viewer);
    map_slices(binary, |slice| split::split_touching_objects(slice, sigma))
}

/// Draw a euclidean distance map from a binary stack.
///
/// Non-zero voxels are replaced by the distance to the nearest zero voxel
/// anywhere in the volume.
pub fn euclidean_distance_map(
    binary_image: &Stack<u8>,
    viewer: Option<&dyn ViewerContext>,
) -> Result<Stack<f32>, ImageError> {
    log_invocation("euclidean_distance_map", viewer);
    volume::distance_transform_3d(binary_image, DistanceMetric::Euclidean)
}
