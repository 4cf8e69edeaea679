use viseg_image::{ImageError, Stack};

use crate::functions;
use crate::viewer::ViewerContext;

/// How a transform was declared to consume volumetric data.
///
/// Hosts use this to decide whether a transform may be fed an arbitrary
/// sub-volume or wants the full volume at once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlicePolicy {
    /// The transform receives the whole volume of the current time step.
    WholeVolume,
    /// The transform is declared per-plane; feeding it single slices is
    /// equivalent to feeding it the stack.
    SliceBySlice,
}

/// The typed entry point of a registered transform.
#[derive(Clone, Copy)]
pub enum TransformKind {
    /// Intensity in, intensity out, with a sigma parameter.
    ImageFilterSigma(
        fn(&Stack<f32>, f32, Option<&dyn ViewerContext>) -> Result<Stack<f32>, ImageError>,
    ),
    /// Intensity in, intensity out.
    ImageFilter(fn(&Stack<f32>, Option<&dyn ViewerContext>) -> Result<Stack<f32>, ImageError>),
    /// Intensity in, binary mask out.
    Binarize(fn(&Stack<f32>, Option<&dyn ViewerContext>) -> Result<Stack<u8>, ImageError>),
    /// Binary mask in, label map out.
    MaskToLabels(fn(&Stack<u8>, Option<&dyn ViewerContext>) -> Result<Stack<u32>, ImageError>),
    /// Binary mask in, binary mask out.
    MaskFilter(fn(&Stack<u8>, Option<&dyn ViewerContext>) -> Result<Stack<u8>, ImageError>),
    /// Binary mask in, binary mask out, with a sigma parameter.
    MaskFilterSigma(
        fn(&Stack<u8>, f32, Option<&dyn ViewerContext>) -> Result<Stack<u8>, ImageError>,
    ),
    /// Binary mask in, intensity image out.
    MaskToImage(fn(&Stack<u8>, Option<&dyn ViewerContext>) -> Result<Stack<f32>, ImageError>),
    /// Intensity image plus labeled seeds in, label map out.
    SeededLabels(
        fn(
            &Stack<f32>,
            &Stack<u32>,
            Option<&dyn ViewerContext>,
        ) -> Result<Stack<u32>, ImageError>,
    ),
}

/// A transform as advertised to the hosting viewer.
#[derive(Clone, Copy)]
pub struct Transform {
    /// Stable identifier, matches the function name.
    pub name: &'static str,
    /// Menu path under which the host lists the transform.
    pub menu: &'static str,
    /// Declared volumetric consumption mode.
    pub slice_policy: SlicePolicy,
    /// Default sigma for transforms that take one.
    pub default_sigma: Option<f32>,
    /// The entry point.
    pub kind: TransformKind,
}

/// The transform catalog, in registration order.
pub fn provide_transforms() -> Vec<Transform> {
    vec![
        Transform {
            name: "gaussian_blur",
            menu: "Filtering / noise removal > Gaussian (viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: Some(1.0),
            kind: TransformKind::ImageFilterSigma(functions::gaussian_blur),
        },
        Transform {
            name: "threshold_otsu",
            menu: "Segmentation / binarization > Threshold (Otsu et al 1979, viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: None,
            kind: TransformKind::Binarize(functions::threshold_otsu),
        },
        Transform {
            name: "connected_component_labeling",
            menu: "Segmentation / labeling > Connected component labeling (viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: None,
            kind: TransformKind::MaskToLabels(functions::connected_component_labeling),
        },
        Transform {
            name: "sobel_edge_detector",
            menu: "Filtering / edge enhancement > Sobel edge detection (slice-by-slice, viseg)",
            slice_policy: SlicePolicy::SliceBySlice,
            default_sigma: None,
            kind: TransformKind::ImageFilter(functions::sobel_edge_detector),
        },
        Transform {
            name: "binary_fill_holes",
            menu: "Segmentation post-processing > Binary fill holes (slice-by-slice, viseg)",
            slice_policy: SlicePolicy::SliceBySlice,
            default_sigma: None,
            kind: TransformKind::MaskFilter(functions::binary_fill_holes),
        },
        Transform {
            name: "seeded_watershed",
            menu: "Segmentation / labeling > Seeded watershed (viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: None,
            kind: TransformKind::SeededLabels(functions::seeded_watershed),
        },
        Transform {
            name: "split_touching_objects",
            menu: "Segmentation post-processing > Split touching objects (viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: Some(3.5),
            kind: TransformKind::MaskFilterSigma(functions::split_touching_objects),
        },
        Transform {
            name: "euclidean_distance_map",
            menu: "Measurement > Euclidean distance map (viseg)",
            slice_policy: SlicePolicy::WholeVolume,
            default_sigma: None,
            kind: TransformKind::MaskToImage(functions::euclidean_distance_map),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use viseg_image::StackSize;

    #[test]
    fn catalog_order_is_stable() {
        let names: Vec<_> = provide_transforms().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "gaussian_blur",
                "threshold_otsu",
                "connected_component_labeling",
                "sobel_edge_detector",
                "binary_fill_holes",
                "seeded_watershed",
                "split_touching_objects",
                "euclidean_distance_map",
            ]
        );
    }

    #[test]
    fn every_transform_has_a_menu_entry() {
        for t in provide_transforms() {
            assert!(t.menu.contains(" > "), "{} has no menu path", t.name);
            assert!(t.menu.ends_with("(viseg)"), "{} menu: {}", t.name, t.menu);
        }
    }

    #[test]
    fn slice_policies_match_declarations() {
        for t in provide_transforms() {
            let expected = match t.name {
                "sobel_edge_detector" | "binary_fill_holes" => SlicePolicy::SliceBySlice,
                _ => SlicePolicy::WholeVolume,
            };
            assert_eq!(t.slice_policy, expected, "{}", t.name);
        }
    }

    #[test]
    fn sigma_defaults() {
        for t in provide_transforms() {
            let expected = match t.name {
                "gaussian_blur" => Some(1.0),
                "split_touching_objects" => Some(3.5),
                _ => None,
            };
            assert_eq!(t.default_sigma, expected, "{}", t.name);
        }
    }

    #[test]
    fn sigma_parameter_only_on_sigma_kinds() {
        for t in provide_transforms() {
            let takes_sigma = matches!(
                t.kind,
                TransformKind::ImageFilterSigma(_) | TransformKind::MaskFilterSigma(_)
            );
            assert_eq!(takes_sigma, t.default_sigma.is_some(), "{}", t.name);
        }
    }

    #[test]
    fn invoke_through_catalog() -> Result<(), ImageError> {
        let stack = Stack::<f32>::from_size_val(
            StackSize {
                depth: 1,
                height: 4,
                width: 4,
            },
            1.0,
        )?;

        let catalog = provide_transforms();
        let blur = &catalog[0];
        match blur.kind {
            TransformKind::ImageFilterSigma(f) => {
                let out = f(&stack, blur.default_sigma.unwrap(), None)?;
                assert_eq!(out.size(), stack.size());
            }
            _ => panic!("gaussian_blur registered under the wrong kind"),
        }
        Ok(())
    }
}
