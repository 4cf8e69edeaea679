#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// euclidean distance transform module.
pub mod distance;

/// image filtering module.
pub mod filter;

/// connected component labeling module.
pub mod labeling;

/// regional maxima detection module.
pub mod maxima;

/// binary morphology module.
pub mod morphology;

/// operations to normalize images.
pub mod normalize;

/// module containing parallization utilities.
pub mod parallel;

/// touching-object splitting module.
pub mod split;

/// operations to threshold images.
pub mod threshold;

/// volume-native operations on stacks.
pub mod volume;

/// seeded watershed segmentation module.
pub mod watershed;
