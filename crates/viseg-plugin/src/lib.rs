#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// the menu function catalog.
pub mod functions;

/// transform registration metadata.
pub mod registry;

/// slice-by-slice stack adapters.
pub mod slicer;

/// viewer context handle.
pub mod viewer;

pub use registry::{provide_transforms, SlicePolicy, Transform, TransformKind};
pub use viewer::{FixedTimeStep, ViewerContext};
