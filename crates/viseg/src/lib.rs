#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use viseg_image as image;

#[doc(inline)]
pub use viseg_imgproc as imgproc;

#[doc(inline)]
pub use viseg_plugin as plugin;
