//! Utility modules

pub mod image;
pub mod stitch;

pub use image::ImageUtils;
pub use stitch::stitch_images;
