//! RGBA pixel buffers passed between pipeline stages

use crate::error::CvError;
use crate::geometry::{ContentCrop, Rect};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

/// Row-major RGBA8 buffer, 4 samples per pixel.
pub type PixelBuffer = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Wrap raw interleaved RGBA samples.
pub fn from_samples(width: u32, height: u32, samples: Vec<u8>) -> Result<PixelBuffer, CvError> {
    let len = samples.len();
    ImageBuffer::from_raw(width, height, samples)
        .filter(|_| len == width as usize * height as usize * 4)
        .ok_or(CvError::InvalidBuffer { width, height, len })
}

/// Buffer of a single colour.
pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
    ImageBuffer::from_pixel(width, height, Rgba(rgba))
}

/// Fail with `SizeMismatch` unless both buffers have the same dimensions.
pub fn ensure_same_size(expected: &PixelBuffer, actual: &PixelBuffer) -> Result<(), CvError> {
    if expected.dimensions() != actual.dimensions() {
        return Err(CvError::SizeMismatch {
            expected: expected.dimensions(),
            actual: actual.dimensions(),
        });
    }
    Ok(())
}

/// Copy `rect` out of `buffer` into a new buffer.
pub fn crop(buffer: &PixelBuffer, rect: Rect) -> Result<PixelBuffer, CvError> {
    let (width, height) = buffer.dimensions();
    if !rect.fits(width, height) {
        return Err(CvError::CropOutOfBounds {
            rect,
            width,
            height,
        });
    }
    Ok(imageops::crop_imm(buffer, rect.left, rect.top, rect.width(), rect.height()).to_image())
}

/// Resize to exactly `width` x `height`; the aspect ratio is not kept.
pub fn resize(buffer: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if buffer.dimensions() == (width, height) {
        return buffer.clone();
    }
    imageops::resize(buffer, width, height, FilterType::Triangle)
}

/// Crop the content region of a capture, downscaling when the crop asks for it.
pub fn apply_content_crop(capture: &PixelBuffer, content: &ContentCrop) -> Result<PixelBuffer, CvError> {
    let cropped = crop(capture, content.rect)?;
    Ok(match content.resize_to {
        Some((width, height)) => resize(&cropped, width, height),
        None => cropped,
    })
}
