//! Image decoding and encoding at the crate boundary

use crate::buffer::PixelBuffer;
use anyhow::{Context, Result};
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load and decode an image file as RGBA, guessing the format from its contents.
    pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
        let path = path.as_ref();
        let img = image::ImageReader::open(path)
            .with_context(|| format!("Failed to open image: {:?}", path))?
            .with_guessed_format()
            .with_context(|| format!("Failed to read image: {:?}", path))?
            .decode()
            .with_context(|| format!("Failed to decode image: {:?}", path))?;

        Ok(img.into_rgba8())
    }

    /// Decode an in-memory encoded image as RGBA.
    pub fn decode_rgba(bytes: &[u8]) -> Result<PixelBuffer> {
        let img = image::load_from_memory(bytes).context("Failed to decode image bytes")?;
        Ok(img.into_rgba8())
    }

    /// Save a buffer; the format follows the file extension.
    pub fn save_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
        let path = path.as_ref();
        buffer
            .save(path)
            .with_context(|| format!("Failed to save image: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::filled;

    #[test]
    fn test_png_file_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cell.png");
        let img = filled(7, 5, [12, 34, 56, 255]);

        ImageUtils::save_image(&img, &path)?;
        let loaded = ImageUtils::load_rgba(&path)?;
        assert_eq!(loaded, img);

        let bytes = std::fs::read(&path)?;
        assert_eq!(ImageUtils::decode_rgba(&bytes)?, img);
        Ok(())
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(ImageUtils::decode_rgba(b"definitely not an image").is_err());
    }
}
