//! Mean squared error between equally sized buffers

use crate::buffer::{ensure_same_size, PixelBuffer};
use crate::error::CvError;

/// Mean squared error over the red channel, truncated to an integer.
///
/// Only the red channel is compared; after grayscale reduction all colour
/// channels carry the same value. Two zero-area buffers have an error of 0.
pub fn mse(a: &PixelBuffer, b: &PixelBuffer) -> Result<u64, CvError> {
    ensure_same_size(a, b)?;

    let pixels = a.width() as u64 * a.height() as u64;
    if pixels == 0 {
        return Ok(0);
    }

    let sum: u64 = a
        .pixels()
        .zip(b.pixels())
        .map(|(pa, pb)| {
            let diff = pa[0].abs_diff(pb[0]) as u64;
            diff * diff
        })
        .sum();

    Ok(sum / pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::filled;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_buffer(rng: &mut StdRng, width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |_, _| Rgba(rng.r#gen::<[u8; 4]>()))
    }

    #[test]
    fn test_zero_identity_and_symmetry() -> Result<(), CvError> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let a = random_buffer(&mut rng, 13, 9);
            let b = random_buffer(&mut rng, 13, 9);
            assert_eq!(mse(&a, &a)?, 0);
            assert_eq!(mse(&a, &b)?, mse(&b, &a)?);
        }
        Ok(())
    }

    #[test]
    fn test_truncates() -> Result<(), CvError> {
        let a = filled(2, 1, [0, 0, 0, 255]);
        let mut b = a.clone();
        b.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
        b.put_pixel(1, 0, Rgba([2, 0, 0, 255]));
        // (1 + 4) / 2 = 2.5
        assert_eq!(mse(&a, &b)?, 2);
        Ok(())
    }

    #[test]
    fn test_red_channel_only() -> Result<(), CvError> {
        let a = filled(3, 3, [10, 0, 0, 255]);
        let b = filled(3, 3, [10, 200, 200, 0]);
        assert_eq!(mse(&a, &b)?, 0);
        Ok(())
    }

    #[test]
    fn test_size_mismatch() {
        let a = filled(3, 3, [0; 4]);
        let b = filled(3, 4, [0; 4]);
        assert!(matches!(mse(&a, &b), Err(CvError::SizeMismatch { .. })));
    }
}
