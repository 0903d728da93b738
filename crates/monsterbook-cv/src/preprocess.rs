//! Grayscale reduction and Sobel edge extraction
//!
//! Both transforms keep the buffer dimensions and the alpha channel. The
//! arithmetic mirrors 8-bit canvas pixel stores: values are rounded half to
//! even and clamped to `0..=255` after every step, which the stored
//! reference templates depend on.

use crate::buffer::PixelBuffer;
use crate::traits::Preprocess;
use serde::{Deserialize, Serialize};

/// Luma weights for R, G and B. Red and green share a weight on purpose.
const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.2989, 0.114];

const SOBEL_X: [[i32; 3]; 3] = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];
const SOBEL_Y: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

/// Preprocessing applied to probe and gallery before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preprocessing {
    /// Compare raw pixels
    #[default]
    Identity,
    /// Grayscale only
    Grayscale,
    /// Grayscale followed by Sobel edges
    Edges,
}

impl Preprocess for Preprocessing {
    fn preprocess(&self, buffer: &PixelBuffer) -> PixelBuffer {
        match self {
            Preprocessing::Identity => buffer.clone(),
            Preprocessing::Grayscale => to_grayscale(buffer.clone()),
            Preprocessing::Edges => sobel_edges(&to_grayscale(buffer.clone())),
        }
    }
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let value = LUMA_WEIGHTS[0] * r as f64 + LUMA_WEIGHTS[1] * g as f64 + LUMA_WEIGHTS[2] * b as f64;
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Replace R, G and B of every pixel with its luma. Alpha is kept.
pub fn to_grayscale(mut buffer: PixelBuffer) -> PixelBuffer {
    for pixel in buffer.pixels_mut() {
        let gray = luma(pixel[0], pixel[1], pixel[2]);
        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
    }
    buffer
}

/// Convolve one colour channel at `(x, y)` with zero padding, clamped to a byte.
#[inline]
fn convolve_at(src: &PixelBuffer, kernel: &[[i32; 3]; 3], x: u32, y: u32, channel: usize) -> u8 {
    let (width, height) = src.dimensions();
    let mut acc = 0i32;

    for (i, row) in kernel.iter().enumerate() {
        // True convolution: the kernel is flipped relative to the image.
        let sy = y as i64 + 1 - i as i64;
        if sy < 0 || sy >= height as i64 {
            continue;
        }
        for (j, &weight) in row.iter().enumerate() {
            let sx = x as i64 + 1 - j as i64;
            if weight == 0 || sx < 0 || sx >= width as i64 {
                continue;
            }
            acc += weight * src.get_pixel(sx as u32, sy as u32)[channel] as i32;
        }
    }

    acc.clamp(0, 255) as u8
}

fn sobel_row(src: &PixelBuffer, y: u32, row: &mut [u8]) {
    for x in 0..src.width() {
        let base = x as usize * 4;
        for channel in 0..3 {
            let horizontal = convolve_at(src, &SOBEL_X, x, y, channel);
            let vertical = convolve_at(src, &SOBEL_Y, x, y, channel);
            row[base + channel] = horizontal.saturating_add(vertical);
        }
    }
}

/// Sum of the horizontal and vertical Sobel responses per channel.
///
/// Each response is clamped to `0..=255` before the saturating sum, so
/// negative gradients vanish. This is not the gradient magnitude.
///
/// The kernels are flipped (true convolution) and the border is zero
/// padded. A uniform image therefore keeps a response along its left and
/// top borders, while its right and bottom borders clamp to zero.
pub fn sobel_edges(buffer: &PixelBuffer) -> PixelBuffer {
    let mut output = buffer.clone();
    let row_len = buffer.width() as usize * 4;
    if row_len == 0 {
        return output;
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| sobel_row(buffer, y as u32, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| sobel_row(buffer, y as u32, row));
    }

    output
}
