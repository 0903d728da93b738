//! Tiling images onto a single sheet

use crate::buffer::PixelBuffer;
use image::imageops;

/// Tile images row-major, `columns` per row, on a transparent canvas.
///
/// Every tile takes the size of the first image. Returns `None` when there
/// is nothing to stitch.
pub fn stitch_images(images: &[PixelBuffer], columns: u32) -> Option<PixelBuffer> {
    let first = images.first()?;
    let columns = columns.max(1);
    let rows = (images.len() as u32).div_ceil(columns);
    let (tile_width, tile_height) = first.dimensions();

    let mut canvas = PixelBuffer::new(tile_width * columns, tile_height * rows);
    for (index, image) in images.iter().enumerate() {
        let index = index as u32;
        let x = (index % columns) * tile_width;
        let y = (index / columns) * tile_height;
        imageops::overlay(&mut canvas, image, x as i64, y as i64);
    }
    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::filled;

    #[test]
    fn test_stitch_layout() {
        let tiles: Vec<PixelBuffer> = (0..5).map(|i| filled(3, 2, [i * 10, 0, 0, 255])).collect();
        let sheet = stitch_images(&tiles, 2).unwrap();

        assert_eq!(sheet.dimensions(), (6, 6));
        assert_eq!(sheet.get_pixel(0, 0)[0], 0);
        assert_eq!(sheet.get_pixel(3, 0)[0], 10);
        assert_eq!(sheet.get_pixel(0, 2)[0], 20);
        assert_eq!(sheet.get_pixel(0, 4)[0], 40);
        // Unused slot stays transparent.
        assert_eq!(sheet.get_pixel(3, 4)[3], 0);
    }

    #[test]
    fn test_stitch_nothing() {
        assert!(stitch_images(&[], 4).is_none());
    }
}
