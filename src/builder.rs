//! Building the empty cell and seed tag assets from screenshots

use crate::assets::AssetDir;
use anyhow::{anyhow, bail, Context, Result};
use monsterbook_cv::geometry::grid_cells;
use monsterbook_cv::transcription::{collect_tags, crop_cells, crop_content, crop_tag, merge_tags};
use monsterbook_cv::utils::ImageUtils;
use monsterbook_cv::{Gallery, PixelBuffer, Rect, TemplateLoader, TranscriptionConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Seed locations used when none are given, as `page-slot`.
pub const DEFAULT_LOCATIONS: &str = "2-10,2-2,2-14,4-17,4-0";

/// Parse a comma-separated list of `page-slot` pairs.
pub fn parse_locations(locations: &str) -> Result<Vec<(usize, usize)>> {
    locations
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let (page, slot) = entry
                .split_once('-')
                .ok_or_else(|| anyhow!("Location `{}` is not `page-slot`", entry))?;
            let page = page
                .parse()
                .with_context(|| format!("Bad page in location `{}`", entry))?;
            let slot = slot
                .parse()
                .with_context(|| format!("Bad slot in location `{}`", entry))?;
            Ok((page, slot))
        })
        .collect()
}

/// Write cell `(row, col)` of the first reference page as the empty cell.
pub fn write_empty_card(assets: &AssetDir, row: u32, col: u32, config: &TranscriptionConfig) -> Result<PathBuf> {
    let reference = TemplateLoader::new()
        .add_template_dir(assets.reference_dir())
        .load_all_templates()?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No reference pages in {:?}", assets.reference_dir()))?;

    if row >= config.grid.rows || col >= config.grid.cols {
        bail!(
            "Cell ({}, {}) is outside the {}x{} grid",
            row,
            col,
            config.grid.rows,
            config.grid.cols
        );
    }
    let index = (row * config.grid.cols + col) as usize;
    let (_, cell) = crop_cells(&reference.image, config)?
        .into_iter()
        .nth(index)
        .ok_or_else(|| anyhow!("Grid has no cell {}", index))?;

    let dir = assets.empty_dir();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;
    let path = dir.join("empty.png");
    ImageUtils::save_image(&cell, &path)?;
    log::info!("Empty cell taken from `{}` ({}, {})", reference.name, row, col);
    Ok(path)
}

fn seed_tag(contents: &[PixelBuffer], page: usize, slot: usize, config: &TranscriptionConfig) -> Result<PixelBuffer> {
    let content = contents
        .get(page)
        .ok_or_else(|| anyhow!("Seed page {} is past the last of {} screenshots", page, contents.len()))?;
    let (width, height) = content.dimensions();
    let bounds = grid_cells(Rect::full(width, height), config.grid.rows, config.grid.cols)?
        .get(slot)
        .copied()
        .ok_or_else(|| anyhow!("Seed slot {} is not on the page", slot))?;
    Ok(crop_tag(content, bounds, &config.tag_region)?)
}

/// Cluster the tags of every occupied cell around the seed locations and
/// write one merged glyph per cluster as `seed_tags/{n}.png`, from 1.
pub fn write_seed_tags(
    source_dir: &Path,
    assets: &AssetDir,
    locations: &[(usize, usize)],
    threshold: u64,
    config: &TranscriptionConfig,
) -> Result<usize> {
    let contents = TemplateLoader::new()
        .add_template_dir(source_dir)
        .load_all_templates()?
        .iter()
        .map(|screenshot| {
            crop_content(&screenshot.image, config)
                .map(|(_, content)| content)
                .with_context(|| format!("Failed to crop screenshot `{}`", screenshot.name))
        })
        .collect::<Result<Vec<_>>>()?;
    let empty_cell = assets.load_empty_cell(config)?;

    let seeds = locations
        .iter()
        .map(|&(page, slot)| seed_tag(&contents, page, slot, config))
        .collect::<Result<Vec<_>>>()?;
    let seeds = Gallery::from_images("seeds", seeds)?;

    let tags = collect_tags(&contents, &empty_cell, config, threshold)?;
    let glyphs = merge_tags(&tags, &seeds)?;

    let dir = assets.seed_tag_dir();
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;
    for (index, glyph) in glyphs.iter().enumerate() {
        ImageUtils::save_image(glyph, dir.join(format!("{}.png", index + 1)))?;
    }
    log::info!("Wrote {} seed tags to {:?}", glyphs.len(), dir);
    Ok(glyphs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops;
    use monsterbook_cv::buffer::filled;

    const GRAY: [u8; 4] = [128, 128, 128, 255];

    fn card(shade: u8) -> PixelBuffer {
        let mut card = filled(33, 45, [0, 0, 0, 255]);
        imageops::replace(&mut card, &filled(6, 9, [shade, shade, shade, 255]), 5, 31);
        card
    }

    /// 800x600 screenshot with the given cards by slot.
    fn screenshot(cards: &[(u32, u8)]) -> PixelBuffer {
        let mut content = filled(165, 225, GRAY);
        for &(slot, shade) in cards {
            let (x, y) = ((slot % 5) * 33, (slot / 5) * 45);
            imageops::replace(&mut content, &card(shade), x as i64, y as i64);
        }
        let mut capture = filled(800, 600, [0, 0, 0, 255]);
        imageops::replace(&mut capture, &content, 295, 152);
        capture
    }

    #[test]
    fn test_parse_locations() -> Result<()> {
        assert_eq!(
            parse_locations(DEFAULT_LOCATIONS)?,
            vec![(2, 10), (2, 2), (2, 14), (4, 17), (4, 0)]
        );
        assert_eq!(parse_locations(" 0-3 ,1-24")?, vec![(0, 3), (1, 24)]);
        assert!(parse_locations("2:10").is_err());
        assert!(parse_locations("2-x").is_err());
        Ok(())
    }

    #[test]
    fn test_write_empty_card() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let assets = AssetDir::new(dir.path());
        fs::create_dir_all(assets.reference_dir())?;

        let mut first = filled(165, 225, [10, 10, 10, 255]);
        imageops::replace(&mut first, &filled(33, 45, [77, 77, 77, 255]), 4 * 33, 4 * 45);
        ImageUtils::save_image(&first, assets.reference_dir().join("00_red_0.png"))?;
        ImageUtils::save_image(&filled(165, 225, [200, 0, 0, 255]), assets.reference_dir().join("01_orange_0.png"))?;

        let config = TranscriptionConfig::default();
        let path = write_empty_card(&assets, 4, 4, &config)?;
        assert_eq!(path, assets.empty_dir().join("empty.png"));
        assert_eq!(ImageUtils::load_rgba(&path)?, filled(33, 45, [77, 77, 77, 255]));

        assert!(write_empty_card(&assets, 5, 0, &config).is_err());
        Ok(())
    }

    #[test]
    fn test_write_seed_tags() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let assets = AssetDir::new(dir.path().join("assets"));
        let source = dir.path().join("screenshots");
        fs::create_dir_all(&source)?;
        fs::create_dir_all(assets.empty_dir())?;
        ImageUtils::save_image(&filled(33, 45, GRAY), assets.empty_dir().join("empty.png"))?;

        ImageUtils::save_image(&screenshot(&[(0, 40), (3, 200)]), source.join("00.png"))?;
        ImageUtils::save_image(&screenshot(&[(1, 40), (2, 210)]), source.join("01.png"))?;

        let config = TranscriptionConfig::default();
        let written = write_seed_tags(&source, &assets, &[(0, 0), (0, 3)], 4000, &config)?;
        assert_eq!(written, 2);

        let low = ImageUtils::load_rgba(assets.seed_tag_dir().join("1.png"))?;
        let high = ImageUtils::load_rgba(assets.seed_tag_dir().join("2.png"))?;
        assert_eq!(low, filled(6, 9, [40, 40, 40, 255]));
        // 200 & 210
        assert_eq!(high.get_pixel(0, 0)[0], 192);

        assert!(write_seed_tags(&source, &assets, &[(5, 0)], 4000, &config).is_err());
        Ok(())
    }
}
