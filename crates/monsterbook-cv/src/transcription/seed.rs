//! Count glyphs assembled from captured tags

use super::config::TranscriptionConfig;
use super::pipeline::{crop_cells, crop_tag, is_occupied};
use crate::buffer::PixelBuffer;
use crate::error::CvError;
use crate::preprocess::Preprocessing;
use crate::template::{nearest_match, Gallery};

/// Tags of every occupied cell, content by content in slot order.
///
/// A cell is occupied when its grayscale error against `empty_cell` is
/// above `threshold`.
pub fn collect_tags(
    contents: &[PixelBuffer],
    empty_cell: &PixelBuffer,
    config: &TranscriptionConfig,
    threshold: u64,
) -> Result<Vec<PixelBuffer>, CvError> {
    let mut tags = Vec::new();
    for content in contents {
        for (bounds, cell) in crop_cells(content, config)? {
            if is_occupied(&cell, empty_cell, threshold)? {
                tags.push(crop_tag(content, bounds, &config.tag_region)?);
            }
        }
    }
    log::debug!("Collected {} tags from {} captures", tags.len(), contents.len());
    Ok(tags)
}

fn bitwise_and(images: &[&PixelBuffer]) -> Option<PixelBuffer> {
    let (first, rest) = images.split_first()?;
    let mut merged = (*first).clone();
    for image in rest {
        for (sample, other) in merged.iter_mut().zip(image.iter()) {
            *sample &= *other;
        }
    }
    Some(merged)
}

/// Group `tags` by nearest seed and AND the samples of each group.
///
/// Returns one glyph per seed that attracted a tag, in seed order. Seeds
/// nobody matched are skipped.
pub fn merge_tags(tags: &[PixelBuffer], seeds: &Gallery) -> Result<Vec<PixelBuffer>, CvError> {
    let mut groups: Vec<Vec<&PixelBuffer>> = vec![Vec::new(); seeds.len()];
    for tag in tags {
        let index = nearest_match(tag, seeds, &Preprocessing::Identity)?;
        groups[index].push(tag);
    }

    for (index, group) in groups.iter().enumerate() {
        log::info!("Seed {} matched {} tags", index, group.len());
    }

    Ok(groups.iter().filter_map(|group| bitwise_and(group)).collect())
}
