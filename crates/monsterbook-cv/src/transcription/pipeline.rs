//! Page and cell transcription of a single capture

use super::config::TranscriptionConfig;
use crate::buffer::{apply_content_crop, crop, PixelBuffer};
use crate::distance::mse;
use crate::error::{CvError, Stage, StageContext, TranscribeError};
use crate::geometry::{content_crop, grid_cells, tag_region, Rect, TagRegion};
use crate::preprocess::to_grayscale;
use crate::template::{Gallery, TemplateMatcher};
use crate::traits::Classify;
use monsterbook_core::{BookMetadata, PageMetadata};
use serde::Serialize;
use std::time::Instant;

/// Reference data a pipeline is built from.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    /// One template per page, in the same order as `book`.
    pub pages: Gallery,
    /// An unoccupied cell.
    pub empty_cell: PixelBuffer,
    /// The tag region of an unoccupied cell.
    pub empty_tag: PixelBuffer,
    /// Count glyphs; a glyph's position plus one is the count it reads as.
    pub tags: Gallery,
    pub book: BookMetadata,
}

/// One occupied cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRecord {
    /// Row-major position among all cells of the page, before filtering.
    pub slot_index: u32,
    pub global_offset: u32,
    /// Displayed stack count, 0 when no count is visible.
    pub count_value: u32,
    #[serde(skip)]
    pub image: PixelBuffer,
}

/// Transcription statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionStats {
    pub page_distance: u64,
    pub occupied_cells: usize,
    pub counted_cells: usize,
    pub processing_time_ms: u64,
}

/// Everything read from one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    pub matched_page_index: usize,
    pub layout_preset: String,
    pub page: PageMetadata,
    pub cells: Vec<CellRecord>,
    pub stats: TranscriptionStats,
    #[serde(skip)]
    pub cropped_capture: PixelBuffer,
}

/// Crop the content region of a raw capture.
pub fn crop_content(capture: &PixelBuffer, config: &TranscriptionConfig) -> Result<(String, PixelBuffer), CvError> {
    let (width, height) = capture.dimensions();
    let content = content_crop(width, height, &config.layout, config.allow_fallback)?;
    let cropped = apply_content_crop(capture, &content)?;
    Ok((content.preset, cropped))
}

/// Cell rectangles and cell images of a content crop, row-major.
pub fn crop_cells(content: &PixelBuffer, config: &TranscriptionConfig) -> Result<Vec<(Rect, PixelBuffer)>, CvError> {
    let (width, height) = content.dimensions();
    grid_cells(Rect::full(width, height), config.grid.rows, config.grid.cols)?
        .into_iter()
        .map(|bounds| crop(content, bounds).map(|cell| (bounds, cell)))
        .collect()
}

/// Tag image of the cell at `cell_bounds` inside `content`.
pub fn crop_tag(content: &PixelBuffer, cell_bounds: Rect, region: &TagRegion) -> Result<PixelBuffer, CvError> {
    crop(content, tag_region(cell_bounds, region)?)
}

/// Grayscale error of a cell against the empty cell template.
pub fn empty_distance(cell: &PixelBuffer, empty_cell: &PixelBuffer) -> Result<u64, CvError> {
    mse(&to_grayscale(cell.clone()), &to_grayscale(empty_cell.clone()))
}

/// Whether a cell differs from the empty template by more than `threshold`.
///
/// An error equal to the threshold still counts as empty.
pub fn is_occupied(cell: &PixelBuffer, empty_cell: &PixelBuffer, threshold: u64) -> Result<bool, CvError> {
    Ok(empty_distance(cell, empty_cell)? > threshold)
}

/// Nearest-template transcriber for book captures.
pub struct TranscriptionPipeline {
    config: TranscriptionConfig,
    page_matcher: TemplateMatcher,
    tag_matcher: TemplateMatcher,
    empty_cell_gray: PixelBuffer,
    empty_tag: PixelBuffer,
    book: BookMetadata,
}

impl TranscriptionPipeline {
    /// Build a pipeline, preprocessing the galleries once.
    ///
    /// Fails if there are more page templates than page metadata entries.
    pub fn new(config: TranscriptionConfig, references: ReferenceSet) -> Result<Self, CvError> {
        if references.pages.len() > references.book.len() {
            return Err(CvError::MissingPageMetadata {
                page_index: references.book.len(),
                pages: references.book.len(),
            });
        }

        let page_matcher = TemplateMatcher::new(&references.pages, config.page_preprocessing);
        let tag_matcher = TemplateMatcher::new(&references.tags, config.tag_preprocessing);

        log::debug!(
            "Pipeline ready: {} page templates, {} tag glyphs",
            page_matcher.len(),
            tag_matcher.len()
        );

        Ok(Self {
            config,
            page_matcher,
            tag_matcher,
            empty_cell_gray: to_grayscale(references.empty_cell),
            empty_tag: references.empty_tag,
            book: references.book,
        })
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    pub fn book(&self) -> &BookMetadata {
        &self.book
    }

    /// Whether a cell image holds a card.
    pub fn is_occupied(&self, cell: &PixelBuffer) -> Result<bool, CvError> {
        let error = mse(&to_grayscale(cell.clone()), &self.empty_cell_gray)?;
        Ok(error > self.config.empty_threshold)
    }

    /// Stack count shown on a tag, 0 when the tag is blank.
    pub fn read_count(&self, tag: &PixelBuffer) -> Result<u32, CvError> {
        let error = mse(tag, &self.empty_tag)?;
        if error <= self.config.unseen_threshold {
            return Ok(0);
        }
        Ok(self.tag_matcher.classify(tag)? as u32 + 1)
    }

    /// Transcribe a decoded capture.
    pub fn transcribe(&self, capture: &PixelBuffer) -> Result<TranscriptionResult, TranscribeError> {
        let start_time = Instant::now();

        let (layout_preset, content) = crop_content(capture, &self.config).stage(Stage::ContentCrop)?;

        let page_match = self
            .page_matcher
            .match_template(&content)
            .stage(Stage::PageClassification)?;
        let page = self
            .book
            .page(page_match.index)
            .cloned()
            .ok_or(CvError::MissingPageMetadata {
                page_index: page_match.index,
                pages: self.book.len(),
            })
            .stage(Stage::PageClassification)?;

        let cells = crop_cells(&content, &self.config).stage(Stage::CellPartition)?;

        let mut records = Vec::new();
        for (slot_index, (bounds, cell)) in cells.into_iter().enumerate() {
            if !self.is_occupied(&cell).stage(Stage::CellFilter)? {
                log::debug!("Cell {} is empty", slot_index);
                continue;
            }

            let count_value = crop_tag(&content, bounds, &self.config.tag_region)
                .and_then(|tag| self.read_count(&tag))
                .stage(Stage::TagClassification)?;

            log::debug!("Cell {} occupied, count {}", slot_index, count_value);
            records.push(CellRecord {
                slot_index: slot_index as u32,
                global_offset: page.entry_offset + slot_index as u32,
                count_value,
                image: cell,
            });
        }

        let stats = TranscriptionStats {
            page_distance: page_match.distance,
            occupied_cells: records.len(),
            counted_cells: records.iter().filter(|record| record.count_value > 0).count(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        log::info!(
            "Transcribed page {} ({}) with {} occupied cells",
            page.page_id,
            page.label(),
            stats.occupied_cells
        );

        Ok(TranscriptionResult {
            matched_page_index: page_match.index,
            layout_preset,
            page,
            cells: records,
            stats,
            cropped_capture: content,
        })
    }

}
