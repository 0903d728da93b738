//! Error types for the capture pipeline

use crate::geometry::Rect;
use std::fmt;

/// Errors raised by the pixel-level stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CvError {
    #[error("no layout preset for a {width}x{height} capture and fallback is disabled")]
    UnsupportedResolution { width: u32, height: u32 },
    #[error("buffer size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("gallery `{gallery}` is empty")]
    EmptyGallery { gallery: String },
    #[error("crop {rect} does not fit in a {width}x{height} buffer")]
    CropOutOfBounds { rect: Rect, width: u32, height: u32 },
    #[error("{len} samples cannot form a {width}x{height} RGBA buffer")]
    InvalidBuffer { width: u32, height: u32, len: usize },
    #[error("page {page_index} has no metadata ({pages} pages known)")]
    MissingPageMetadata { page_index: usize, pages: usize },
    #[error("{what} overflows pixel coordinates")]
    GeometryOverflow { what: &'static str },
    #[error("cannot split a {width}x{height} region into {rows}x{cols} cells")]
    InvalidGrid {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },
}

/// Pipeline stage a transcription failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Stage {
    ContentCrop,
    PageClassification,
    CellPartition,
    CellFilter,
    TagClassification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ContentCrop => "content crop",
            Stage::PageClassification => "page classification",
            Stage::CellPartition => "cell partition",
            Stage::CellFilter => "cell filter",
            Stage::TagClassification => "tag classification",
        };
        f.write_str(name)
    }
}

/// A failed transcription, tagged with the stage that aborted it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} failed: {source}")]
pub struct TranscribeError {
    pub stage: Stage,
    #[source]
    pub source: CvError,
}

impl TranscribeError {
    pub fn new(stage: Stage, source: CvError) -> Self {
        Self { stage, source }
    }
}

/// Attach a pipeline stage to a pixel-level result.
pub(crate) trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T, TranscribeError>;
}

impl<T> StageContext<T> for Result<T, CvError> {
    fn stage(self, stage: Stage) -> Result<T, TranscribeError> {
        self.map_err(|source| TranscribeError::new(stage, source))
    }
}
