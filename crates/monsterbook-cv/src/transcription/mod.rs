//! Capture transcription

pub mod config;
pub mod pipeline;
pub mod seed;

pub use config::{GridConfig, TranscriptionConfig};
pub use pipeline::{
    crop_cells, crop_content, crop_tag, empty_distance, is_occupied, CellRecord, ReferenceSet,
    TranscriptionPipeline, TranscriptionResult, TranscriptionStats,
};
pub use seed::{collect_tags, merge_tags};
