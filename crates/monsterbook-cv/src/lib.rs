//! Monster book capture transcription
//!
//! Identifies which book page a screenshot shows and which of its 25 cells
//! hold a card, using fixed-template nearest-neighbour matching.

pub mod buffer;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod preprocess;
pub mod template;
pub mod transcription;
pub mod utils;

// Re-export commonly used types
pub use buffer::PixelBuffer;
pub use error::{CvError, Stage, TranscribeError};
pub use geometry::{LayoutTable, Rect, TagRegion};
pub use preprocess::Preprocessing;
pub use template::{Gallery, Template, TemplateLoader, TemplateMatcher};
pub use transcription::{ReferenceSet, TranscriptionConfig, TranscriptionPipeline, TranscriptionResult};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;

    /// A transform applied to probe and gallery images before comparison.
    pub trait Preprocess {
        fn preprocess(&self, buffer: &PixelBuffer) -> PixelBuffer;
    }

    impl<F> Preprocess for F
    where
        F: Fn(&PixelBuffer) -> PixelBuffer,
    {
        fn preprocess(&self, buffer: &PixelBuffer) -> PixelBuffer {
            self(buffer)
        }
    }

    /// Trait for nearest-neighbour classifiers over a fixed gallery
    pub trait Classify {
        fn classify(&self, probe: &PixelBuffer) -> std::result::Result<usize, CvError>;
    }
}
