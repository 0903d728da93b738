pub mod metadata;
pub mod tab;

pub use metadata::{BookMetadata, PageMetadata};
pub use tab::TabColor;
