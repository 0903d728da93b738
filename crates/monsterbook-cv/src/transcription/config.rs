//! Transcription configuration

use crate::geometry::{LayoutTable, TagRegion};
use crate::preprocess::Preprocessing;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main transcription configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub layout: LayoutTable,
    /// Use the layout fallback for unknown capture resolutions.
    pub allow_fallback: bool,
    pub grid: GridConfig,
    pub tag_region: TagRegion,
    /// A cell is occupied when its grayscale error against the empty cell
    /// is above this. Lower values mark more blank cells as occupied.
    pub empty_threshold: u64,
    /// A tag is read when its error against the empty tag is above this.
    /// Lower values attempt a glyph match for more tags.
    pub unseen_threshold: u64,
    pub page_preprocessing: Preprocessing,
    pub tag_preprocessing: Preprocessing,
}

/// Grid subdivision of the content region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 5, cols: 5 }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutTable::default(),
            allow_fallback: true,
            grid: GridConfig::default(),
            tag_region: TagRegion::default(),
            empty_threshold: 100,
            unseen_threshold: 5000,
            page_preprocessing: Preprocessing::Edges,
            tag_preprocessing: Preprocessing::Identity,
        }
    }
}

impl TranscriptionConfig {
    /// Only accept captures whose resolution has an exact preset.
    pub fn strict() -> Self {
        Self {
            allow_fallback: false,
            ..Default::default()
        }
    }

    pub fn with_thresholds(mut self, empty_threshold: u64, unseen_threshold: u64) -> Self {
        self.empty_threshold = empty_threshold;
        self.unseen_threshold = unseen_threshold;
        self
    }

    /// Load from a JSON file; absent fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let config: TranscriptionConfig =
            serde_json::from_str(r#"{ "empty_threshold": 250, "grid": { "rows": 4, "cols": 6 } }"#)?;
        assert_eq!(config.empty_threshold, 250);
        assert_eq!(config.unseen_threshold, 5000);
        assert_eq!(config.grid, GridConfig { rows: 4, cols: 6 });
        assert!(config.allow_fallback);
        assert_eq!(config.page_preprocessing, Preprocessing::Edges);
        Ok(())
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        let config = TranscriptionConfig::strict().with_thresholds(1, 2);
        std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;

        assert_eq!(TranscriptionConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_from_missing_file() {
        assert!(TranscriptionConfig::from_file("no/such/config.json").is_err());
    }
}
