//! Reference asset directory
//!
//! Layout:
//!
//! ```text
//! <root>/reference/*        one template per page, sorted by file name
//! <root>/empty/empty.png    an unoccupied cell
//! <root>/empty/empty_tag.png  optional, else cropped from empty.png
//! <root>/seed_tags/*        count glyphs, sorted by file name
//! <root>/entries/entries.txt
//! ```

use anyhow::{anyhow, Context, Result};
use monsterbook_core::{BookMetadata, Entries};
use monsterbook_cv::buffer::{crop, resize};
use monsterbook_cv::geometry::{grid_cells, tag_region};
use monsterbook_cv::utils::ImageUtils;
use monsterbook_cv::{Rect, ReferenceSet, TemplateLoader, TranscriptionConfig};
use std::path::{Path, PathBuf};

pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.root.join("reference")
    }

    pub fn empty_dir(&self) -> PathBuf {
        self.root.join("empty")
    }

    pub fn seed_tag_dir(&self) -> PathBuf {
        self.root.join("seed_tags")
    }

    fn empty_path(&self) -> PathBuf {
        self.empty_dir().join("empty.png")
    }

    /// Content size and the first cell of its grid.
    fn content_and_cell(config: &TranscriptionConfig) -> Result<((u32, u32), Rect)> {
        let (width, height) = config
            .layout
            .content_size()
            .ok_or_else(|| anyhow!("Layout table has no presets and no fallback"))?;
        let cell = grid_cells(Rect::full(width, height), config.grid.rows, config.grid.cols)?
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Grid has no cells"))?;
        Ok(((width, height), cell))
    }

    /// Load every reference image, normalised to the sizes `config` produces.
    pub fn load_references(&self, config: &TranscriptionConfig) -> Result<ReferenceSet> {
        let ((content_width, content_height), _) = Self::content_and_cell(config)?;
        let tag = config.tag_region;

        let pages = TemplateLoader::new()
            .add_template_dir(self.reference_dir())
            .resize_to(content_width, content_height)
            .load_gallery("pages")?;

        let empty_cell = self.load_empty_cell(config)?;

        let empty_tag_path = self.empty_dir().join("empty_tag.png");
        let empty_tag = if empty_tag_path.exists() {
            resize(&ImageUtils::load_rgba(&empty_tag_path)?, tag.width, tag.height)
        } else {
            let rect = tag_region(Rect::full(empty_cell.width(), empty_cell.height()), &tag)?;
            crop(&empty_cell, rect).context("Tag region does not fit in the empty cell")?
        };

        let tags = TemplateLoader::new()
            .add_template_dir(self.seed_tag_dir())
            .resize_to(tag.width, tag.height)
            .load_gallery("tags")?;

        Ok(ReferenceSet {
            pages,
            empty_cell,
            empty_tag,
            tags,
            book: BookMetadata::standard(),
        })
    }

    /// Only the empty cell, at cell size.
    pub fn load_empty_cell(&self, config: &TranscriptionConfig) -> Result<monsterbook_cv::PixelBuffer> {
        let (_, cell) = Self::content_and_cell(config)?;
        Ok(resize(
            &ImageUtils::load_rgba(self.empty_path())?,
            cell.width(),
            cell.height(),
        ))
    }

    /// Entry names; an absent list yields no names.
    pub fn load_entries(&self) -> Result<Entries> {
        let path = self.root.join("entries").join("entries.txt");
        if !path.exists() {
            log::warn!("No entry list at {:?}, cards will be unnamed", path);
            return Ok(Entries::default());
        }
        Entries::load(path)
    }
}
