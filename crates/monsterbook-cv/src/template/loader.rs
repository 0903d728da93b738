//! Template loading utilities

use super::{Gallery, Template};
use crate::utils::image::ImageUtils;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads reference images from one or more directories.
pub struct TemplateLoader {
    template_dirs: Vec<PathBuf>,
    supported_extensions: Vec<String>,
    resize_to: Option<(u32, u32)>,
}

impl TemplateLoader {
    /// Create new template loader
    pub fn new() -> Self {
        Self {
            template_dirs: Vec::new(),
            supported_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
            ],
            resize_to: None,
        }
    }

    /// Add template directory
    pub fn add_template_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.template_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Resize every loaded image to `width` x `height`.
    pub fn resize_to(mut self, width: u32, height: u32) -> Self {
        self.resize_to = Some((width, height));
        self
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.supported_extensions.contains(&ext))
    }

    fn load_image(&self, path: &Path) -> Result<crate::PixelBuffer> {
        let image = ImageUtils::load_rgba(path)
            .with_context(|| format!("Failed to load template: {:?}", path))?;
        Ok(match self.resize_to {
            Some((width, height)) => crate::buffer::resize(&image, width, height),
            None => image,
        })
    }

    /// Load template by file stem, ignoring case.
    pub fn load_template(&self, name: &str) -> Result<Option<Template>> {
        for dir in &self.template_dirs {
            if !dir.exists() {
                continue;
            }
            for path in self.template_paths(dir)? {
                let matches = path
                    .file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(name));
                if matches {
                    let image = self.load_image(&path)?;
                    return Ok(Some(Template::new(name.to_string(), image)));
                }
            }
        }

        Ok(None)
    }

    /// Supported files in `dir`, sorted by file name.
    fn template_paths(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && self.is_supported(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Load all templates, directory by directory, each sorted by file name.
    pub fn load_all_templates(&self) -> Result<Vec<Template>> {
        let mut templates = Vec::new();

        for dir in &self.template_dirs {
            if !dir.exists() {
                log::warn!("Template directory {:?} does not exist", dir);
                continue;
            }

            for path in self.template_paths(dir)? {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                let image = self.load_image(&path)?;
                templates.push(Template::new(name, image));
            }
        }

        Ok(templates)
    }

    /// Load all templates as an ordered gallery. Fails if nothing was found.
    pub fn load_gallery(&self, name: &str) -> Result<Gallery> {
        let templates = self.load_all_templates()?;
        let gallery = Gallery::new(name, templates)
            .with_context(|| format!("No templates found in {:?}", self.template_dirs))?;
        log::info!("Loaded {} `{}` templates", gallery.len(), name);
        Ok(gallery)
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}
