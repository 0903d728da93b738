//! Reference templates and galleries

pub mod loader;
pub mod matcher;

pub use loader::TemplateLoader;
pub use matcher::{nearest_match, MatchOutcome, TemplateMatcher};

use crate::buffer::PixelBuffer;
use crate::error::CvError;

/// A labelled reference image
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub image: PixelBuffer,
}

impl Template {
    pub fn new(name: String, image: PixelBuffer) -> Self {
        Self { name, image }
    }
}

/// Ordered, non-empty set of labelled reference images.
///
/// A gallery's position order is meaningful: classifiers return indices
/// into it.
#[derive(Debug, Clone)]
pub struct Gallery {
    name: String,
    templates: Vec<Template>,
}

impl Gallery {
    pub fn new(name: impl Into<String>, templates: Vec<Template>) -> Result<Self, CvError> {
        let name = name.into();
        if templates.is_empty() {
            return Err(CvError::EmptyGallery { gallery: name });
        }
        Ok(Self { name, templates })
    }

    /// Gallery from bare images, labelled by position.
    pub fn from_images(name: impl Into<String>, images: Vec<PixelBuffer>) -> Result<Self, CvError> {
        let templates = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| Template::new(format!("{:02}", i), image))
            .collect();
        Self::new(name, templates)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn images(&self) -> impl Iterator<Item = &PixelBuffer> {
        self.templates.iter().map(|template| &template.image)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::filled;

    #[test]
    fn test_empty_gallery_rejected() {
        let err = Gallery::new("pages", Vec::new()).unwrap_err();
        assert_eq!(
            err,
            CvError::EmptyGallery {
                gallery: "pages".to_string()
            }
        );
    }

    #[test]
    fn test_from_images_labels_by_position() -> Result<(), CvError> {
        let gallery = Gallery::from_images(
            "tags",
            vec![filled(4, 4, [1, 1, 1, 255]), filled(4, 4, [2, 2, 2, 255])],
        )?;
        assert_eq!(gallery.len(), 2);
        assert!(!gallery.is_empty());
        assert_eq!(gallery.get(1).map(|t| t.name.as_str()), Some("01"));
        assert_eq!(gallery.get(1).map(|t| t.image.get_pixel(0, 0)[0]), Some(2));
        assert!(gallery.get(2).is_none());
        Ok(())
    }
}
