//! Nearest-neighbour matching against a template gallery

use super::Gallery;
use crate::buffer::PixelBuffer;
use crate::distance::mse;
use crate::error::CvError;
use crate::preprocess::Preprocessing;
use crate::traits::{Classify, Preprocess};
use serde::Serialize;

/// Index of the smallest distance, first occurrence on ties.
fn first_minimum(distances: &[u64]) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    for (index, &distance) in distances.iter().enumerate() {
        match best {
            Some((_, current)) if distance >= current => {}
            _ => best = Some((index, distance)),
        }
    }
    best
}

/// Index of the gallery member closest to `probe` after preprocessing both.
///
/// Ties go to the lowest index.
pub fn nearest_match<P>(probe: &PixelBuffer, gallery: &Gallery, preprocess: &P) -> Result<usize, CvError>
where
    P: Preprocess + ?Sized,
{
    let probe = preprocess.preprocess(probe);
    let distances = gallery
        .images()
        .map(|candidate| mse(&probe, &preprocess.preprocess(candidate)))
        .collect::<Result<Vec<_>, _>>()?;

    first_minimum(&distances)
        .map(|(index, _)| index)
        .ok_or_else(|| CvError::EmptyGallery {
            gallery: gallery.name().to_string(),
        })
}

/// Result of matching one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub index: usize,
    pub distance: u64,
    pub distances: Vec<u64>,
}

/// Matcher holding a gallery already run through its preprocessing.
pub struct TemplateMatcher {
    gallery_name: String,
    preprocessing: Preprocessing,
    prepared: Vec<PixelBuffer>,
}

impl TemplateMatcher {
    /// Create new template matcher
    pub fn new(gallery: &Gallery, preprocessing: Preprocessing) -> Self {
        let prepared = gallery
            .images()
            .map(|image| preprocessing.preprocess(image))
            .collect();

        Self {
            gallery_name: gallery.name().to_string(),
            preprocessing,
            prepared,
        }
    }

    pub fn gallery_name(&self) -> &str {
        &self.gallery_name
    }

    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }

    /// Distance from `probe` to every gallery member, in gallery order.
    pub fn distances(&self, probe: &PixelBuffer) -> Result<Vec<u64>, CvError> {
        let probe = self.preprocessing.preprocess(probe);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.prepared
                .par_iter()
                .map(|candidate| mse(&probe, candidate))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.prepared
                .iter()
                .map(|candidate| mse(&probe, candidate))
                .collect()
        }
    }

    /// Best match with the full distance list.
    pub fn match_template(&self, probe: &PixelBuffer) -> Result<MatchOutcome, CvError> {
        let distances = self.distances(probe)?;
        let (index, distance) = first_minimum(&distances).ok_or_else(|| CvError::EmptyGallery {
            gallery: self.gallery_name.clone(),
        })?;

        log::debug!(
            "Matched `{}` template {} at distance {}",
            self.gallery_name,
            index,
            distance
        );

        Ok(MatchOutcome {
            index,
            distance,
            distances,
        })
    }
}

impl Classify for TemplateMatcher {
    fn classify(&self, probe: &PixelBuffer) -> Result<usize, CvError> {
        self.match_template(probe).map(|outcome| outcome.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::filled;
    use crate::preprocess::{sobel_edges, to_grayscale};
    use image::Rgba;

    fn glyph(k: u32) -> PixelBuffer {
        PixelBuffer::from_fn(6, 9, |x, y| {
            if (x * 9 + y) % 5 == k {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    fn glyphs() -> Gallery {
        Gallery::from_images("tags", (0..5).map(glyph).collect()).unwrap()
    }

    #[test]
    fn test_first_minimum_prefers_lowest_index() {
        assert_eq!(first_minimum(&[5, 3, 3, 4]), Some((1, 3)));
        assert_eq!(first_minimum(&[]), None);
    }

    #[test]
    fn test_tie_break_on_identical_templates() -> Result<(), CvError> {
        let image = filled(4, 4, [40, 40, 40, 255]);
        let gallery = Gallery::from_images("twins", vec![image.clone(), image.clone()])?;
        assert_eq!(nearest_match(&image, &gallery, &Preprocessing::Identity)?, 0);

        let matcher = TemplateMatcher::new(&gallery, Preprocessing::Identity);
        let outcome = matcher.match_template(&filled(4, 4, [0, 0, 0, 255]))?;
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.distances[0], outcome.distances[1]);
        Ok(())
    }

    #[test]
    fn test_identity_match_finds_glyph() -> Result<(), CvError> {
        let gallery = glyphs();
        for k in 0..5 {
            assert_eq!(nearest_match(&glyph(k), &gallery, &Preprocessing::Identity)?, k as usize);
        }
        Ok(())
    }

    #[test]
    fn test_closure_preprocessing() -> Result<(), CvError> {
        let gallery = glyphs();
        let edges = |buffer: &PixelBuffer| sobel_edges(&to_grayscale(buffer.clone()));
        let index = nearest_match(&glyph(3), &gallery, &edges)?;
        assert_eq!(index, 3);
        Ok(())
    }

    #[test]
    fn test_matcher_agrees_with_free_function() -> Result<(), CvError> {
        let gallery = glyphs();
        let matcher = TemplateMatcher::new(&gallery, Preprocessing::Edges);
        for k in 0..5 {
            let probe = glyph(k);
            assert_eq!(
                matcher.classify(&probe)?,
                nearest_match(&probe, &gallery, &Preprocessing::Edges)?
            );
        }
        Ok(())
    }

    #[test]
    fn test_size_mismatch_propagates() -> Result<(), CvError> {
        let gallery = glyphs();
        let probe = filled(5, 5, [0; 4]);
        assert!(matches!(
            nearest_match(&probe, &gallery, &Preprocessing::Identity),
            Err(CvError::SizeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<(), CvError> {
        let gallery = glyphs();
        let matcher = TemplateMatcher::new(&gallery, Preprocessing::Edges);
        let probe = glyph(2);
        let first = matcher.match_template(&probe)?;
        for _ in 0..5 {
            assert_eq!(matcher.match_template(&probe)?, first);
        }
        Ok(())
    }
}
