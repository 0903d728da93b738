//! Crop rectangles and grid subdivision
//!
//! All rectangles are in pixel coordinates of the buffer they are applied
//! to, with exclusive `bottom`/`right` edges.

use crate::error::CvError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned pixel rectangle, `top..bottom` by `left..right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Rect {
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Rectangle from its top-left corner and size, `None` if an edge
    /// overflows `u32`.
    pub fn from_origin(left: u32, top: u32, width: u32, height: u32) -> Option<Self> {
        Some(Self::new(
            top,
            top.checked_add(height)?,
            left,
            left.checked_add(width)?,
        ))
    }

    /// The whole of a `width` x `height` buffer.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, height, 0, width)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Non-empty and inside a `width` x `height` buffer.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.top < self.bottom
            && self.left < self.right
            && self.bottom <= height
            && self.right <= width
    }

    /// Same rectangle shifted into the coordinate frame of a parent at `origin`.
    pub fn offset(&self, origin: &Rect) -> Option<Rect> {
        Some(Rect::new(
            self.top.checked_add(origin.top)?,
            self.bottom.checked_add(origin.top)?,
            self.left.checked_add(origin.left)?,
            self.right.checked_add(origin.left)?,
        ))
    }

    /// Same rectangle relative to its own top-left corner.
    pub fn at_origin(&self) -> Rect {
        Rect::full(self.width(), self.height())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Stack-count tag location inside a cell, in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRegion {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for TagRegion {
    fn default() -> Self {
        Self {
            top: 31,
            left: 5,
            width: 6,
            height: 9,
        }
    }
}

/// Content rectangle for captures of one exact resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPreset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rect: Rect,
}

/// Preset applied to any capture without an exact match.
///
/// The baseline rectangle is scaled by `scale` around its top-left corner,
/// and the cropped result is resized back to the baseline size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPreset {
    pub name: String,
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl FallbackPreset {
    /// Scaled crop rectangle, `None` if it overflows `u32`.
    pub fn rect(&self) -> Option<Rect> {
        Rect::from_origin(
            self.left,
            self.top,
            self.width.checked_mul(self.scale)?,
            self.height.checked_mul(self.scale)?,
        )
    }
}

/// Known capture resolutions and where the book content sits in each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTable {
    pub presets: Vec<LayoutPreset>,
    pub fallback: Option<FallbackPreset>,
}

impl LayoutTable {
    /// Content width and height every preset produces.
    pub const CONTENT_WIDTH: u32 = 165;
    pub const CONTENT_HEIGHT: u32 = 225;

    pub fn find(&self, width: u32, height: u32) -> Option<&LayoutPreset> {
        self.presets
            .iter()
            .find(|preset| preset.width == width && preset.height == height)
    }

    /// `(width, height)` of the content crop, taken from the first preset
    /// or else from the fallback baseline.
    pub fn content_size(&self) -> Option<(u32, u32)> {
        self.presets
            .first()
            .map(|preset| (preset.rect.width(), preset.rect.height()))
            .or_else(|| self.fallback.as_ref().map(|fallback| (fallback.width, fallback.height)))
    }
}

impl Default for LayoutTable {
    fn default() -> Self {
        let windowed = Rect::new(
            152,
            152 + Self::CONTENT_HEIGHT,
            295,
            295 + Self::CONTENT_WIDTH,
        );
        let preset = |name: &str, width: u32, height: u32| LayoutPreset {
            name: name.to_string(),
            width,
            height,
            rect: windowed,
        };

        Self {
            presets: vec![
                preset("windowed-800x600", 800, 600),
                preset("windowed-1024x768", 1024, 768),
                preset("windowed-1366x768", 1366, 768),
            ],
            fallback: Some(FallbackPreset {
                name: "high-dpi".to_string(),
                top: 412,
                left: 862,
                width: Self::CONTENT_WIDTH,
                height: Self::CONTENT_HEIGHT,
                scale: 2,
            }),
        }
    }
}

/// Resolved content crop for one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCrop {
    pub preset: String,
    pub rect: Rect,
    /// Target `(width, height)` when the crop must be downscaled.
    pub resize_to: Option<(u32, u32)>,
}

/// Select the content crop for a capture of the given size.
///
/// Exact resolution matches win. Otherwise the table's fallback preset is
/// used, unless `allow_fallback` is off or the table has none.
pub fn content_crop(
    capture_width: u32,
    capture_height: u32,
    table: &LayoutTable,
    allow_fallback: bool,
) -> Result<ContentCrop, CvError> {
    if let Some(preset) = table.find(capture_width, capture_height) {
        log::debug!("Using layout preset `{}`", preset.name);
        return Ok(ContentCrop {
            preset: preset.name.clone(),
            rect: preset.rect,
            resize_to: None,
        });
    }

    match &table.fallback {
        Some(fallback) if allow_fallback => {
            log::warn!(
                "No layout preset for {}x{}, falling back to `{}`",
                capture_width,
                capture_height,
                fallback.name
            );
            let rect = fallback.rect().ok_or(CvError::GeometryOverflow {
                what: "fallback preset",
            })?;
            Ok(ContentCrop {
                preset: fallback.name.clone(),
                rect,
                resize_to: (fallback.scale != 1).then_some((fallback.width, fallback.height)),
            })
        }
        _ => Err(CvError::UnsupportedResolution {
            width: capture_width,
            height: capture_height,
        }),
    }
}

/// Split `bounds` into `rows * cols` cells in row-major order.
///
/// Cell edges are `floor(i * extent / n)`, so adjacent cells share an edge
/// and the cells tile `bounds` exactly. Every cell must be at least one
/// pixel wide and high.
pub fn grid_cells(bounds: Rect, rows: u32, cols: u32) -> Result<Vec<Rect>, CvError> {
    if rows == 0 || cols == 0 || rows > bounds.height() || cols > bounds.width() {
        return Err(CvError::InvalidGrid {
            rows,
            cols,
            width: bounds.width(),
            height: bounds.height(),
        });
    }

    let height = bounds.height() as u64;
    let width = bounds.width() as u64;
    let row_edge = |i: u32| bounds.top + (i as u64 * height / rows as u64) as u32;
    let col_edge = |j: u32| bounds.left + (j as u64 * width / cols as u64) as u32;

    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for i in 0..rows {
        for j in 0..cols {
            cells.push(Rect::new(row_edge(i), row_edge(i + 1), col_edge(j), col_edge(j + 1)));
        }
    }
    Ok(cells)
}

/// Absolute tag rectangle for a cell.
pub fn tag_region(cell_bounds: Rect, region: &TagRegion) -> Result<Rect, CvError> {
    Rect::from_origin(region.left, region.top, region.width, region.height)
        .and_then(|rect| rect.offset(&cell_bounds))
        .ok_or(CvError::GeometryOverflow { what: "tag region" })
}
