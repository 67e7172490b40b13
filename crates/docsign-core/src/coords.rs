//! Coordinate mapping between screen pointer positions and the rendered page
//!
//! The viewer reports the on-screen bounding box of the page's content layer;
//! pointer positions are taken relative to that box and normalized by its size,
//! so the result is independent of zoom level and pixel density.

use serde::{Deserialize, Serialize};

use crate::geometry::PagePoint;

/// Absolute pointer position in screen (client) pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen bounding box of the rendered page, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// A pointer position resolved against the rendered page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCoords {
    /// Offset from the page's top-left corner in pixels, unclamped
    pub pdf_x: f64,
    pub pdf_y: f64,
    /// Offset normalized by the page size and clamped to `[0, 1]`
    pub page_x: f64,
    pub page_y: f64,
    /// Whether the raw offset lies on the page (edges included)
    pub within_page: bool,
}

impl PageCoords {
    pub fn page_point(&self) -> PagePoint {
        PagePoint::new(self.page_x, self.page_y)
    }
}

/// Map a pointer position onto the rendered page.
///
/// Returns `None` when the page is not rendered yet or has no area. Positions
/// off the page still map: the clamped page coordinates pin to the nearest
/// edge and `within_page` is false.
pub fn map_pointer(pointer: ScreenPoint, page: Option<&ScreenRect>) -> Option<PageCoords> {
    let page = page?;
    if !page.has_area() {
        return None;
    }

    let pdf_x = pointer.x - page.left;
    let pdf_y = pointer.y - page.top;

    let within_page = (0.0..=page.width).contains(&pdf_x) && (0.0..=page.height).contains(&pdf_y);

    Some(PageCoords {
        pdf_x,
        pdf_y,
        page_x: (pdf_x / page.width).clamp(0.0, 1.0),
        page_y: (pdf_y / page.height).clamp(0.0, 1.0),
        within_page,
    })
}
