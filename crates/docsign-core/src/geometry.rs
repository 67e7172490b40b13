//! Normalized page geometry and the containment clamper
//!
//! All values are fractions of the rendered page's width or height with the
//! origin at the page's top-left corner. Every placement mutation goes through
//! [`clamp`], so a placement is always fully on its page and never smaller than
//! the minimum size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: f64 = 0.05;
pub const MIN_HEIGHT: f64 = 0.03;
pub const MAX_WIDTH: f64 = 0.5;
pub const MAX_HEIGHT: f64 = 0.3;

/// Tolerance used when checking invariants on computed floats
pub const EPSILON: f64 = 1e-9;

/// A point in page-relative space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in page-relative space, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn position(&self) -> PagePoint {
        PagePoint::new(self.x, self.y)
    }

    pub fn contains(&self, point: PagePoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether the containment and size invariants hold
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= 1.0 + EPSILON
            && self.bottom() <= 1.0 + EPSILON
            && self.width >= MIN_WIDTH - EPSILON
            && self.height >= MIN_HEIGHT - EPSILON
            && self.width <= MAX_WIDTH + EPSILON
            && self.height <= MAX_HEIGHT + EPSILON
    }

    /// Position of one of the four corners
    pub fn corner(&self, handle: ResizeHandle) -> PagePoint {
        match handle {
            ResizeHandle::NorthWest => PagePoint::new(self.x, self.y),
            ResizeHandle::NorthEast => PagePoint::new(self.right(), self.y),
            ResizeHandle::SouthWest => PagePoint::new(self.x, self.bottom()),
            ResizeHandle::SouthEast => PagePoint::new(self.right(), self.bottom()),
        }
    }
}

/// Enforce containment and size limits on an arbitrary rectangle.
///
/// Size is floored at the minimum and capped at the maximum or the space left
/// from the position, whichever is smaller. A negative position is moved to
/// the page edge at the expense of size, and overflow past the far edge is cut.
/// If trimming would leave less than the minimum size, the rectangle keeps the
/// minimum size and its position moves back inside instead.
pub fn clamp(rect: NormRect) -> NormRect {
    let (x, width) = clamp_axis(rect.x, rect.width, MIN_WIDTH, MAX_WIDTH);
    let (y, height) = clamp_axis(rect.y, rect.height, MIN_HEIGHT, MAX_HEIGHT);
    NormRect::new(x, y, width, height)
}

fn clamp_axis(pos: f64, len: f64, min: f64, max: f64) -> (f64, f64) {
    // Non-finite input collapses to the origin and the minimum size
    let mut pos = if pos.is_finite() { pos } else { 0.0 };
    let mut len = if len.is_finite() { len } else { min };

    // The remaining-space cap is applied by the overflow cut below
    len = len.max(min).min(max);

    if pos < 0.0 {
        len += pos;
        pos = 0.0;
    }
    if pos + len > 1.0 {
        len = 1.0 - pos;
    }

    if len < min {
        len = min;
        pos = pos.min(1.0 - min);
    }
    (pos, len)
}

/// Move a rectangle to `(x, y)` keeping its size, pinned inside the page
pub fn shift_inside(rect: NormRect, x: f64, y: f64) -> NormRect {
    let width = bounded(rect.width, MIN_WIDTH, MAX_WIDTH);
    let height = bounded(rect.height, MIN_HEIGHT, MAX_HEIGHT);
    let x = bounded(x, 0.0, 1.0 - width);
    let y = bounded(y, 0.0, 1.0 - height);
    clamp(NormRect::new(x, y, width, height))
}

fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_finite() {
        value.max(lo).min(hi)
    } else {
        lo
    }
}

/// One of the four corner handles of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
    ];

    /// Whether dragging this handle moves the left edge
    pub fn moves_left_edge(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::SouthWest)
    }

    /// Whether dragging this handle moves the top edge
    pub fn moves_top_edge(self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::NorthEast)
    }

    /// The corner that stays fixed while this handle is dragged
    pub fn opposite(self) -> ResizeHandle {
        match self {
            ResizeHandle::NorthEast => ResizeHandle::SouthWest,
            ResizeHandle::NorthWest => ResizeHandle::SouthEast,
            ResizeHandle::SouthEast => ResizeHandle::NorthWest,
            ResizeHandle::SouthWest => ResizeHandle::NorthEast,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::SouthWest => "sw",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ne" | "north-east" | "northeast" => Ok(ResizeHandle::NorthEast),
            "nw" | "north-west" | "northwest" => Ok(ResizeHandle::NorthWest),
            "se" | "south-east" | "southeast" => Ok(ResizeHandle::SouthEast),
            "sw" | "south-west" | "southwest" => Ok(ResizeHandle::SouthWest),
            other => Err(format!("unknown resize handle: {}", other)),
        }
    }
}

/// Percentage box for absolutely positioned overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<NormRect> for OverlayBox {
    fn from(rect: NormRect) -> Self {
        Self {
            left: rect.x * 100.0,
            top: rect.y * 100.0,
            width: rect.width * 100.0,
            height: rect.height * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clamp_keeps_valid_rect() {
        let rect = NormRect::new(0.2, 0.3, 0.15, 0.08);
        assert_eq!(clamp(rect), rect);
    }

    #[test]
    fn test_clamp_floors_minimum_size() {
        let rect = clamp(NormRect::new(0.2, 0.2, 0.01, 0.0));
        assert_eq!(rect.width, MIN_WIDTH);
        assert_eq!(rect.height, MIN_HEIGHT);
    }

    #[test]
    fn test_clamp_caps_maximum_size() {
        let rect = clamp(NormRect::new(0.1, 0.1, 0.9, 0.9));
        assert_eq!(rect.width, MAX_WIDTH);
        assert_eq!(rect.height, MAX_HEIGHT);
    }

    #[test]
    fn test_clamp_caps_to_remaining_space() {
        let rect = clamp(NormRect::new(0.8, 0.9, 0.4, 0.2));
        assert!(approx(rect.width, 0.2));
        assert!(approx(rect.height, 0.1));
        assert!(rect.is_valid());
    }

    #[test]
    fn test_clamp_negative_position_trims_size() {
        let rect = clamp(NormRect::new(-0.1, -0.05, 0.3, 0.2));
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert!(approx(rect.width, 0.2));
        assert!(approx(rect.height, 0.15));
    }

    #[test]
    fn test_clamp_never_trims_below_minimum() {
        let rect = clamp(NormRect::new(-0.04, 0.99, 0.05, 0.03));
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, MIN_WIDTH);
        assert_eq!(rect.height, MIN_HEIGHT);
        assert!(approx(rect.y, 1.0 - MIN_HEIGHT));
        assert!(rect.is_valid());
    }

    #[test]
    fn test_clamp_non_finite_input() {
        let rect = clamp(NormRect::new(f64::NAN, f64::INFINITY, f64::NAN, 0.1));
        assert!(rect.is_valid());
    }

    #[test]
    fn test_shift_inside_preserves_size() {
        let rect = NormRect::new(0.5, 0.5, 0.2, 0.1);
        let moved = shift_inside(rect, 0.95, -0.3);
        assert!(approx(moved.x, 0.8));
        assert_eq!(moved.y, 0.0);
        assert_eq!(moved.width, 0.2);
        assert_eq!(moved.height, 0.1);
    }

    #[test]
    fn test_corners() {
        let rect = NormRect::new(0.1, 0.2, 0.3, 0.1);
        assert_eq!(rect.corner(ResizeHandle::NorthWest), PagePoint::new(0.1, 0.2));
        let se = rect.corner(ResizeHandle::SouthEast);
        assert!(approx(se.x, 0.4) && approx(se.y, 0.3));
    }

    #[test]
    fn test_handle_parsing() {
        assert_eq!("se".parse::<ResizeHandle>().unwrap(), ResizeHandle::SouthEast);
        assert_eq!(
            "North-West".parse::<ResizeHandle>().unwrap(),
            ResizeHandle::NorthWest
        );
        assert!("middle".parse::<ResizeHandle>().is_err());
        assert_eq!(ResizeHandle::NorthEast.opposite(), ResizeHandle::SouthWest);
    }

    #[test]
    fn test_overlay_box_percentages() {
        let overlay = OverlayBox::from(NormRect::new(0.25, 0.5, 0.15, 0.08));
        assert_eq!(overlay.left, 25.0);
        assert_eq!(overlay.top, 50.0);
        assert!(approx(overlay.width, 15.0));
        assert!(approx(overlay.height, 8.0));
    }
}
