//! Utility functions for colors, pixel rectangles, and arrowhead calculations.
//!
//! This module provides:
//! - Name-to-color mapping used by the configuration layer
//! - Arrowhead geometry calculations
//! - Integer pixel rectangles used for bitmap work and dirty tracking

use crate::draw::{Color, color::*};
use crate::draw::geometry::Point;

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates arrowhead points with custom length and angle.
///
/// Creates a V-shaped arrowhead at `tip` pointing in the direction from
/// `tail` to `tip`. The arrowhead length is automatically capped at 30% of
/// the line length to prevent weird-looking arrows on short lines.
///
/// # Returns
/// Array of two points `[left, right]` for the arrowhead lines.
/// If the line is too short (< 1 pixel), both points equal `tip`.
pub fn calculate_arrowhead_custom(
    tip: Point,
    tail: Point,
    length: f64,
    angle_degrees: f64,
) -> [Point; 2] {
    let dx = tip.x - tail.x;
    let dy = tip.y - tail.y;
    let line_length = (dx * dx + dy * dy).sqrt();

    if line_length < 1.0 {
        return [tip, tip];
    }

    // Normalize direction vector (pointing from tail to tip)
    let ux = dx / line_length;
    let uy = dy / line_length;

    let arrow_length = length.min(line_length * 0.3);

    let angle = angle_degrees.to_radians();
    let cos_a = angle.cos();
    let sin_a = angle.sin();

    let left = Point::new(
        tip.x - arrow_length * (ux * cos_a - uy * sin_a),
        tip.y - arrow_length * (uy * cos_a + ux * sin_a),
    );
    let right = Point::new(
        tip.x - arrow_length * (ux * cos_a + uy * sin_a),
        tip.y - arrow_length * (uy * cos_a - ux * sin_a),
    );

    [left, right]
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Named colors accepted in config files and reported in status text.
const NAMED_COLORS: [(&str, Color); 8] = [
    ("Red", RED),
    ("Green", GREEN),
    ("Blue", BLUE),
    ("Yellow", YELLOW),
    ("Orange", ORANGE),
    ("Pink", PINK),
    ("White", WHITE),
    ("Black", BLACK),
];

/// Looks up a palette color by name, ignoring case.
pub fn name_to_color(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
}

/// Name of the palette color within 0.1 per channel of `color`, else "Custom".
pub fn color_to_name(color: &Color) -> &'static str {
    NAMED_COLORS
        .iter()
        .find(|(_, known)| {
            (known.r - color.r).abs() < 0.1
                && (known.g - color.g).abs() < 0.1
                && (known.b - color.b).abs() < 0.1
        })
        .map_or("Custom", |(name, _)| *name)
}

// ============================================================================
// Pixel Rectangles
// ============================================================================

/// Axis-aligned integer rectangle used for bitmap regions and dirty tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x - min_x;
        let height = max_y - min_y;
        Self::new(min_x, min_y, width, height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns the overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        Rect::from_min_max(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
