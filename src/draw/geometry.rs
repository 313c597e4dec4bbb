//! Floating-point geometry and hit-test primitives.
//!
//! Everything here is pure: no allocation beyond return values and no state.
//! Annotation coordinates live in canvas pixel space as `f64` so that pointer
//! input from hosts with fractional scaling keeps full precision; pixel work
//! converts to [`Rect`] via [`Bounds::to_pixel_rect`].

use crate::util::Rect;
use serde::{Deserialize, Serialize};

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by the given delta.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Normalized axis-aligned rectangle (`width`/`height` never negative).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Builds normalized bounds from two opposing corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self {
            x: min_x,
            y: min_y,
            width: a.x.max(b.x) - min_x,
            height: a.y.max(b.y) - min_y,
        }
    }

    /// Min/max envelope of a point sequence. Empty input yields `None`.
    pub fn envelope(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let (mut min, mut max) = (first, first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::from_corners(min, max))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Grows the bounds by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Rounds the edges to whole pixels. Returns `None` when the rounded area is empty.
    pub fn to_pixel_rect(&self) -> Option<Rect> {
        Rect::from_min_max(
            self.x.round() as i32,
            self.y.round() as i32,
            self.right().round() as i32,
            self.bottom().round() as i32,
        )
    }
}

/// Distance from `p` to the segment `a`-`b`, clamping the projection to the segment.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Ellipse containment for the ellipse inscribed in `bounds`, radii widened by `tolerance`.
pub fn ellipse_contains(bounds: &Bounds, p: Point, tolerance: f64) -> bool {
    let rx = bounds.width / 2.0 + tolerance;
    let ry = bounds.height / 2.0 + tolerance;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = bounds.center();
    let nx = (p.x - c.x) / rx;
    let ny = (p.y - c.y) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Minimum distance from `p` to a polyline. A single point counts as a degenerate segment.
pub fn polyline_distance(p: Point, points: &[Point]) -> Option<f64> {
    match points {
        [] => None,
        [only] => Some(p.distance(*only)),
        _ => points
            .windows(2)
            .map(|pair| point_to_segment_distance(p, pair[0], pair[1]))
            .reduce(f64::min),
    }
}
