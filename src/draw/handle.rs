//! Resize handles and the edge arithmetic behind them.

use super::geometry::{Bounds, Point};

/// A draggable control point on a selected annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// First endpoint of a line or arrow
    Start,
    /// Second endpoint of a line or arrow
    End,
    /// Speech balloon tail tip
    Tail,
}

impl Handle {
    /// The eight box handles in clockwise order from the top-left corner.
    pub const BOX: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    /// Position of a box handle on `bounds`. Endpoint handles have no box position.
    pub fn box_position(self, bounds: &Bounds) -> Option<Point> {
        let c = bounds.center();
        let (l, t, r, b) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
        let p = match self {
            Handle::TopLeft => Point::new(l, t),
            Handle::Top => Point::new(c.x, t),
            Handle::TopRight => Point::new(r, t),
            Handle::Right => Point::new(r, c.y),
            Handle::BottomRight => Point::new(r, b),
            Handle::Bottom => Point::new(c.x, b),
            Handle::BottomLeft => Point::new(l, b),
            Handle::Left => Point::new(l, c.y),
            Handle::Start | Handle::End | Handle::Tail => return None,
        };
        Some(p)
    }

    /// Moves the edges this handle controls to `pointer`, keeping the others from `initial`.
    ///
    /// Corner handles move two edges, edge handles move one. The result is
    /// returned as (top-left, bottom-right) and may be inverted if the pointer
    /// crossed the opposite edge; callers normalize through [`Bounds`].
    pub fn resize_box(self, initial: &Bounds, pointer: Point) -> (Point, Point) {
        let (mut l, mut t, mut r, mut b) =
            (initial.x, initial.y, initial.right(), initial.bottom());
        match self {
            Handle::TopLeft => {
                l = pointer.x;
                t = pointer.y;
            }
            Handle::Top => t = pointer.y,
            Handle::TopRight => {
                r = pointer.x;
                t = pointer.y;
            }
            Handle::Right => r = pointer.x,
            Handle::BottomRight => {
                r = pointer.x;
                b = pointer.y;
            }
            Handle::Bottom => b = pointer.y,
            Handle::BottomLeft => {
                l = pointer.x;
                b = pointer.y;
            }
            Handle::Left => l = pointer.x,
            Handle::Start | Handle::End | Handle::Tail => {}
        }
        (Point::new(l, t), Point::new(r, b))
    }
}

/// Square hit area of a handle centered on `center`.
pub fn handle_contains(center: Point, size: f64, p: Point) -> bool {
    let half = size / 2.0;
    (p.x - center.x).abs() <= half && (p.y - center.y).abs() <= half
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds {
        Bounds::from_corners(Point::new(10.0, 10.0), Point::new(50.0, 30.0))
    }

    #[test]
    fn corner_moves_two_edges() {
        let (tl, br) = Handle::BottomRight.resize_box(&unit_box(), Point::new(70.0, 45.0));
        assert_eq!(tl, Point::new(10.0, 10.0));
        assert_eq!(br, Point::new(70.0, 45.0));
    }

    #[test]
    fn edge_moves_one_edge() {
        let (tl, br) = Handle::Left.resize_box(&unit_box(), Point::new(0.0, 99.0));
        assert_eq!(tl, Point::new(0.0, 10.0));
        assert_eq!(br, Point::new(50.0, 30.0));
    }

    #[test]
    fn crossing_the_opposite_edge_normalizes() {
        let (a, b) = Handle::Right.resize_box(&unit_box(), Point::new(0.0, 0.0));
        let flipped = Bounds::from_corners(a, b);
        assert_eq!(flipped.x, 0.0);
        assert_eq!(flipped.width, 10.0);
    }

    #[test]
    fn box_positions_cover_midpoints() {
        let b = unit_box();
        assert_eq!(Handle::Top.box_position(&b), Some(Point::new(30.0, 10.0)));
        assert_eq!(Handle::Left.box_position(&b), Some(Point::new(10.0, 20.0)));
        assert_eq!(Handle::Tail.box_position(&b), None);
    }

    #[test]
    fn handle_hit_area_is_square() {
        let c = Point::new(10.0, 10.0);
        assert!(handle_contains(c, 8.0, Point::new(14.0, 6.0)));
        assert!(!handle_contains(c, 8.0, Point::new(14.5, 10.0)));
    }
}
