//! Dirty region tracking for incremental rendering.
//!
//! Collects axis-aligned rectangles the host needs to repaint between frames.

use super::annotation::{Annotation, AnnotationKind};
use super::effect::EffectKind;
use super::render::SHADOW_OFFSET;
use crate::util::Rect;

/// Tracks dirty rectangles accumulated between renders.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        self.regions.push(rect);
    }

    /// Adds the painted area of an annotation.
    ///
    /// Annotations that paint outside their own bounds (spotlights, cut-out
    /// bands, balloon tails) damage the full surface.
    pub fn mark_annotation(&mut self, annotation: &Annotation) {
        let paints_outside = match &annotation.kind {
            AnnotationKind::CutOut { .. } | AnnotationKind::SpeechBalloon { .. } => true,
            AnnotationKind::Effect(region) => region.kind == EffectKind::Spotlight,
            _ => false,
        };
        if paints_outside {
            self.mark_full();
            return;
        }

        // Stroke overhang, selection chrome, and shadow.
        let margin = annotation.style.stroke_width / 2.0 + SHADOW_OFFSET + 8.0;
        match annotation.bounds().inflate(margin).to_pixel_rect() {
            Some(rect) => self.mark_rect(rect),
            None => self.mark_full(),
        }
    }

    /// Drains the dirty regions gathered so far.
    ///
    /// When the full surface is marked, returns a single rectangle covering the
    /// entire surface; otherwise returns accumulated rectangles.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            Rect::new(0, 0, width, height).into_iter().collect()
        } else {
            self.regions.drain(..).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::annotation::{AnnotationDefaults, AnnotationId};
    use crate::draw::geometry::Point;
    use crate::editor::Tool;

    fn drawn(tool: Tool, from: Point, to: Point) -> Annotation {
        let mut a = Annotation::for_tool(AnnotationId(1), tool, from, &AnnotationDefaults::default())
            .unwrap();
        a.extend_to(to);
        a
    }

    #[test]
    fn mark_rect_skips_empty_rects() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect {
            x: 4,
            y: 4,
            width: 0,
            height: 10,
        });
        assert!(tracker.take_regions(100, 100).is_empty());
    }

    #[test]
    fn mark_annotation_records_padded_bounds() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_annotation(&drawn(
            Tool::Line,
            Point::new(20.0, 20.0),
            Point::new(30.0, 30.0),
        ));

        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects.len(), 1);
        assert!(rects[0].x < 20 && rects[0].right() > 30);
        assert!(tracker.take_regions(100, 100).is_empty());
    }

    #[test]
    fn spotlight_damages_everything() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_annotation(&drawn(
            Tool::Spotlight,
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
        ));
        assert_eq!(
            tracker.take_regions(64, 48),
            vec![Rect::new(0, 0, 64, 48).unwrap()]
        );
    }

    #[test]
    fn mark_full_takes_precedence() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(5, 5, 10, 10).unwrap());
        tracker.mark_full();
        tracker.mark_rect(Rect::new(20, 20, 15, 15).unwrap());

        let rects = tracker.take_regions(200, 100);
        assert_eq!(rects, vec![Rect::new(0, 0, 200, 100).unwrap()]);
    }
}
