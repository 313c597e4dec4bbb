//! Annotation data model.
//!
//! An [`Annotation`] is one user-placed markup object. The shared state
//! (identity, corners, style, selection flag) lives on the struct; everything
//! variant-specific lives in the closed [`AnnotationKind`] enum, so geometry
//! and rendering dispatch with exhaustive `match`es.
//!
//! `Clone` is a deep copy: point lists, text, embedded images, and cached
//! effect bitmaps are all duplicated and the `id` is preserved. Mementos rely
//! on this to never alias live state.

use super::bitmap::Bitmap;
use super::color::{Color, RED};
use super::effect::{EffectKind, EffectRegion};
use super::font::FontDescriptor;
use super::geometry::{
    Bounds, Point, ellipse_contains, point_to_segment_distance, polyline_distance,
};
use super::handle::{Handle, handle_contains};
use crate::editor::Tool;
use serde::{Deserialize, Serialize};

/// Smallest extent (in pixels) a drawn annotation must reach to be kept.
pub const MIN_EXTENT: f64 = 2.0;

/// Stable identity of an annotation, preserved across clones and mementos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(pub u64);

/// Presentation state shared by every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke_color: Color,
    pub stroke_width: f64,
    #[serde(default)]
    pub fill_color: Option<Color>,
    #[serde(default)]
    pub shadow: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: RED,
            stroke_width: 3.0,
            fill_color: None,
            shadow: false,
        }
    }
}

/// Variant-specific annotation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnnotationKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow {
        head_length: f64,
        head_angle: f64,
    },
    Freehand {
        points: Vec<Point>,
    },
    SmartEraser {
        points: Vec<Point>,
    },
    Text {
        text: String,
        font_size: f64,
        font: FontDescriptor,
    },
    SpeechBalloon {
        tail: Point,
        text: String,
        font_size: f64,
        font: FontDescriptor,
    },
    Step {
        number: u32,
        font_size: f64,
    },
    Crop,
    CutOut {
        vertical: bool,
    },
    Effect(EffectRegion),
    Image {
        bitmap: Bitmap,
    },
}

/// Tool defaults used when the factory constructs a new annotation.
#[derive(Debug, Clone)]
pub struct AnnotationDefaults {
    pub style: Style,
    pub font: FontDescriptor,
    pub font_size: f64,
    pub arrow_length: f64,
    pub arrow_angle: f64,
    pub blur_radius: f64,
    pub pixelate_block: f64,
    pub magnify_zoom: f64,
    pub spotlight_opacity: f64,
    pub eraser_width: f64,
}

impl Default for AnnotationDefaults {
    fn default() -> Self {
        Self {
            style: Style::default(),
            font: FontDescriptor::default(),
            font_size: 24.0,
            arrow_length: 20.0,
            arrow_angle: 30.0,
            blur_radius: 8.0,
            pixelate_block: 10.0,
            magnify_zoom: 2.0,
            spotlight_opacity: 0.5,
            eraser_width: 16.0,
        }
    }
}

/// One markup object placed over the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// First corner (or first endpoint / top-left, depending on the variant)
    pub start: Point,
    /// Opposite corner (or second endpoint / bottom-right)
    pub end: Point,
    pub style: Style,
    #[serde(default)]
    pub is_selected: bool,
    pub kind: AnnotationKind,
}

impl Annotation {
    /// Constructs the annotation a tool creates when pressed at `at`.
    ///
    /// Returns `None` for tools that do not draw ([`Tool::Select`], [`Tool::Image`]).
    pub fn for_tool(
        id: AnnotationId,
        tool: Tool,
        at: Point,
        defaults: &AnnotationDefaults,
    ) -> Option<Self> {
        let mut style = defaults.style.clone();
        let kind = match tool {
            Tool::Select | Tool::Image => return None,
            Tool::Rectangle => AnnotationKind::Rectangle,
            Tool::Ellipse => AnnotationKind::Ellipse,
            Tool::Line => AnnotationKind::Line,
            Tool::Arrow => AnnotationKind::Arrow {
                head_length: defaults.arrow_length,
                head_angle: defaults.arrow_angle,
            },
            Tool::Freehand => AnnotationKind::Freehand { points: vec![at] },
            Tool::SmartEraser => {
                style.stroke_width = defaults.eraser_width;
                AnnotationKind::SmartEraser { points: vec![at] }
            }
            Tool::Text => AnnotationKind::Text {
                text: String::new(),
                font_size: defaults.font_size,
                font: defaults.font.clone(),
            },
            Tool::SpeechBalloon => AnnotationKind::SpeechBalloon {
                tail: at,
                text: String::new(),
                font_size: defaults.font_size,
                font: defaults.font.clone(),
            },
            Tool::Step => AnnotationKind::Step {
                number: 1,
                font_size: defaults.font_size,
            },
            Tool::Crop => AnnotationKind::Crop,
            Tool::CutOut => AnnotationKind::CutOut { vertical: true },
            Tool::Blur => AnnotationKind::Effect(EffectRegion::new(
                EffectKind::Blur,
                defaults.blur_radius,
            )),
            Tool::Pixelate => AnnotationKind::Effect(EffectRegion::new(
                EffectKind::Pixelate,
                defaults.pixelate_block,
            )),
            Tool::Magnify => AnnotationKind::Effect(EffectRegion::new(
                EffectKind::Magnify,
                defaults.magnify_zoom,
            )),
            Tool::Highlight => {
                AnnotationKind::Effect(EffectRegion::new(EffectKind::Highlight, 1.0))
            }
            Tool::Spotlight => AnnotationKind::Effect(EffectRegion::new(
                EffectKind::Spotlight,
                defaults.spotlight_opacity,
            )),
        };

        Some(Self {
            id,
            start: at,
            end: at,
            style,
            is_selected: false,
            kind,
        })
    }

    /// Embedded image annotation covering `bitmap`'s size at `at`.
    pub fn image(id: AnnotationId, bitmap: Bitmap, at: Point) -> Self {
        let end = at.offset(bitmap.width() as f64, bitmap.height() as f64);
        Self {
            id,
            start: at,
            end,
            style: Style::default(),
            is_selected: false,
            kind: AnnotationKind::Image { bitmap },
        }
    }

    /// The tool that creates this variant.
    pub fn tool_kind(&self) -> Tool {
        match &self.kind {
            AnnotationKind::Rectangle => Tool::Rectangle,
            AnnotationKind::Ellipse => Tool::Ellipse,
            AnnotationKind::Line => Tool::Line,
            AnnotationKind::Arrow { .. } => Tool::Arrow,
            AnnotationKind::Freehand { .. } => Tool::Freehand,
            AnnotationKind::SmartEraser { .. } => Tool::SmartEraser,
            AnnotationKind::Text { .. } => Tool::Text,
            AnnotationKind::SpeechBalloon { .. } => Tool::SpeechBalloon,
            AnnotationKind::Step { .. } => Tool::Step,
            AnnotationKind::Crop => Tool::Crop,
            AnnotationKind::CutOut { .. } => Tool::CutOut,
            AnnotationKind::Effect(region) => match region.kind {
                EffectKind::Blur => Tool::Blur,
                EffectKind::Pixelate => Tool::Pixelate,
                EffectKind::Magnify => Tool::Magnify,
                EffectKind::Highlight => Tool::Highlight,
                EffectKind::Spotlight => Tool::Spotlight,
            },
            AnnotationKind::Image { .. } => Tool::Image,
        }
    }

    /// Normalized logical bounds.
    ///
    /// Point-sequence variants use the envelope of their points; everything
    /// else uses the `start`/`end` corners. A speech balloon's bounds are its
    /// body only; the tail is handled by hit-testing.
    pub fn bounds(&self) -> Bounds {
        match &self.kind {
            AnnotationKind::Freehand { points } | AnnotationKind::SmartEraser { points } => {
                Bounds::envelope(points).unwrap_or_else(|| Bounds::from_corners(self.start, self.end))
            }
            _ => Bounds::from_corners(self.start, self.end),
        }
    }

    /// Whether `p` selects this annotation, with `tolerance` pixels of slack.
    pub fn hit_test(&self, p: Point, tolerance: f64) -> bool {
        let bounds = self.bounds();
        match &self.kind {
            AnnotationKind::Ellipse => ellipse_contains(&bounds, p, tolerance),
            AnnotationKind::Line | AnnotationKind::Arrow { .. } => {
                point_to_segment_distance(p, self.start, self.end) <= tolerance
            }
            AnnotationKind::Freehand { points } | AnnotationKind::SmartEraser { points } => {
                if !bounds.inflate(tolerance).contains(p) {
                    return false;
                }
                polyline_distance(p, points).is_some_and(|d| d <= tolerance)
            }
            AnnotationKind::CutOut { vertical } => {
                let mid = bounds.center();
                let distance = if *vertical {
                    (p.x - mid.x).abs()
                } else {
                    (p.y - mid.y).abs()
                };
                distance <= tolerance
            }
            AnnotationKind::SpeechBalloon { tail, .. } => {
                bounds.inflate(tolerance).contains(p)
                    || Bounds::from_corners(*tail, *tail)
                        .inflate(tolerance)
                        .contains(p)
            }
            AnnotationKind::Rectangle
            | AnnotationKind::Text { .. }
            | AnnotationKind::Step { .. }
            | AnnotationKind::Crop
            | AnnotationKind::Effect(_)
            | AnnotationKind::Image { .. } => bounds.inflate(tolerance).contains(p),
        }
    }

    /// Moves the annotation (corners, points, tail) by the given delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.start = self.start.offset(dx, dy);
        self.end = self.end.offset(dx, dy);
        match &mut self.kind {
            AnnotationKind::Freehand { points } | AnnotationKind::SmartEraser { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
            AnnotationKind::SpeechBalloon { tail, .. } => *tail = tail.offset(dx, dy),
            _ => {}
        }
    }

    /// Extends an in-progress drawing to `p`.
    pub fn extend_to(&mut self, p: Point) {
        self.end = p;
        if let AnnotationKind::Freehand { points } | AnnotationKind::SmartEraser { points } =
            &mut self.kind
        {
            points.push(p);
        }
        if let AnnotationKind::CutOut { vertical } = &mut self.kind {
            // Dragging across x selects a column band.
            *vertical = (p.x - self.start.x).abs() >= (p.y - self.start.y).abs();
        }
    }

    /// Finalizes a freshly drawn annotation.
    ///
    /// Text-like variants that were merely clicked get a default extent and
    /// are normalized to top-left/bottom-right. Returns `false` when the
    /// result is too small to keep.
    pub fn finish_drawing(&mut self) -> bool {
        let bounds = self.bounds();
        let tiny = bounds.width < MIN_EXTENT && bounds.height < MIN_EXTENT;
        match &mut self.kind {
            AnnotationKind::Freehand { .. }
            | AnnotationKind::SmartEraser { .. }
            | AnnotationKind::Crop
            | AnnotationKind::CutOut { .. } => true,
            AnnotationKind::Line | AnnotationKind::Arrow { .. } => {
                self.start.distance(self.end) >= MIN_EXTENT
            }
            AnnotationKind::Text { font_size, .. } => {
                let size = if tiny {
                    (*font_size * 8.0, *font_size * 1.6)
                } else {
                    (bounds.width, bounds.height)
                };
                self.start = bounds.top_left();
                self.end = self.start.offset(size.0, size.1);
                true
            }
            AnnotationKind::SpeechBalloon {
                tail, font_size, ..
            } => {
                let size = if tiny {
                    (*font_size * 8.0, *font_size * 2.5)
                } else {
                    (bounds.width, bounds.height)
                };
                self.start = bounds.top_left();
                self.end = self.start.offset(size.0, size.1);
                let body = Bounds::from_corners(self.start, self.end);
                if body.contains(*tail) {
                    *tail = Point::new(
                        body.x + body.width * 0.25,
                        body.bottom() + (body.height * 0.6).max(MIN_EXTENT * 10.0),
                    );
                }
                true
            }
            AnnotationKind::Step { font_size, .. } => {
                if tiny {
                    let radius = *font_size * 0.8;
                    self.start = bounds.center().offset(-radius, -radius);
                    self.end = bounds.center().offset(radius, radius);
                }
                true
            }
            AnnotationKind::Rectangle
            | AnnotationKind::Ellipse
            | AnnotationKind::Effect(_)
            | AnnotationKind::Image { .. } => {
                bounds.width >= MIN_EXTENT && bounds.height >= MIN_EXTENT
            }
        }
    }

    /// Freehand strokes keep their traced shape; everything else can be resized.
    pub fn is_resizable(&self) -> bool {
        !matches!(
            self.kind,
            AnnotationKind::Freehand { .. }
                | AnnotationKind::SmartEraser { .. }
                | AnnotationKind::Crop
                | AnnotationKind::CutOut { .. }
        )
    }

    /// Handles offered when this annotation is selected.
    pub fn handles(&self) -> Vec<(Handle, Point)> {
        if !self.is_resizable() {
            return Vec::new();
        }
        match &self.kind {
            AnnotationKind::Line | AnnotationKind::Arrow { .. } => {
                vec![(Handle::Start, self.start), (Handle::End, self.end)]
            }
            _ => {
                let bounds = self.bounds();
                let mut handles: Vec<(Handle, Point)> = Handle::BOX
                    .iter()
                    .filter_map(|h| h.box_position(&bounds).map(|p| (*h, p)))
                    .collect();
                if let AnnotationKind::SpeechBalloon { tail, .. } = &self.kind {
                    handles.push((Handle::Tail, *tail));
                }
                handles
            }
        }
    }

    /// The handle under `p`, if any. Later handles win ties so the tail beats the body.
    pub fn handle_at(&self, p: Point, size: f64) -> Option<Handle> {
        self.handles()
            .into_iter()
            .rev()
            .find(|(_, center)| handle_contains(*center, size, p))
            .map(|(handle, _)| handle)
    }

    /// Applies a handle drag relative to the corners captured when the drag began.
    pub fn resize(&mut self, handle: Handle, initial_start: Point, initial_end: Point, p: Point) {
        match handle {
            Handle::Start => self.start = p,
            Handle::End => self.end = p,
            Handle::Tail => {
                if let AnnotationKind::SpeechBalloon { tail, .. } = &mut self.kind {
                    *tail = p;
                }
            }
            _ => {
                let initial = Bounds::from_corners(initial_start, initial_end);
                let (a, b) = handle.resize_box(&initial, p);
                self.start = a;
                self.end = b;
            }
        }
    }

    pub fn is_effect(&self) -> bool {
        matches!(self.kind, AnnotationKind::Effect(_))
    }

    pub fn effect(&self) -> Option<&EffectRegion> {
        match &self.kind {
            AnnotationKind::Effect(region) => Some(region),
            _ => None,
        }
    }

    /// Regenerates the cached effect bitmap against `source`. No-op for other variants.
    pub fn update_effect(&mut self, source: Option<&Bitmap>) {
        let bounds = self.bounds();
        if let AnnotationKind::Effect(region) = &mut self.kind {
            region.update(&bounds, source);
        }
    }

    /// Changes the effect strength; the cache is left stale until the next update.
    pub fn set_effect_amount(&mut self, amount: f64) -> bool {
        match &mut self.kind {
            AnnotationKind::Effect(region) => {
                region.amount = amount;
                true
            }
            _ => false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            AnnotationKind::Text { text, .. } | AnnotationKind::SpeechBalloon { text, .. } => {
                Some(text)
            }
            _ => None,
        }
    }

    /// Replaces the text of text-bearing variants. Returns `false` for others.
    pub fn set_text(&mut self, value: &str) -> bool {
        match &mut self.kind {
            AnnotationKind::Text { text, .. } | AnnotationKind::SpeechBalloon { text, .. } => {
                *text = value.to_string();
                true
            }
            _ => false,
        }
    }
}
