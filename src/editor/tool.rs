//! Annotation tool selection.

use serde::{Deserialize, Serialize};

/// Active editing tool.
///
/// Every tool except [`Tool::Select`] and [`Tool::Image`] creates a new
/// annotation when the user drags on the canvas. Images are inserted by the
/// host (paste, drop) rather than drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Pick, move, and resize existing annotations
    #[default]
    Select,
    /// Rectangle outline from corner to corner
    Rectangle,
    /// Ellipse inscribed in the dragged box
    Ellipse,
    /// Straight line between two points
    Line,
    /// Line with a head at its end point
    Arrow,
    /// Freehand polyline following the pointer
    Freehand,
    /// Freehand stroke painted in the colour sampled under its first point
    SmartEraser,
    /// Text box
    Text,
    /// Text box with a pointing tail
    SpeechBalloon,
    /// Auto-numbered circular marker
    Step,
    /// Destructive crop to the dragged box
    Crop,
    /// Destructive removal of a horizontal or vertical band
    CutOut,
    Blur,
    Pixelate,
    Magnify,
    Highlight,
    Spotlight,
    /// Embedded bitmap (inserted, never drawn)
    Image,
}

impl Tool {
    /// Human-readable label used in status text.
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Line => "Line",
            Tool::Arrow => "Arrow",
            Tool::Freehand => "Pen",
            Tool::SmartEraser => "Smart eraser",
            Tool::Text => "Text",
            Tool::SpeechBalloon => "Speech balloon",
            Tool::Step => "Step",
            Tool::Crop => "Crop",
            Tool::CutOut => "Cut out",
            Tool::Blur => "Blur",
            Tool::Pixelate => "Pixelate",
            Tool::Magnify => "Magnify",
            Tool::Highlight => "Highlight",
            Tool::Spotlight => "Spotlight",
            Tool::Image => "Image",
        }
    }

    /// Tools whose release runs a destructive bitmap operation instead of adding an annotation.
    pub fn is_destructive(self) -> bool {
        matches!(self, Tool::Crop | Tool::CutOut)
    }
}
