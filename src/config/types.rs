//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Defaults applied to newly drawn annotations. The host can change color and
/// width at runtime; these only set the starting values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default stroke color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 40.0)
    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: f64,

    /// Default font size for text, balloons, and step markers (valid range: 8.0 - 96.0)
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Font family name for text rendering (e.g., "Sans", "Monospace", "JetBrains Mono")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", or a numeric value 100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,

    /// Drop shadow under shapes, lines, and text
    #[serde(default)]
    pub shadow: bool,

    /// Arrowhead length in pixels (valid range: 5.0 - 60.0)
    #[serde(default = "default_arrow_length")]
    pub arrow_length: f64,

    /// Arrowhead angle in degrees (valid range: 15.0 - 60.0)
    #[serde(default = "default_arrow_angle")]
    pub arrow_angle: f64,

    /// Smart eraser stroke width in pixels (valid range: 2.0 - 100.0)
    #[serde(default = "default_eraser_width")]
    pub eraser_width: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_stroke_width: default_stroke_width(),
            default_font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
            shadow: false,
            arrow_length: default_arrow_length(),
            arrow_angle: default_arrow_angle(),
            eraser_width: default_eraser_width(),
        }
    }
}

/// Raster effect strengths for newly drawn effect regions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EffectsConfig {
    /// Blur radius in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_blur_radius")]
    pub blur_radius: f64,

    /// Pixelate block size in pixels (valid range: 2.0 - 64.0)
    #[serde(default = "default_pixelate_block")]
    pub pixelate_block: f64,

    /// Magnifier zoom factor (valid range: 1.0 - 8.0)
    #[serde(default = "default_magnify_zoom")]
    pub magnify_zoom: f64,

    /// Darkening applied outside a spotlight (valid range: 0.0 - 1.0)
    #[serde(default = "default_spotlight_opacity")]
    pub spotlight_opacity: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            blur_radius: default_blur_radius(),
            pixelate_block: default_pixelate_block(),
            magnify_zoom: default_magnify_zoom(),
            spotlight_opacity: default_spotlight_opacity(),
        }
    }
}

/// Undo history bounds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Undo entries that keep a full copy of the image (crop, cut-out); minimum 1
    #[serde(default = "default_max_canvas")]
    pub max_canvas: usize,

    /// Undo entries kept overall; minimum 1
    #[serde(default = "default_max_total")]
    pub max_total: usize,

    /// Whether deleting an annotation with a right-click can be undone
    #[serde(default = "default_undoable_right_click_delete")]
    pub undoable_right_click_delete: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_canvas: default_max_canvas(),
            max_total: default_max_total(),
            undoable_right_click_delete: default_undoable_right_click_delete(),
        }
    }
}

/// Pointer interaction tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InteractionConfig {
    /// Hit-test slack around annotations in pixels (valid range: 0.0 - 30.0)
    #[serde(default = "default_hit_tolerance")]
    pub hit_tolerance: f64,

    /// Side length of selection handles in pixels (valid range: 4.0 - 40.0)
    #[serde(default = "default_handle_size")]
    pub handle_size: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: default_hit_tolerance(),
            handle_size: default_handle_size(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_stroke_width() -> f64 {
    3.0
}

fn default_font_size() -> f64 {
    24.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_arrow_length() -> f64 {
    20.0
}

fn default_arrow_angle() -> f64 {
    30.0
}

fn default_eraser_width() -> f64 {
    16.0
}

fn default_blur_radius() -> f64 {
    8.0
}

fn default_pixelate_block() -> f64 {
    10.0
}

fn default_magnify_zoom() -> f64 {
    2.0
}

fn default_spotlight_opacity() -> f64 {
    0.5
}

fn default_max_canvas() -> usize {
    5
}

fn default_max_total() -> usize {
    100
}

fn default_undoable_right_click_delete() -> bool {
    true
}

fn default_hit_tolerance() -> f64 {
    5.0
}

fn default_handle_size() -> f64 {
    10.0
}
