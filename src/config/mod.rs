//! Configuration file support for shotmark.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/shotmark/config.toml`. Settings include drawing defaults,
//! effect strengths, undo history bounds, and pointer interaction tuning.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{DrawingConfig, EffectsConfig, HistoryConfig, InteractionConfig};

use crate::draw::{AnnotationDefaults, FontDescriptor, Style};
use crate::editor::EditorSettings;
use crate::history::HistoryLimits;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_stroke_width = 3.0
///
/// [effects]
/// blur_radius = 8.0
///
/// [history]
/// max_canvas = 5
/// max_total = 100
///
/// [interaction]
/// hit_tolerance = 5.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Defaults for new annotations (color, width, font, arrowheads)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Blur / pixelate / magnify / spotlight strengths
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Undo history bounds and policy
    #[serde(default)]
    pub history: HistoryConfig,

    /// Hit-testing and handle sizes
    #[serde(default)]
    pub interaction: InteractionConfig,
}

/// Clamps `value` into `range`, warning when it was outside.
fn clamp_logged(name: &str, value: &mut f64, min: f64, max: f64) {
    if !(min..=max).contains(value) {
        log::warn!(
            "Invalid {} {:.2}, clamping to {:.1}-{:.1} range",
            name,
            value,
            min,
            max
        );
        *value = value.clamp(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced with
    /// the default for strings) and a warning is logged.
    fn validate_and_clamp(&mut self) {
        let drawing = &mut self.drawing;
        clamp_logged("default_stroke_width", &mut drawing.default_stroke_width, 1.0, 40.0);
        clamp_logged("default_font_size", &mut drawing.default_font_size, 8.0, 96.0);
        clamp_logged("arrow_length", &mut drawing.arrow_length, 5.0, 60.0);
        clamp_logged("arrow_angle", &mut drawing.arrow_angle, 15.0, 60.0);
        clamp_logged("eraser_width", &mut drawing.eraser_width, 2.0, 100.0);

        // Validate font weight is reasonable
        let valid_weight = matches!(
            drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'bold'",
                drawing.font_weight
            );
            drawing.font_weight = "bold".to_string();
        }

        if !matches!(
            drawing.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                drawing.font_style
            );
            drawing.font_style = "normal".to_string();
        }

        let effects = &mut self.effects;
        clamp_logged("blur_radius", &mut effects.blur_radius, 1.0, 50.0);
        clamp_logged("pixelate_block", &mut effects.pixelate_block, 2.0, 64.0);
        clamp_logged("magnify_zoom", &mut effects.magnify_zoom, 1.0, 8.0);
        clamp_logged("spotlight_opacity", &mut effects.spotlight_opacity, 0.0, 1.0);

        // An empty history would make every undo impossible.
        if self.history.max_canvas == 0 {
            log::warn!("Invalid max_canvas 0, using 1");
            self.history.max_canvas = 1;
        }
        if self.history.max_total == 0 {
            log::warn!("Invalid max_total 0, using 1");
            self.history.max_total = 1;
        }

        let interaction = &mut self.interaction;
        clamp_logged("hit_tolerance", &mut interaction.hit_tolerance, 0.0, 30.0);
        clamp_logged("handle_size", &mut interaction.handle_size, 4.0, 40.0);
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/shotmark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("shotmark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);
        Ok(config)
    }

    /// Parses TOML text and clamps the result.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path or
    /// the file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, EXAMPLE_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the config file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Editor defaults derived from the `[drawing]`, `[effects]`, and `[interaction]` sections.
    pub fn editor_settings(&self) -> EditorSettings {
        let drawing = &self.drawing;
        EditorSettings {
            defaults: AnnotationDefaults {
                style: Style {
                    stroke_color: drawing.default_color.to_color(),
                    stroke_width: drawing.default_stroke_width,
                    fill_color: None,
                    shadow: drawing.shadow,
                },
                font: FontDescriptor::new(
                    drawing.font_family.clone(),
                    drawing.font_weight.clone(),
                    drawing.font_style.clone(),
                ),
                font_size: drawing.default_font_size,
                arrow_length: drawing.arrow_length,
                arrow_angle: drawing.arrow_angle,
                blur_radius: self.effects.blur_radius,
                pixelate_block: self.effects.pixelate_block,
                magnify_zoom: self.effects.magnify_zoom,
                spotlight_opacity: self.effects.spotlight_opacity,
                eraser_width: drawing.eraser_width,
            },
            hit_tolerance: self.interaction.hit_tolerance,
            handle_size: self.interaction.handle_size,
        }
    }

    pub fn history_limits(&self) -> HistoryLimits {
        HistoryLimits {
            max_canvas: self.history.max_canvas,
            max_total: self.history.max_total,
        }
    }
}

/// Documented example configuration shipped with the crate.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BLUE;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.drawing.default_stroke_width, 3.0);
        assert_eq!(config.history.max_canvas, 5);
        assert!(config.history.undoable_right_click_delete);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::from_toml_str(
            r#"
            [drawing]
            default_stroke_width = 500.0
            font_style = "wobbly"

            [effects]
            spotlight_opacity = 3.0

            [history]
            max_canvas = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.drawing.default_stroke_width, 40.0);
        assert_eq!(config.drawing.font_style, "normal");
        assert_eq!(config.effects.spotlight_opacity, 1.0);
        assert_eq!(config.history.max_canvas, 1);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[drawing\nbroken").is_err());
    }

    #[test]
    fn example_config_parses() {
        let config = Config::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.history.max_total, 100);
    }

    #[test]
    fn editor_settings_follow_config() {
        let config = Config::from_toml_str(
            r#"
            [drawing]
            default_color = "blue"
            [interaction]
            handle_size = 12.0
            "#,
        )
        .unwrap();
        let settings = config.editor_settings();
        assert_eq!(settings.defaults.style.stroke_color, BLUE);
        assert_eq!(settings.handle_size, 12.0);
    }

    #[test]
    fn load_from_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "drawing = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
