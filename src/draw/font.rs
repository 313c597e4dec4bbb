//! Font selection for text, balloon, and step annotations.

use serde::{Deserialize, Serialize};

/// Family, weight, and style of an annotation's text.
///
/// Text annotations carry their own copy so a scene renders the same after
/// the editor defaults change. Weight and style stay strings so config files
/// and scene files can use the same words users type ("bold", "600").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub weight: String,
    pub style: String,
}

impl FontDescriptor {
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Pango description at `size` points. Unknown words fall back to normal.
    pub fn to_pango(&self, size: f64) -> pango::FontDescription {
        let mut desc = pango::FontDescription::new();
        desc.set_family(&self.family);
        desc.set_weight(parse_weight(&self.weight));
        desc.set_style(match self.style.to_lowercase().as_str() {
            "italic" => pango::Style::Italic,
            "oblique" => pango::Style::Oblique,
            _ => pango::Style::Normal,
        });
        desc.set_size((size.max(1.0) * pango::SCALE as f64).round() as i32);
        desc
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "bold".to_string(),
            style: "normal".to_string(),
        }
    }
}

fn parse_weight(weight: &str) -> pango::Weight {
    if let Ok(numeric) = weight.parse::<u32>() {
        return match numeric {
            0..=150 => pango::Weight::Thin,
            151..=250 => pango::Weight::Ultralight,
            251..=350 => pango::Weight::Light,
            351..=450 => pango::Weight::Normal,
            451..=550 => pango::Weight::Medium,
            551..=650 => pango::Weight::Semibold,
            651..=750 => pango::Weight::Bold,
            751..=850 => pango::Weight::Ultrabold,
            _ => pango::Weight::Heavy,
        };
    }
    match weight.to_lowercase().as_str() {
        "ultralight" => pango::Weight::Ultralight,
        "light" => pango::Weight::Light,
        "bold" => pango::Weight::Bold,
        "ultrabold" => pango::Weight::Ultrabold,
        "heavy" => pango::Weight::Heavy,
        _ => pango::Weight::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_font_is_bold_sans() {
        let desc = FontDescriptor::default().to_pango(24.0);
        assert_eq!(desc.family().as_deref(), Some("Sans"));
        assert_eq!(desc.weight(), pango::Weight::Bold);
        assert_eq!(desc.style(), pango::Style::Normal);
        assert_eq!(desc.size(), 24 * pango::SCALE);
    }

    #[test]
    fn numeric_weight_and_italic_style() {
        let font = FontDescriptor::new(
            "JetBrains Mono".to_string(),
            "600".to_string(),
            "Italic".to_string(),
        );
        let desc = font.to_pango(16.0);
        assert_eq!(desc.weight(), pango::Weight::Semibold);
        assert_eq!(desc.style(), pango::Style::Italic);
    }

    #[test]
    fn unknown_words_fall_back_to_normal() {
        let font = FontDescriptor::new("Serif".into(), "chunky".into(), "wobbly".into());
        let desc = font.to_pango(12.0);
        assert_eq!(desc.weight(), pango::Weight::Normal);
        assert_eq!(desc.style(), pango::Style::Normal);
    }
}
