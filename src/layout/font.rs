//! Font metrics for the reference measurer

use crate::document::TextStyle;

/// Metrics needed for text layout
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Line height in points
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 17pt body text with 1.2 leading
        let default_width = 9.0;
        Self {
            line_height: 20.4,
            char_widths: vec![default_width; 128],
            default_width,
        }
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Fixed-pitch metrics, handy for deterministic layout
    pub fn monospace(line_height: f32, char_width: f32) -> Self {
        Self::new(line_height, vec![char_width; 128], char_width)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a character drawn in `style`
    pub fn styled_width(&self, c: char, style: &TextStyle) -> f32 {
        if c.is_control() {
            return 0.0;
        }
        let base = if style.monospace {
            self.default_width
        } else {
            self.width(c)
        };
        base * style.line_height_multiplier()
    }

    /// Line height for text drawn in `style`
    pub fn styled_line_height(&self, style: &TextStyle) -> f32 {
        self.line_height * style.line_height_multiplier()
    }
}
