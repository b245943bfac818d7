use rusttype::{point as rt_point, Scale};

use super::font_manager;
use super::TextStyle;

/// Horizontal advance of a run of text.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> f32;
}

/// Measures with the system font resolved for the style, or a monospace
/// estimate when no font is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMeasure;

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        let Some(font) = font_manager::font_for(&style.font_family, style.bold, style.italic)
        else {
            return MonospaceMeasure::default().measure(text, style);
        };
        let scale = Scale::uniform(style.font_size);
        font.layout(text, scale, rt_point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

/// Every character advances by `font_size * advance_ratio`.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance_ratio: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * style.font_size * self.advance_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_scales_with_size() {
        let style = TextStyle::default().with_font_size(10.0);
        let m = MonospaceMeasure { advance_ratio: 0.5 };
        assert_eq!(m.measure("abcd", &style), 20.0);
        assert_eq!(m.measure("", &style), 0.0);
    }
}
