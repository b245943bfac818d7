//! Text styling, wrapping and layout.

pub mod font_manager;
mod measure;
mod wrap;

pub use measure::{FontMeasure, MonospaceMeasure, TextMeasure};
pub use wrap::{wrap_text, WrapOptions};

use std::fmt;
use std::str::FromStr;

use inkframe_core::{SceneError, SceneResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        })
    }
}

impl FromStr for TextAlign {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(TextAlign::Left),
            "center" | "middle" => Ok(TextAlign::Center),
            "right" | "end" => Ok(TextAlign::Right),
            other => Err(SceneError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    /// Multiple of `font_size`
    pub line_height: f32,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub max_width: Option<f32>,
    pub max_lines: Option<usize>,
    pub truncate: bool,
    pub ellipsis: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Sans".to_string(),
            font_size: 16.0,
            line_height: 1.2,
            bold: false,
            italic: false,
            align: TextAlign::Left,
            max_width: None,
            max_lines: None,
            truncate: false,
            ellipsis: "\u{2026}".to_string(),
        }
    }
}

impl TextStyle {
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }

    pub fn validate(&self) -> SceneResult<()> {
        if self.align == TextAlign::Right && self.max_width.is_none() {
            return Err(SceneError::RightAlignWithoutMaxWidth);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

/// Wrapped lines plus the box they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<TextLine>,
    pub width: f32,
    pub height: f32,
    pub line_height: f32,
}

impl TextLayout {
    pub fn compute(text: &str, style: &TextStyle, measure: &dyn TextMeasure) -> Self {
        let options = WrapOptions {
            max_width: style.max_width,
            max_lines: style.max_lines,
            truncate: style.truncate,
            ellipsis: &style.ellipsis,
        };
        let lines: Vec<TextLine> = wrap_text(text, &options, |s| measure.measure(s, style))
            .into_iter()
            .map(|text| {
                let width = measure.measure(&text, style);
                TextLine { text, width }
            })
            .collect();
        let widest = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let line_height = style.line_advance();
        Self {
            width: style.max_width.unwrap_or(widest),
            height: line_height * lines.len() as f32,
            line_height,
            lines,
        }
    }

    /// Left edge of `line` inside a box of `box_width` whose left edge is 0.
    pub fn line_offset(&self, line: &TextLine, align: TextAlign, box_width: f32) -> f32 {
        match align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_width - line.width) / 2.0,
            TextAlign::Right => box_width - line.width,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedLayout {
    text: String,
    style: TextStyle,
    generation: u64,
    layout: TextLayout,
}

/// Text payload of a text layer.
#[derive(Debug, Clone)]
pub struct TextLayer {
    text: String,
    style: TextStyle,
    cache: Option<CachedLayout>,
}

impl TextLayer {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            cache: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Last computed layout. May be stale until the next render or measure.
    pub fn layout(&self) -> Option<&TextLayout> {
        self.cache.as_ref().map(|c| &c.layout)
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub(crate) fn is_stale(&self, generation: u64) -> bool {
        match &self.cache {
            Some(c) => c.generation != generation || c.text != self.text || c.style != self.style,
            None => true,
        }
    }

    /// Re-wraps when the text, the style or the measurer changed.
    pub(crate) fn refresh(&mut self, measure: &dyn TextMeasure, generation: u64) -> &TextLayout {
        if self.is_stale(generation) {
            self.cache = None;
        }
        let (text, style) = (&self.text, &self.style);
        &self
            .cache
            .get_or_insert_with(|| CachedLayout {
                text: text.clone(),
                style: style.clone(),
                generation,
                layout: TextLayout::compute(text, style, measure),
            })
            .layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_parsing() {
        assert_eq!("Center".parse::<TextAlign>().unwrap(), TextAlign::Center);
        assert!(matches!(
            "justify".parse::<TextAlign>(),
            Err(SceneError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_right_align_needs_max_width() {
        let style = TextStyle::default().with_align(TextAlign::Right);
        assert!(matches!(
            style.validate(),
            Err(SceneError::RightAlignWithoutMaxWidth)
        ));
        assert!(style.with_max_width(100.0).validate().is_ok());
    }

    #[test]
    fn test_layout_box_size() {
        let measure = MonospaceMeasure { advance_ratio: 0.5 };
        let style = TextStyle::default().with_font_size(10.0).with_line_height(1.0);
        let layout = TextLayout::compute("abcd\nab", &style, &measure);
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.width, 20.0);
        assert_eq!(layout.height, 20.0);
        let offset = layout.line_offset(&layout.lines[1], TextAlign::Center, layout.width);
        assert_eq!(offset, 5.0);
    }

    #[test]
    fn test_refresh_tracks_changes() {
        let measure = MonospaceMeasure::default();
        let mut text = TextLayer::new("a", TextStyle::default());
        assert!(text.is_stale(0));
        text.refresh(&measure, 0);
        assert!(!text.is_stale(0));
        assert!(text.is_stale(1));
        text.set_text("ab".into());
        assert!(text.is_stale(0));
        assert_eq!(text.refresh(&measure, 0).lines[0].text, "ab");
    }
}
