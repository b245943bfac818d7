use std::time::Duration;

use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use tiny_skia::{Path, PathBuilder, Rect};

use super::Drawer;
use crate::layer::LayerProps;
use crate::render::{Pass, RenderContext};
use crate::text::{font_manager, TextLayer};

struct GlyphOutline {
    builder: PathBuilder,
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Glyph outlines of one line, baseline centered in its line box.
fn line_path(font: &Font<'_>, text: &str, size: f32, x: f32, top: f32, line_height: f32) -> Option<Path> {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let glyph_height = v_metrics.ascent - v_metrics.descent;
    let baseline = top + (line_height - glyph_height) / 2.0 + v_metrics.ascent;

    let mut outline = GlyphOutline {
        builder: PathBuilder::new(),
    };
    for glyph in font.layout(text, scale, rt_point(x, baseline)) {
        glyph.build_outline(&mut outline);
    }
    outline.builder.finish()
}

pub(crate) fn caret_visible(elapsed: Duration, interval: Duration) -> bool {
    let interval = interval.as_millis();
    if interval == 0 {
        return true;
    }
    (elapsed.as_millis() / interval) % 2 == 0
}

pub(super) fn draw_text(
    drawer: &Drawer,
    ctx: &mut RenderContext<'_>,
    props: &LayerProps,
    text: &TextLayer,
) {
    let Some(layout) = text.layout() else {
        return;
    };
    let style = text.style();
    let (left, top) = (-props.width / 2.0, -props.height / 2.0);
    let font = match ctx.pass {
        Pass::Visible => font_manager::font_for(&style.font_family, style.bold, style.italic),
        Pass::Identity => None,
    };

    for (i, line) in layout.lines.iter().enumerate() {
        let x = left + layout.line_offset(line, style.align, props.width);
        let y = top + i as f32 * layout.line_height;
        match ctx.pass {
            Pass::Identity => {
                if let Some(rect) = Rect::from_xywh(x, y, line.width, layout.line_height) {
                    ctx.fill_path(&PathBuilder::from_rect(rect), drawer.fill);
                }
            }
            Pass::Visible => {
                let Some(font) = font else { continue };
                if let Some(path) =
                    line_path(font, &line.text, style.font_size, x, y, layout.line_height)
                {
                    drawer.fill_and_stroke(ctx, &path);
                }
            }
        }
    }

    if drawer.caret
        && ctx.pass == Pass::Visible
        && caret_visible(ctx.elapsed, ctx.caret_interval)
    {
        let last = layout.lines.len().saturating_sub(1);
        let line_width = layout.lines.last().map_or(0.0, |l| l.width);
        let offset = layout
            .lines
            .last()
            .map_or(0.0, |l| layout.line_offset(l, style.align, props.width));
        let x = left + offset + line_width;
        let y = top + last as f32 * layout.line_height;
        let caret_width = (style.font_size / 12.0).max(1.0);
        let color = if drawer.fill.is_transparent() {
            drawer.stroke
        } else {
            drawer.fill
        };
        if let Some(rect) = Rect::from_xywh(x, y, caret_width, layout.line_height) {
            ctx.fill_path(&PathBuilder::from_rect(rect), color);
        }
    }
}
