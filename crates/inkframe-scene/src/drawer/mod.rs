//! Fill/stroke painting of layers.
//!
//! Every layer carries two drawers: the visible one with the caller's style
//! and a hit drawer painting the layer's identity color.

mod image;
mod paths;
mod text;

use inkframe_core::{Bounds, Point, Rgba};

use crate::layer::{ArrowShape, Layer, LayerKind};
use crate::render::{ChildLayers, Pass, RenderContext};

#[derive(Debug, Clone, PartialEq)]
pub struct Drawer {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
    /// Alternating dash/gap lengths
    pub dash: Option<Vec<f32>>,
    pub dash_offset: f32,
    /// Outline the layer bounds after drawing
    pub debug: bool,
    /// Draw a blinking caret after the last line of text
    pub caret: bool,
}

impl Default for Drawer {
    fn default() -> Self {
        Self {
            fill: Rgba::TRANSPARENT,
            stroke: Rgba::BLACK,
            stroke_width: 1.0,
            dash: None,
            dash_offset: 0.0,
            debug: false,
            caret: false,
        }
    }
}

impl Drawer {
    pub fn new(fill: Rgba, stroke: Rgba, stroke_width: f32) -> Self {
        Self {
            fill,
            stroke,
            stroke_width,
            ..Default::default()
        }
    }

    /// Hit drawer: identity color for fill and stroke, never dashed.
    pub fn identity(color: Rgba, stroke_width: f32) -> Self {
        Self::new(color, color, stroke_width)
    }

    /// Solid triangle style used for arrow caps.
    pub fn edge_cap(&self) -> Drawer {
        Drawer::new(self.stroke, Rgba::TRANSPARENT, 0.0)
    }

    fn dash(&self) -> Option<(&[f32], f32)> {
        self.dash.as_deref().map(|d| (d, self.dash_offset))
    }

    pub(crate) fn fill_and_stroke(&self, ctx: &mut RenderContext<'_>, path: &tiny_skia::Path) {
        ctx.fill_path(path, self.fill);
        self.stroke_only(ctx, path);
    }

    pub(crate) fn stroke_only(&self, ctx: &mut RenderContext<'_>, path: &tiny_skia::Path) {
        ctx.stroke_path(path, self.stroke, self.stroke_width, self.dash());
    }

    /// Paints `layer` centered on its box, then its children in the layer's
    /// local space (origin at the top-left corner).
    pub(crate) fn draw(
        &self,
        ctx: &mut RenderContext<'_>,
        layer: &Layer,
        children: Option<ChildLayers<'_>>,
    ) {
        // Groups only forward to their children in the parent's space.
        if layer.is_group() {
            if let Some(children) = children {
                children.render(ctx);
            }
            return;
        }

        let props = layer.props;
        let (w, h) = (props.width, props.height);
        let base = ctx.transform;
        let local = base
            .pre_translate(props.x + w / 2.0, props.y + h / 2.0)
            .pre_rotate(props.rotate.to_degrees())
            .pre_scale(props.scale, props.scale);

        ctx.transform = local;
        let outline = self.paint_kind(ctx, layer);

        if let Some(children) = children {
            let clip = matches!(&layer.kind, LayerKind::Frame(frame) if frame.clip);
            let clip_mask = if clip {
                outline.as_ref().and_then(|path| ctx.clip_to(path))
            } else {
                None
            };
            // A clipping frame without an outline has no visible area.
            if !clip || clip_mask.is_some() {
                let saved_mask = clip_mask.map(|mask| std::mem::replace(&mut ctx.mask, Some(mask)));

                ctx.transform = local.pre_translate(-w / 2.0, -h / 2.0);
                children.render(ctx);

                if let Some(mask) = saved_mask {
                    ctx.mask = mask;
                }
            }
        }

        ctx.transform = base;
        if ctx.pass == Pass::Visible && (self.debug || ctx.debug) {
            outline_bounds(ctx, props.bounds());
        }
    }

    /// Returns the outline path for containers so children can be clipped.
    fn paint_kind(&self, ctx: &mut RenderContext<'_>, layer: &Layer) -> Option<tiny_skia::Path> {
        let (w, h) = (layer.props.width, layer.props.height);
        match &layer.kind {
            LayerKind::Frame(_) => {
                let path = paths::rect(w, h, Bounds::default())?;
                self.fill_and_stroke(ctx, &path);
                Some(path)
            }
            LayerKind::Rect(rect) => {
                let path = paths::rect(w, h, rect.radii)?;
                self.fill_and_stroke(ctx, &path);
                None
            }
            LayerKind::Ellipse => {
                let path = paths::ellipse(w, h)?;
                self.fill_and_stroke(ctx, &path);
                None
            }
            LayerKind::Polygon(polygon) => {
                let path = paths::polygon(polygon, w, h)?;
                self.fill_and_stroke(ctx, &path);
                None
            }
            LayerKind::Line => {
                let path = paths::segment(Point::new(-w / 2.0, -h / 2.0), Point::new(w / 2.0, h / 2.0))?;
                self.stroke_only(ctx, &path);
                None
            }
            LayerKind::Arrow(arrow) => {
                self.draw_arrow(ctx, arrow, w, h);
                None
            }
            LayerKind::Text(text_layer) => {
                text::draw_text(self, ctx, &layer.props, text_layer);
                None
            }
            LayerKind::Image(image_layer) => {
                image::draw_image(self, ctx, image_layer, w, h);
                None
            }
            LayerKind::Group(_) => None,
        }
    }

    fn draw_arrow(&self, ctx: &mut RenderContext<'_>, arrow: &ArrowShape, w: f32, h: f32) {
        let start = Point::new(-w / 2.0, -h / 2.0);
        let end = Point::new(w / 2.0, h / 2.0);
        let length = start.distance_to(&end);
        if length <= f32::EPSILON {
            return;
        }
        let direction = (end - start).scaled(1.0 / length);
        let size = arrow.cap_size.clamp(0.0, length);

        let shaft_start = if arrow.start_cap {
            start + direction.scaled(size)
        } else {
            start
        };
        let shaft_end = if arrow.end_cap {
            end - direction.scaled(size)
        } else {
            end
        };
        if let Some(shaft) = paths::segment(shaft_start, shaft_end) {
            self.stroke_only(ctx, &shaft);
        }

        let cap = self.edge_cap();
        let caps = [
            (arrow.start_cap, start, direction.scaled(-1.0)),
            (arrow.end_cap, end, direction),
        ];
        for (enabled, tip, dir) in caps {
            if !enabled {
                continue;
            }
            let base = tip - dir.scaled(size);
            let normal = Point::new(-dir.y, dir.x).scaled(size / 2.0);
            if let Some(path) = paths::triangle(tip, base + normal, base - normal) {
                ctx.fill_path(&path, cap.fill);
            }
        }
    }
}

fn outline_bounds(ctx: &mut RenderContext<'_>, bounds: Bounds) {
    let Some(rect) =
        tiny_skia::Rect::from_ltrb(bounds.left, bounds.top, bounds.right, bounds.bottom)
    else {
        return;
    };
    let path = tiny_skia::PathBuilder::from_rect(rect);
    ctx.stroke_path(&path, Rgba::RED, 1.0, None);
}
