//! Render passes over the scene tree.
//!
//! The same traversal runs twice per frame: once into the visible surface with
//! each layer's own drawer, once into the identity surface with its hit drawer.

use std::time::Duration;

use inkframe_core::Rgba;
use tiny_skia::{FillRule, Mask, Paint, Path, Pixmap, Stroke, StrokeDash, Transform};

use crate::layer::LayerId;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Anti-aliased, opacity applied
    Visible,
    /// Flat identity colors, no anti-aliasing, opacity ignored
    Identity,
}

pub struct RenderContext<'a> {
    pub(crate) pixmap: &'a mut Pixmap,
    pub(crate) transform: Transform,
    pub(crate) alpha: f32,
    pub(crate) mask: Option<Mask>,
    pub(crate) pass: Pass,
    /// Time since the stage was created, drives the caret blink
    pub(crate) elapsed: Duration,
    pub(crate) caret_interval: Duration,
    pub(crate) debug: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(pixmap: &'a mut Pixmap, pass: Pass, transform: Transform) -> Self {
        Self {
            pixmap,
            transform,
            alpha: 1.0,
            mask: None,
            pass,
            elapsed: Duration::ZERO,
            caret_interval: Duration::from_millis(500),
            debug: false,
        }
    }

    pub fn with_clock(mut self, elapsed: Duration, caret_interval: Duration) -> Self {
        self.elapsed = elapsed;
        self.caret_interval = caret_interval;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub(crate) fn anti_alias(&self) -> bool {
        self.pass == Pass::Visible
    }

    pub(crate) fn paint(&self, color: Rgba) -> Paint<'static> {
        let alpha = match self.pass {
            Pass::Visible => (color.a as f32 * self.alpha).round().clamp(0.0, 255.0) as u8,
            Pass::Identity => color.a,
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint.anti_alias = self.anti_alias();
        paint
    }

    pub(crate) fn fill_path(&mut self, path: &Path, color: Rgba) {
        if color.is_transparent() {
            return;
        }
        let paint = self.paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.transform, self.mask.as_ref());
    }

    pub(crate) fn stroke_path(
        &mut self,
        path: &Path,
        color: Rgba,
        width: f32,
        dash: Option<(&[f32], f32)>,
    ) {
        if color.is_transparent() || width <= 0.0 {
            return;
        }
        let paint = self.paint(color);
        let stroke = Stroke {
            width,
            dash: dash.and_then(|(array, offset)| StrokeDash::new(array.to_vec(), offset)),
            ..Default::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.transform, self.mask.as_ref());
    }

    /// Clip mask for children: `path` under the current transform, intersected
    /// with any clip already active.
    pub(crate) fn clip_to(&self, path: &Path) -> Option<Mask> {
        let anti_alias = self.anti_alias();
        match &self.mask {
            Some(existing) => {
                let mut mask = existing.clone();
                mask.intersect_path(path, FillRule::Winding, anti_alias, self.transform);
                Some(mask)
            }
            None => {
                let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
                mask.fill_path(path, FillRule::Winding, anti_alias, self.transform);
                Some(mask)
            }
        }
    }
}

/// Children of a container, rendered after the container itself.
#[derive(Clone, Copy)]
pub(crate) struct ChildLayers<'s> {
    scene: &'s Scene,
    ids: &'s [LayerId],
}

impl ChildLayers<'_> {
    pub(crate) fn render(&self, ctx: &mut RenderContext<'_>) {
        for &child in self.ids {
            render_layer(self.scene, child, ctx);
        }
    }
}

/// Renders `id` and its subtree. Invisible layers are skipped with their
/// subtree; opacity scales the pass alpha for the duration of the call.
pub fn render_layer(scene: &Scene, id: LayerId, ctx: &mut RenderContext<'_>) {
    let Some(layer) = scene.get(id) else {
        return;
    };
    if !layer.props.visible {
        return;
    }

    let saved_alpha = ctx.alpha;
    if ctx.pass == Pass::Visible {
        let opacity = layer.props.opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            ctx.alpha *= opacity;
        }
    }

    let drawer = match ctx.pass {
        Pass::Visible => &layer.drawer,
        Pass::Identity => &layer.hit_drawer,
    };
    let children = layer.kind.children().map(|ids| ChildLayers { scene, ids });
    drawer.draw(ctx, layer, children);

    ctx.alpha = saved_alpha;
}
