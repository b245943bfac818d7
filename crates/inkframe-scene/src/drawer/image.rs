use inkframe_core::create_bounds;
use tiny_skia::{FilterQuality, PathBuilder, PixmapPaint, Rect};

use super::Drawer;
use crate::layer::ImageLayer;
use crate::render::{Pass, RenderContext};

/// Stretches the loaded raster over the layer box. The hit pass fills the box
/// whether or not the raster has arrived.
pub(super) fn draw_image(
    drawer: &Drawer,
    ctx: &mut RenderContext<'_>,
    image: &ImageLayer,
    w: f32,
    h: f32,
) {
    let bounds = create_bounds(-w / 2.0, -h / 2.0, w, h);
    match ctx.pass {
        Pass::Identity => {
            if let Some(rect) = Rect::from_ltrb(bounds.left, bounds.top, bounds.right, bounds.bottom) {
                ctx.fill_path(&PathBuilder::from_rect(rect), drawer.fill);
            }
        }
        Pass::Visible => {
            let Some(raster) = image.raster() else {
                return;
            };
            if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
                return;
            }
            let transform = ctx
                .transform
                .pre_translate(bounds.left, bounds.top)
                .pre_scale(
                    bounds.width() / raster.width() as f32,
                    bounds.height() / raster.height() as f32,
                );
            let paint = PixmapPaint {
                opacity: ctx.alpha,
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            ctx.pixmap
                .draw_pixmap(0, 0, raster.as_ref(), &paint, transform, ctx.mask.as_ref());
        }
    }
}
