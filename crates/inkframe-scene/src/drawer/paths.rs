//! Shape outlines centered on the origin.

use inkframe_core::{create_bounds, Bounds, Point};
use tiny_skia::{Path, PathBuilder, Rect};

use crate::layer::{PolygonPoints, PolygonShape};

fn centered_rect(w: f32, h: f32) -> Option<Rect> {
    let b = create_bounds(-w / 2.0, -h / 2.0, w, h);
    Rect::from_ltrb(b.left, b.top, b.right, b.bottom)
}

/// Rectangle with per-corner radii (`top`=top-left, clockwise).
pub(super) fn rect(w: f32, h: f32, radii: Bounds) -> Option<Path> {
    let r = centered_rect(w, h)?;
    let limit = r.width().min(r.height()) / 2.0;
    let [tl, tr, br, bl] =
        [radii.top, radii.right, radii.bottom, radii.left].map(|v| v.clamp(0.0, limit));
    if tl == 0.0 && tr == 0.0 && br == 0.0 && bl == 0.0 {
        return Some(PathBuilder::from_rect(r));
    }

    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    let mut pb = PathBuilder::new();
    pb.move_to(l + tl, t);
    pb.line_to(rt - tr, t);
    pb.quad_to(rt, t, rt, t + tr);
    pb.line_to(rt, b - br);
    pb.quad_to(rt, b, rt - br, b);
    pb.line_to(l + bl, b);
    pb.quad_to(l, b, l, b - bl);
    pb.line_to(l, t + tl);
    pb.quad_to(l, t, l + tl, t);
    pb.close();
    pb.finish()
}

pub(super) fn ellipse(w: f32, h: f32) -> Option<Path> {
    PathBuilder::from_oval(centered_rect(w, h)?)
}

/// Uses the cached vertices when they match the current size.
pub(super) fn polygon(shape: &PolygonShape, w: f32, h: f32) -> Option<Path> {
    let computed;
    let points = match shape.points() {
        Some(points) if points.matches(shape.sides, w, h, shape.corner_radius) => points,
        _ => {
            computed = PolygonPoints::compute(shape.sides, w, h, shape.corner_radius);
            &computed
        }
    };

    let mut pb = PathBuilder::new();
    if points.rounded.is_empty() {
        let (first, rest) = points.sharp.split_first()?;
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
    } else {
        let [entry, _, _] = points.rounded.first()?;
        pb.move_to(entry.x, entry.y);
        for [entry, vertex, exit] in &points.rounded {
            pb.line_to(entry.x, entry.y);
            pb.quad_to(vertex.x, vertex.y, exit.x, exit.y);
        }
    }
    pb.close();
    pb.finish()
}

pub(super) fn segment(from: Point, to: Point) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    pb.finish()
}

pub(super) fn triangle(a: Point, b: Point, c: Point) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(a.x, a.y);
    pb.line_to(b.x, b.y);
    pb.line_to(c.x, c.y);
    pb.close();
    pb.finish()
}
