use std::f32::consts::PI;

use inkframe_core::{get_bounds, Bounds, Point};

use super::LayerId;

/// Rectangular container. Children are drawn in order, last on top.
#[derive(Debug, Clone, Default)]
pub struct FrameLayer {
    pub children: Vec<LayerId>,
    /// Clip children to the frame outline
    pub clip: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectShape {
    /// Corner radii: `top` is top-left, `right` top-right, `bottom`
    /// bottom-right and `left` bottom-left.
    pub radii: Bounds,
}

impl RectShape {
    /// Radii from CSS-style shorthand `[all]`, `[tl/br, tr/bl]`, ...
    pub fn with_radius(values: &[f32]) -> Self {
        Self {
            radii: get_bounds(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub sides: u32,
    pub corner_radius: f32,
    points: Option<PolygonPoints>,
}

impl PolygonShape {
    pub fn new(sides: u32) -> Self {
        Self {
            sides: sides.max(3),
            corner_radius: 0.0,
            points: None,
        }
    }

    /// Cached vertices, if they were computed for the current geometry.
    pub fn points(&self) -> Option<&PolygonPoints> {
        self.points.as_ref()
    }

    /// Recomputes the cached vertices when sides, size or radius changed.
    /// Returns whether a recompute happened.
    pub(crate) fn refresh(&mut self, width: f32, height: f32) -> bool {
        let fresh = self
            .points
            .as_ref()
            .is_some_and(|p| p.matches(self.sides, width, height, self.corner_radius));
        if fresh {
            return false;
        }
        self.points = Some(PolygonPoints::compute(
            self.sides,
            width,
            height,
            self.corner_radius,
        ));
        true
    }
}

/// Vertices of a regular polygon inscribed in the layer box, centered on the
/// origin, first vertex pointing up.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPoints {
    sides: u32,
    width: f32,
    height: f32,
    corner_radius: f32,
    pub sharp: Vec<Point>,
    /// `[entry, vertex, exit]` for every corner when rounding is on
    pub rounded: Vec<[Point; 3]>,
}

impl PolygonPoints {
    pub fn compute(sides: u32, width: f32, height: f32, corner_radius: f32) -> Self {
        let sides = sides.max(3);
        let (rx, ry) = (width.abs() / 2.0, height.abs() / 2.0);
        let sharp: Vec<Point> = (0..sides)
            .map(|i| {
                let angle = -PI / 2.0 + i as f32 * 2.0 * PI / sides as f32;
                Point::new(rx * angle.cos(), ry * angle.sin())
            })
            .collect();

        let rounded = if corner_radius > 0.0 {
            let n = sharp.len();
            (0..n)
                .map(|i| {
                    let vertex = sharp[i];
                    let prev = sharp[(i + n - 1) % n];
                    let next = sharp[(i + 1) % n];
                    let limit = vertex.distance_to(&prev).min(vertex.distance_to(&next)) / 2.0;
                    let r = corner_radius.min(limit);
                    [toward(vertex, prev, r), vertex, toward(vertex, next, r)]
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            sides,
            width,
            height,
            corner_radius,
            sharp,
            rounded,
        }
    }

    pub fn matches(&self, sides: u32, width: f32, height: f32, corner_radius: f32) -> bool {
        self.sides == sides.max(3)
            && self.width == width
            && self.height == height
            && self.corner_radius == corner_radius
    }
}

fn toward(from: Point, to: Point, distance: f32) -> Point {
    let len = from.distance_to(&to);
    if len <= f32::EPSILON {
        return from;
    }
    from + (to - from).scaled(distance / len)
}

/// Triangular caps drawn on top of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShape {
    pub start_cap: bool,
    pub end_cap: bool,
    /// Cap length along the line
    pub cap_size: f32,
}

impl Default for ArrowShape {
    fn default() -> Self {
        Self {
            start_cap: false,
            end_cap: true,
            cap_size: 12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_first_vertex_points_up() {
        let points = PolygonPoints::compute(4, 20.0, 20.0, 0.0);
        assert_eq!(points.sharp.len(), 4);
        assert!(points.sharp[0].x.abs() < 1e-4);
        assert!((points.sharp[0].y + 10.0).abs() < 1e-4);
        assert!(points.rounded.is_empty());
    }

    #[test]
    fn test_polygon_refresh_only_on_change() {
        let mut shape = PolygonShape::new(5);
        assert!(shape.refresh(10.0, 10.0));
        assert!(!shape.refresh(10.0, 10.0));
        shape.corner_radius = 2.0;
        assert!(shape.refresh(10.0, 10.0));
        assert_eq!(shape.points().map(|p| p.rounded.len()), Some(5));
    }

    #[test]
    fn test_rounded_corner_radius_is_limited_by_edges() {
        let points = PolygonPoints::compute(3, 10.0, 10.0, 100.0);
        for [entry, vertex, exit] in &points.rounded {
            assert!(entry.distance_to(vertex) <= vertex.distance_to(exit) + 1e-3);
            assert!(entry.distance_to(vertex) > 0.0);
        }
    }

    #[test]
    fn test_sides_clamped_to_triangle() {
        assert_eq!(PolygonShape::new(1).sides, 3);
    }
}
