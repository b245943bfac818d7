//! Rectangle geometry shared by layers, drawers and the stage.
//!
//! `Bounds` is always normalized: `top <= bottom` and `left <= right`, no
//! matter which sign the width or height it was built from had.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point (or delta) in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotates the vector by `angle` radians around the origin.
    pub fn rotated(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle stored as its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Bounds {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
            left: self.left.min(other.left),
        }
    }
}

/// Builds normalized bounds from a position and a possibly negative size.
pub fn create_bounds(x: f32, y: f32, width: f32, height: f32) -> Bounds {
    let (left, right) = if width < 0.0 {
        (x + width, x)
    } else {
        (x, x + width)
    };
    let (top, bottom) = if height < 0.0 {
        (y + height, y)
    } else {
        (y, y + height)
    };
    Bounds {
        top,
        right,
        bottom,
        left,
    }
}

/// Translates all four edges by `offset`.
pub fn set_offset(bounds: Bounds, offset: Point) -> Bounds {
    Bounds {
        top: bounds.top + offset.y,
        right: bounds.right + offset.x,
        bottom: bounds.bottom + offset.y,
        left: bounds.left + offset.x,
    }
}

/// Scales about the rectangle's own center; the center does not move.
pub fn set_scale(bounds: Bounds, factor: f32) -> Bounds {
    let dw = bounds.width() * (factor - 1.0);
    let dh = bounds.height() * (factor - 1.0);
    Bounds {
        top: bounds.top - dh / 2.0,
        right: bounds.right + dw / 2.0,
        bottom: bounds.bottom + dh / 2.0,
        left: bounds.left - dw / 2.0,
    }
}

/// Scales about an arbitrary origin, e.g. the center of a scaled ancestor.
pub fn scale_about(bounds: Bounds, origin: Point, factor: f32) -> Bounds {
    let map = |v: f32, o: f32| o + (v - o) * factor;
    let a = Point::new(map(bounds.left, origin.x), map(bounds.top, origin.y));
    let b = Point::new(map(bounds.right, origin.x), map(bounds.bottom, origin.y));
    create_bounds(a.x, a.y, b.x - a.x, b.y - a.y)
}

/// Expands CSS-margin style shorthand (1 to 4 values) into edges.
///
/// ```
/// use inkframe_core::bounds::get_bounds;
///
/// let b = get_bounds(&[1.0, 2.0, 3.0]);
/// assert_eq!((b.top, b.right, b.bottom, b.left), (1.0, 2.0, 3.0, 2.0));
/// ```
pub fn get_bounds(values: &[f32]) -> Bounds {
    let pattern: [usize; 4] = match values.len() {
        1 => [0, 0, 0, 0],
        2 => [0, 1, 0, 1],
        3 => [0, 1, 2, 1],
        4 => [0, 1, 2, 3],
        _ => return Bounds::new(0.0, 0.0, 0.0, 0.0),
    };
    Bounds {
        top: values[pattern[0]],
        right: values[pattern[1]],
        bottom: values[pattern[2]],
        left: values[pattern[3]],
    }
}
