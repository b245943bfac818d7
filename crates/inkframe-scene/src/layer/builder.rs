use inkframe_core::{Point, Rgba};
use smallvec::smallvec;

use super::{
    ArrowShape, FrameLayer, ImageLayer, LayerKind, LayerProps, PolygonShape, RectShape, TagSet,
    GROUP_TAG,
};
use crate::drawer::Drawer;
use crate::text::{TextLayer, TextStyle};

/// Describes a layer before it is inserted into a scene.
///
/// ```
/// use inkframe_core::Rgba;
/// use inkframe_scene::{LayerBuilder, Scene};
///
/// let mut scene = Scene::default();
/// let id = scene
///     .insert(LayerBuilder::rect(10.0, 10.0, 80.0, 40.0).fill(Rgba::RED).corner_radius(&[4.0]))
///     .unwrap();
/// assert_eq!(scene.width(id).unwrap(), 80.0);
/// ```
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    pub(crate) props: LayerProps,
    pub(crate) tags: TagSet,
    pub(crate) kind: LayerKind,
    pub(crate) drawer: Drawer,
}

impl LayerBuilder {
    fn new(kind: LayerKind, x: f32, y: f32, width: f32, height: f32, drawer: Drawer) -> Self {
        Self {
            props: LayerProps {
                x,
                y,
                width,
                height,
                ..Default::default()
            },
            tags: TagSet::new(),
            kind,
            drawer,
        }
    }

    /// Rectangular container. Transparent, no outline.
    pub fn frame(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            LayerKind::Frame(FrameLayer::default()),
            x,
            y,
            width,
            height,
            Drawer::new(Rgba::TRANSPARENT, Rgba::TRANSPARENT, 0.0),
        )
    }

    /// Container whose geometry is derived from its children.
    pub fn group() -> Self {
        let mut builder = Self::new(
            LayerKind::Group(Vec::new()),
            0.0,
            0.0,
            0.0,
            0.0,
            Drawer::new(Rgba::TRANSPARENT, Rgba::TRANSPARENT, 0.0),
        );
        builder.tags = smallvec![GROUP_TAG.to_string()];
        builder
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            LayerKind::Rect(RectShape::default()),
            x,
            y,
            width,
            height,
            Drawer::default(),
        )
    }

    pub fn ellipse(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(LayerKind::Ellipse, x, y, width, height, Drawer::default())
    }

    pub fn polygon(x: f32, y: f32, width: f32, height: f32, sides: u32) -> Self {
        Self::new(
            LayerKind::Polygon(PolygonShape::new(sides)),
            x,
            y,
            width,
            height,
            Drawer::default(),
        )
    }

    /// Segment from `start` to `end`; stored as position plus signed size.
    pub fn line(start: Point, end: Point) -> Self {
        Self::new(
            LayerKind::Line,
            start.x,
            start.y,
            end.x - start.x,
            end.y - start.y,
            Drawer::default(),
        )
    }

    /// Line with a cap at the end point.
    pub fn arrow(start: Point, end: Point) -> Self {
        let mut builder = Self::line(start, end);
        builder.kind = LayerKind::Arrow(ArrowShape::default());
        builder
    }

    /// Text box at `(x, y)`. Its size follows the wrapped text.
    pub fn text(x: f32, y: f32, text: impl Into<String>, style: TextStyle) -> Self {
        Self::new(
            LayerKind::Text(TextLayer::new(text, style)),
            x,
            y,
            0.0,
            0.0,
            Drawer::new(Rgba::BLACK, Rgba::TRANSPARENT, 0.0),
        )
    }

    /// Image from a file path or `data:` URL. A zero size adopts the
    /// natural image size once loaded.
    pub fn image(x: f32, y: f32, width: f32, height: f32, source: impl Into<String>) -> Self {
        Self::new(
            LayerKind::Image(ImageLayer::new(source)),
            x,
            y,
            width,
            height,
            Drawer::new(Rgba::TRANSPARENT, Rgba::TRANSPARENT, 0.0),
        )
    }

    pub fn fill(mut self, color: Rgba) -> Self {
        self.drawer.fill = color;
        self
    }

    pub fn stroke(mut self, color: Rgba, width: f32) -> Self {
        self.drawer.stroke = color;
        self.drawer.stroke_width = width;
        self
    }

    pub fn dash(mut self, pattern: Vec<f32>, offset: f32) -> Self {
        self.drawer.dash = Some(pattern);
        self.drawer.dash_offset = offset;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.props.opacity = opacity;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.props.scale = scale;
        self
    }

    /// Rotation in radians.
    pub fn rotate(mut self, radians: f32) -> Self {
        self.props.rotate = radians;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.props.visible = visible;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn debug_bounds(mut self, debug: bool) -> Self {
        self.drawer.debug = debug;
        self
    }

    /// Corner radius in CSS shorthand for rects, first value for polygons.
    pub fn corner_radius(mut self, values: &[f32]) -> Self {
        match &mut self.kind {
            LayerKind::Rect(rect) => *rect = RectShape::with_radius(values),
            LayerKind::Polygon(polygon) => {
                polygon.corner_radius = values.first().copied().unwrap_or(0.0)
            }
            _ => {}
        }
        self
    }

    /// Clip frame children to the frame outline.
    pub fn clip(mut self, clip: bool) -> Self {
        if let LayerKind::Frame(frame) = &mut self.kind {
            frame.clip = clip;
        }
        self
    }

    /// Which ends of an arrow get a cap, and how long the caps are.
    pub fn caps(mut self, start: bool, end: bool, size: f32) -> Self {
        if let LayerKind::Arrow(arrow) = &mut self.kind {
            arrow.start_cap = start;
            arrow.end_cap = end;
            arrow.cap_size = size;
        }
        self
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }
}
