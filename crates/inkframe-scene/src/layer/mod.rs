//! Layer storage types.
//!
//! Layers live in the [`Scene`](crate::Scene) arena and are addressed by
//! [`LayerId`]. Common placement state sits in [`LayerProps`]; everything a
//! specific kind needs lives in [`LayerKind`].

mod builder;
mod image;
mod shapes;

pub use builder::LayerBuilder;
pub use image::ImageLayer;
pub(crate) use image::ImageOutcome;
pub use shapes::{ArrowShape, FrameLayer, PolygonPoints, PolygonShape, RectShape};

use inkframe_core::{create_bounds, Bounds};
use smallvec::SmallVec;

use crate::drawer::Drawer;
use crate::identity::Identity;
use crate::text::TextLayer;

slotmap::new_key_type! {
    /// Handle to a layer inside a [`Scene`](crate::Scene).
    pub struct LayerId;
}

pub type TagSet = SmallVec<[String; 2]>;

/// Tag carried by every group layer.
pub const GROUP_TAG: &str = "group";
/// Tag carried by the stage's root frame.
pub const ROOT_TAG: &str = "root";

/// Placement shared by every layer kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerProps {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clamped to `[0, 1]` when rendering
    pub opacity: f32,
    pub visible: bool,
    pub scale: f32,
    /// Rotation in radians about the layer center
    pub rotate: f32,
}

impl Default for LayerProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            opacity: 1.0,
            visible: true,
            scale: 1.0,
            rotate: 0.0,
        }
    }
}

impl LayerProps {
    pub fn bounds(&self) -> Bounds {
        create_bounds(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub enum LayerKind {
    Frame(FrameLayer),
    Group(Vec<LayerId>),
    Rect(RectShape),
    Ellipse,
    Polygon(PolygonShape),
    Line,
    Arrow(ArrowShape),
    Text(TextLayer),
    Image(ImageLayer),
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Frame(_) => "frame",
            LayerKind::Group(_) => "group",
            LayerKind::Rect(_) => "rect",
            LayerKind::Ellipse => "ellipse",
            LayerKind::Polygon(_) => "polygon",
            LayerKind::Line => "line",
            LayerKind::Arrow(_) => "arrow",
            LayerKind::Text(_) => "text",
            LayerKind::Image(_) => "image",
        }
    }

    pub fn children(&self) -> Option<&[LayerId]> {
        match self {
            LayerKind::Frame(frame) => Some(&frame.children),
            LayerKind::Group(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<LayerId>> {
        match self {
            LayerKind::Frame(frame) => Some(&mut frame.children),
            LayerKind::Group(children) => Some(children),
            _ => None,
        }
    }
}

/// A node of the scene graph.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) identity: Identity,
    pub(crate) parent: Option<LayerId>,
    pub(crate) props: LayerProps,
    pub(crate) tags: TagSet,
    pub(crate) kind: LayerKind,
    pub(crate) drawer: Drawer,
    pub(crate) hit_drawer: Drawer,
}

impl Layer {
    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// Stored placement. Group geometry is derived by the scene instead.
    pub fn props(&self) -> &LayerProps {
        &self.props
    }

    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn hit_drawer(&self) -> &Drawer {
        &self.hit_drawer
    }

    pub fn children(&self) -> &[LayerId] {
        self.kind.children().unwrap_or(&[])
    }

    pub fn is_container(&self) -> bool {
        self.kind.children().is_some()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    /// Lines and arrows, whose size is a signed end-point offset.
    pub fn is_line(&self) -> bool {
        matches!(self.kind, LayerKind::Line | LayerKind::Arrow(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, LayerKind::Image(_))
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(image) => Some(image),
            _ => None,
        }
    }
}
