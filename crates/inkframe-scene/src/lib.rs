//! # Inkframe Scene
//!
//! Retained-mode 2D scene graph for drawing and editing annotation shapes
//! on top of a captured image.
//!
//! ## Core Components
//!
//! - **Scene**: layer arena, container tree, identities and bubbling events
//! - **Layers**: frames and groups (containers); rects, ellipses, polygons,
//!   lines, arrows, text and images (leaves)
//! - **Drawers**: per-layer fill/stroke painting, run once per render pass
//! - **Stage**: visible surface, identity surface, pointer pipeline, animation
//!   loop and export
//! - **Transform**: drag, wheel-scale, in-place text editing and cursor feedback
//!
//! ## Hit testing
//!
//! Every frame is painted twice. The visible pass uses each layer's own
//! drawer. The identity pass repaints the same tree without anti-aliasing,
//! filling each layer with a flat color that encodes its identity. A pointer
//! hit is a single pixel read followed by a table lookup:
//!
//! ```text
//! Stage
//!   ├── surface           (device pixels, anti-aliased)
//!   └── identity surface  (logical pixels, one color per layer)
//!         └── pixel (x, y) -> identity -> LayerId
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use inkframe_core::{Rgba, StageConfig};
//! use inkframe_scene::{LayerBuilder, Stage};
//!
//! let mut stage = Stage::new(StageConfig::new(200, 100)).unwrap();
//! let rect = stage
//!     .add(LayerBuilder::rect(20.0, 20.0, 40.0, 30.0).fill(Rgba::RED))
//!     .unwrap();
//! stage.render();
//! assert_eq!(stage.hit_test(30.0, 30.0), Some(rect));
//! ```

pub mod drawer;
pub mod events;
pub mod identity;
pub mod image_cache;
pub mod layer;
pub mod render;
pub mod scene;
pub mod stage;
pub mod text;
pub mod transform;

pub use drawer::Drawer;
pub use events::{LayerEvent, LayerEventKind, ListenerId, StageEvent, StageEventKind};
pub use identity::{Identity, IdentityCodec};
pub use image_cache::{ImageCache, ImageState};
pub use layer::{Layer, LayerBuilder, LayerId, LayerKind, LayerProps, GROUP_TAG, ROOT_TAG};
pub use scene::Scene;
pub use stage::input::{CursorIcon, Key, TextInput};
pub use stage::{ExportOptions, Stage};
pub use text::{TextAlign, TextLayout, TextStyle};
pub use transform::{CursorOptions, DragOptions, ScaleOptions, TextEditOptions, Teardown};
