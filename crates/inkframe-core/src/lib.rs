//! # Inkframe Core
//!
//! Core types shared by the Inkframe annotation engine.
//! Provides rectangle geometry, color values, stage configuration
//! and the error types used across the workspace.

pub mod bounds;
pub mod color;
pub mod config;
pub mod error;

pub use bounds::{create_bounds, get_bounds, scale_about, set_offset, set_scale, Bounds, Point};
pub use color::Rgba;
pub use config::{ExportFormat, StageConfig};
pub use error::{ColorError, ConfigError, Error, ExportError, Result, SceneError, SceneResult};
