//! # Inkframe
//!
//! A retained-mode 2D scene graph for annotating screenshots with:
//! - Rectangles, ellipses, polygons, lines, arrows, text and images
//! - Frames and groups for nesting, clipping and moving shapes together
//! - Pixel-accurate hit testing through a hidden identity raster
//! - Drag, wheel-scale and in-place text editing behaviors
//! - PNG/JPEG export, data URLs and clipboard hand-off
//!
//! ## Architecture
//!
//! Inkframe is organized as a workspace with multiple crates:
//!
//! 1. **inkframe-core** - Bounds geometry, colors, stage configuration, errors
//! 2. **inkframe-scene** - Layers, drawers, stage, export, interaction helpers
//! 3. **inkframe-settings** - Persisted user settings (JSON or TOML)
//! 4. **inkframe** - This crate: re-exports, logging setup and the CLI

pub mod cli;

pub use inkframe_core::{
    create_bounds, get_bounds, set_offset, set_scale, Bounds, ConfigError, Error, ExportError,
    ExportFormat, Point, Result, Rgba, SceneError, SceneResult, StageConfig,
};

pub use inkframe_scene::{
    transform, CursorIcon, CursorOptions, DragOptions, Drawer, ExportOptions, Key, Layer,
    LayerBuilder, LayerEvent, LayerEventKind, LayerId, LayerKind, ListenerId, Scene,
    ScaleOptions, Stage, StageEvent, StageEventKind, Teardown, TextAlign, TextEditOptions,
    TextStyle,
};

pub use inkframe_settings::{ExportSettings, InteractionSettings, Settings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Creates a stage for `config` tuned by the interaction settings.
pub fn configured_stage(config: StageConfig, settings: &Settings) -> Result<Stage> {
    let mut stage = Stage::new(config)?;
    stage.set_caret_interval(settings.interaction.caret_interval());
    Ok(stage)
}

/// Wheel scaling with the configured step.
pub fn scale_options(settings: &Settings) -> ScaleOptions {
    ScaleOptions {
        step: settings.interaction.scale_step,
    }
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tuned() -> Settings {
        let mut settings = Settings::default();
        settings.interaction.scale_step = 0.25;
        settings.interaction.caret_blink_ms = 300;
        settings
    }

    #[test]
    fn test_configured_stage_uses_caret_blink() {
        let settings = tuned();
        let stage = configured_stage(StageConfig::new(40, 40), &settings).unwrap();
        assert_eq!(stage.caret_interval(), Duration::from_millis(300));
    }

    #[test]
    fn test_wheel_uses_configured_step() {
        let settings = tuned();
        let mut stage = configured_stage(StageConfig::new(40, 40), &settings).unwrap();
        let rect = stage
            .add(LayerBuilder::rect(5.0, 5.0, 20.0, 20.0).fill(Rgba::RED))
            .unwrap();
        stage.render();
        let _teardown = transform::scalable(&mut stage, rect, scale_options(&settings)).unwrap();
        stage.wheel(15.0, 15.0, -1.0);
        assert_eq!(stage.scene().scale(rect).unwrap(), 1.25);
    }
}
