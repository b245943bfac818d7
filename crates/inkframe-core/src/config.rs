//! Stage construction settings shared by the engine and the settings crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Rgba;
use crate::error::ConfigError;

/// How a stage is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Logical width in CSS-style pixels
    pub width: u32,
    /// Logical height in CSS-style pixels
    pub height: u32,
    /// Device pixels per logical pixel for the visible surface
    pub pixel_ratio: f32,
    /// Fill used before each frame when the stage is opaque
    pub background: Rgba,
    /// Clear to transparent instead of filling with `background`
    pub transparent: bool,
    /// Allocate the identity surface and decode pointer hits
    pub interactive: bool,
    /// Spread identity colors and outline layer bounds
    pub debug: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            pixel_ratio: 1.0,
            background: Rgba::WHITE,
            transparent: false,
            interactive: true,
            debug: false,
        }
    }
}

impl StageConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Size of the visible surface in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).ceil() as u32,
            (self.height as f32 * self.pixel_ratio).ceil() as u32,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                key: "stage.size",
                reason: "width and height must be > 0".to_string(),
            });
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid {
                key: "stage.pixel_ratio",
                reason: format!("must be a positive number, got {}", self.pixel_ratio),
            });
        }
        Ok(())
    }
}

/// Encoded image format for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(ConfigError::Invalid {
                key: "export.format",
                reason: format!("unknown format {}", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_size_rounds_up() {
        let config = StageConfig::new(101, 50).with_pixel_ratio(1.5);
        assert_eq!(config.device_size(), (152, 75));
    }

    #[test]
    fn test_validate_rejects_zero_ratio() {
        let config = StageConfig::new(10, 10).with_pixel_ratio(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_uses_color_strings() {
        let config = StageConfig::new(10, 20).with_background(Rgba::RED);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"#ff0000\""));
        let back: StageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
