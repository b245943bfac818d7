//! Settings file handling for Inkframe
//!
//! Settings are stored as JSON or TOML (picked by file extension) in the
//! platform config directory. They are organized into sections:
//! - Stage defaults (size, pixel ratio, background, interactivity)
//! - Interaction tuning (wheel scale step, caret blink)
//! - Export preferences (format, JPEG quality)

use inkframe_core::{ConfigError, ExportFormat, Result, StageConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "inkframe";
const SETTINGS_FILE: &str = "settings.toml";

/// Interaction behavior tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Scale change per wheel notch
    pub scale_step: f32,
    /// Caret blink half-period in milliseconds
    pub caret_blink_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            scale_step: 0.1,
            caret_blink_ms: 500,
        }
    }
}

impl InteractionSettings {
    pub fn caret_interval(&self) -> Duration {
        Duration::from_millis(self.caret_blink_ms)
    }
}

/// Export preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// 1-100
    pub jpeg_quality: u8,
    /// Also place exports on the clipboard
    pub copy_to_clipboard: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 90,
            copy_to_clipboard: false,
        }
    }
}

/// Complete user settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stage: StageConfig,
    pub interaction: InteractionSettings,
    pub export: ExportSettings,
}

enum FileFormat {
    Json,
    Toml,
}

fn file_format(path: &Path) -> std::result::Result<FileFormat, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("toml") => Ok(FileFormat::Toml),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

fn parse_error(path: &Path, reason: impl ToString) -> ConfigError {
    ConfigError::Parse {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/inkframe/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load settings from a JSON or TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = file_format(path)?;
        let content = std::fs::read_to_string(path)?;
        let settings: Self = match format {
            FileFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_error(path, e))?
            }
            FileFormat::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e))?,
        };
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Loads from the default path, falling back to defaults when the file
    /// is missing or invalid.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON or TOML file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = match file_format(path)? {
            FileFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| parse_error(path, e))?
            }
            FileFormat::Toml => toml::to_string_pretty(self).map_err(|e| parse_error(path, e))?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.stage.validate()?;

        if !(self.interaction.scale_step.is_finite() && self.interaction.scale_step > 0.0) {
            return Err(ConfigError::Invalid {
                key: "interaction.scale_step",
                reason: format!("must be > 0, got {}", self.interaction.scale_step),
            });
        }
        if self.interaction.caret_blink_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "interaction.caret_blink_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(ConfigError::Invalid {
                key: "export.jpeg_quality",
                reason: format!("must be within 1-100, got {}", self.export.jpeg_quality),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_quality() {
        let mut settings = Settings::default();
        settings.export.jpeg_quality = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid {
                key: "export.jpeg_quality",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_negative_scale_step() {
        let mut settings = Settings::default();
        settings.interaction.scale_step = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            file_format(Path::new("settings.yaml")),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_default_path_is_under_app_dir() {
        if let Some(path) = Settings::default_path() {
            assert!(path.ends_with("inkframe/settings.toml"));
        }
    }
}
