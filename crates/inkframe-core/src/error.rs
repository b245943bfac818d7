//! Error handling for Inkframe
//!
//! Provides the error types for every layer of the engine:
//! - Color errors (parsing style values)
//! - Scene errors (contract violations by the embedding application)
//! - Export errors (encoding and clipboard hand-off)
//! - Config errors (loading and validating settings)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Color parsing error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// The string is not a recognized color
    #[error("Invalid color: {0}")]
    Invalid(String),
}

/// Scene error type
///
/// Every variant is a contract violation by the caller: the engine refuses
/// the operation and leaves the scene untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The layer id does not refer to a live layer
    #[error("Layer not found: {layer}")]
    LayerNotFound {
        /// Debug rendering of the missing id.
        layer: String,
    },

    /// A group's extent is derived from its children
    #[error("Cannot set {property} on a group layer")]
    IllegalGroupMutation {
        /// The property the caller tried to assign.
        property: &'static str,
    },

    /// Interaction helpers need the identity surface
    #[error("Stage is not interactive")]
    NotInteractive,

    /// Right alignment is measured against the maximum width
    #[error("Right-aligned text requires a max width")]
    RightAlignWithoutMaxWidth,

    /// Children can only be added to frames and groups
    #[error("Layer {layer} is not a container")]
    NotAContainer {
        /// Debug rendering of the offending id.
        layer: String,
    },

    /// The operation needs a text layer
    #[error("Layer {layer} is not a text layer")]
    NotATextLayer {
        /// Debug rendering of the offending id.
        layer: String,
    },

    /// The operation needs a line or arrow layer
    #[error("Layer {layer} is not a line layer")]
    NotALineLayer {
        /// Debug rendering of the offending id.
        layer: String,
    },

    /// The operation needs an image layer
    #[error("Layer {layer} is not an image layer")]
    NotAnImageLayer {
        /// Debug rendering of the offending id.
        layer: String,
    },

    /// Adding the child would make a layer its own ancestor
    #[error("Adding {child} under {parent} would create a cycle")]
    Cycle {
        /// The prospective parent.
        parent: String,
        /// The prospective child.
        child: String,
    },

    /// A drawing mode string was not recognized
    #[error("Unknown drawing mode: {0}")]
    UnknownMode(String),

    /// The stage surface cannot be allocated at this size
    #[error("Invalid surface size {width}x{height}")]
    InvalidSurface {
        /// Requested width in device pixels.
        width: u32,
        /// Requested height in device pixels.
        height: u32,
    },

    /// Too many live layers to encode in 24 bits
    #[error("Identity space exhausted")]
    IdentityExhausted,
}

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// The crop rectangle does not intersect the surface
    #[error("Crop rectangle is empty or outside the surface")]
    EmptyCrop,

    /// Image encoding failed
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Clipboard access failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Configuration error type
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// A value is out of range
    #[error("Invalid setting {key}: {reason}")]
    Invalid {
        /// The setting name.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The file could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// The file path.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// Unsupported file extension
    #[error("Settings file must be .json or .toml")]
    UnsupportedFormat,
}

/// Main error type for Inkframe
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Color error
    #[error(transparent)]
    Color(#[from] ColorError),

    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a scene contract violation
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for scene operations
pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_converts() {
        let err: Error = SceneError::NotInteractive.into();
        assert!(err.is_scene_error());
        assert_eq!(err.to_string(), "Stage is not interactive");
    }

    #[test]
    fn test_group_error_message() {
        let err = SceneError::IllegalGroupMutation { property: "scale" };
        assert_eq!(err.to_string(), "Cannot set scale on a group layer");
    }
}
