//! Inkframe Settings Crate
//!
//! Loads, validates and saves the user's stage defaults, interaction tuning
//! and export preferences.

pub mod config;

pub use config::{ExportSettings, InteractionSettings, Settings};
