//! GutterKit Settings Crate
//!
//! Holds every tunable editor constant in one serde-backed [`EditorConfig`],
//! with validation and TOML/JSON persistence.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, AccessorySettings, EditorConfig, HistorySettings, InteractionSettings,
    PlacementSettings, ResizeSettings, RotationBand, SnapSettings, StockSettings, ViewSettings,
};
pub use error::{SettingsError, SettingsResult};
