//! Editor configuration
//!
//! Every threshold the editor consults (snapping, resize floors, rotation
//! bands, history depth, zoom limits, stock lengths) lives here so a host can
//! ship a tuned config file without recompiling.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Grid, alignment and rotation snapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Grid step in world units
    pub grid_step: f64,
    /// Round move commits and placements to the grid
    pub grid_snap_enabled: bool,
    /// Alignment guide capture distance in world units
    pub alignment_threshold: f64,
    /// Coarse rotation step used while shift is held
    pub rotation_step_deg: f64,
    /// Magnetic pull distance toward 0/90/180/270
    pub rotation_magnetic_deg: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid_step: 10.0,
            grid_snap_enabled: true,
            alignment_threshold: 5.0,
            rotation_step_deg: 15.0,
            rotation_magnetic_deg: 8.0,
        }
    }
}

/// Resize floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSettings {
    /// Minimum element width and height
    pub min_dimension: f64,
    /// Minimum blueprint width and height
    pub blueprint_min_dimension: f64,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            min_dimension: 20.0,
            blueprint_min_dimension: 40.0,
        }
    }
}

/// Angular range an asset kind may never rest inside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationBand {
    /// Asset kind key, e.g. `gutter`
    pub kind: String,
    /// Lower boundary in degrees, normalized to (-180, 180]
    pub min_deg: f64,
    /// Upper boundary in degrees
    pub max_deg: f64,
}

impl RotationBand {
    /// Midpoint used to pick the nearer boundary
    pub fn midpoint(&self) -> f64 {
        (self.min_deg + self.max_deg) / 2.0
    }

    /// Strictly inside the band; the boundaries themselves are allowed
    pub fn contains(&self, normalized_deg: f64) -> bool {
        normalized_deg > self.min_deg && normalized_deg < self.max_deg
    }
}

fn default_rotation_bands() -> Vec<RotationBand> {
    vec![RotationBand {
        kind: "gutter".to_string(),
        min_deg: 60.0,
        max_deg: 80.0,
    }]
}

/// Undo history depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum snapshots kept per stream; the oldest is dropped first
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

/// View fitting and zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Padding around content when fitting the view, in display pixels
    pub fit_padding: f64,
    /// How far content may be panned away from the viewport edge
    pub view_pad: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier per wheel notch (scroll down zooms out)
    pub wheel_zoom_factor: f64,
    /// Multiplier for zoom in/out buttons
    pub button_zoom_factor: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fit_padding: 20.0,
            view_pad: 48.0,
            min_zoom: 0.15,
            max_zoom: 4.0,
            wheel_zoom_factor: 0.92,
            button_zoom_factor: 1.25,
        }
    }
}

/// Handle geometry and pointer tolerances, in display pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub handle_proximity_px: f64,
    pub rotate_handle_proximity_px: f64,
    /// Length of the stem between the top edge and the rotate handle
    pub rotate_handle_offset_px: f64,
    /// Gap between an element and its selection outline
    pub visual_padding_px: f64,
    pub blueprint_handle_size_px: f64,
    /// Quiet period before the view refits after edits
    pub bbox_debounce_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            handle_proximity_px: 10.0,
            rotate_handle_proximity_px: 20.0,
            rotate_handle_offset_px: 40.0,
            visual_padding_px: 10.0,
            blueprint_handle_size_px: 8.0,
            bbox_debounce_ms: 100,
        }
    }
}

/// Drop, duplicate and nudge behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Longest side of a freshly dropped element
    pub max_unit: f64,
    /// Shortest side of a freshly dropped element
    pub min_unit: f64,
    /// Offset applied to duplicates on both axes
    pub duplicate_offset: f64,
    /// Bounding boxes closer than this count as overlapping
    pub overlap_gap: f64,
    /// Candidate positions tried before giving up on overlap avoidance
    pub retry_budget: usize,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            max_unit: 150.0,
            min_unit: 20.0,
            duplicate_offset: 20.0,
            overlap_gap: 2.0,
            retry_budget: 160,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
        }
    }
}

/// Purchasable stock lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSettings {
    pub gutter_lengths_mm: Vec<u32>,
    pub downpipe_lengths_mm: Vec<u32>,
}

impl Default for StockSettings {
    fn default() -> Self {
        Self {
            gutter_lengths_mm: vec![5000, 3000, 1500],
            downpipe_lengths_mm: vec![3000, 1500],
        }
    }
}

/// Accessory quantity rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorySettings {
    /// One bracket per this many millimetres of gutter, plus one
    pub bracket_spacing_mm: u32,
    pub screws_per_bracket: u32,
    /// One clip per this many millimetres of downpipe, at least one
    pub clip_spacing_mm: u32,
    pub screws_per_clip: u32,
    pub screws_per_dropper: u32,
}

impl Default for AccessorySettings {
    fn default() -> Self {
        Self {
            bracket_spacing_mm: 400,
            screws_per_bracket: 3,
            clip_spacing_mm: 1200,
            screws_per_clip: 2,
            screws_per_dropper: 4,
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub resize: ResizeSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub stock: StockSettings,
    #[serde(default)]
    pub accessories: AccessorySettings,
    #[serde(default = "default_rotation_bands")]
    pub rotation_bands: Vec<RotationBand>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            resize: ResizeSettings::default(),
            history: HistorySettings::default(),
            view: ViewSettings::default(),
            interaction: InteractionSettings::default(),
            placement: PlacementSettings::default(),
            stock: StockSettings::default(),
            accessories: AccessorySettings::default(),
            rotation_bands: default_rotation_bands(),
        }
    }
}

/// Default location of the editor config file
///
/// Resolves to `<config_dir>/gutterkit/editor.toml`, falling back to the
/// home directory when the platform has no config directory.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| SettingsError::ConfigDirectory("no config or home directory".into()))?;
    path.push("gutterkit");
    path.push("editor.toml");
    Ok(path)
}

enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Rotation band for an asset kind key
    pub fn rotation_band(&self, kind: &str) -> Option<&RotationBand> {
        self.rotation_bands.iter().find(|band| band.kind == kind)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.snap.grid_step > 0.0) {
            return Err(SettingsError::invalid("snap.grid_step", "must be > 0"));
        }
        if self.snap.alignment_threshold < 0.0 {
            return Err(SettingsError::invalid(
                "snap.alignment_threshold",
                "must not be negative",
            ));
        }
        if !(self.snap.rotation_step_deg > 0.0) {
            return Err(SettingsError::invalid(
                "snap.rotation_step_deg",
                "must be > 0",
            ));
        }
        if !(self.resize.min_dimension > 0.0) || !(self.resize.blueprint_min_dimension > 0.0) {
            return Err(SettingsError::invalid("resize", "minimum dimensions must be > 0"));
        }
        if self.history.max_depth == 0 {
            return Err(SettingsError::invalid("history.max_depth", "must be > 0"));
        }
        if !(self.view.min_zoom > 0.0) || self.view.min_zoom >= self.view.max_zoom {
            return Err(SettingsError::invalid(
                "view.min_zoom",
                "must be > 0 and below view.max_zoom",
            ));
        }
        if !(self.view.wheel_zoom_factor > 0.0) || !(self.view.button_zoom_factor > 0.0) {
            return Err(SettingsError::invalid("view", "zoom factors must be > 0"));
        }
        if self.placement.max_unit < self.placement.min_unit || !(self.placement.min_unit > 0.0) {
            return Err(SettingsError::invalid(
                "placement.max_unit",
                "must be >= placement.min_unit > 0",
            ));
        }
        for band in &self.rotation_bands {
            if band.min_deg >= band.max_deg {
                return Err(SettingsError::invalid(
                    "rotation_bands",
                    format!("band '{}' has min >= max", band.kind),
                ));
            }
        }
        for (key, lengths) in [
            ("stock.gutter_lengths_mm", &self.stock.gutter_lengths_mm),
            ("stock.downpipe_lengths_mm", &self.stock.downpipe_lengths_mm),
        ] {
            if lengths.is_empty() || lengths.contains(&0) {
                return Err(SettingsError::invalid(key, "must be non-empty and > 0"));
            }
        }
        if self.accessories.bracket_spacing_mm == 0 || self.accessories.clip_spacing_mm == 0 {
            return Err(SettingsError::invalid(
                "accessories",
                "spacings must be > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history.max_depth, 50);
        assert_eq!(config.stock.gutter_lengths_mm, vec![5000, 3000, 1500]);
    }

    #[test]
    fn test_rotation_band_lookup() {
        let config = EditorConfig::default();
        let band = config.rotation_band("gutter").unwrap();
        assert_eq!(band.midpoint(), 70.0);
        assert!(band.contains(65.0));
        assert!(!band.contains(60.0));
        assert!(!band.contains(80.0));
        assert!(config.rotation_band("downpipe").is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EditorConfig::default();
        config.snap.grid_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.view.min_zoom = 5.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.stock.downpipe_lengths_mm.clear();
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.rotation_bands[0].min_deg = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EditorConfig = toml::from_str("[snap]\ngrid_step = 25.0\n").unwrap();
        assert_eq!(config.snap.grid_step, 25.0);
        assert_eq!(config.snap.alignment_threshold, 5.0);
        assert_eq!(config.rotation_bands.len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EditorConfig::default()
            .save_to_file(Path::new("editor.yaml"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
    }
}
