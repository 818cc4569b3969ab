//! Serialization of diagram snapshots.
//!
//! `DiagramData` is the hand-off to whatever persists projects: elements,
//! blueprint placement, groups and the label counter, as JSON. Images are
//! not embedded; elements relink by asset id and the blueprint by its
//! `image_ref`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::model::{Blueprint, Element, Group};

/// Diagram format version
pub const DIAGRAM_FORMAT_VERSION: &str = "1.0";

/// Diagram metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramMetadata {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
}

impl DiagramMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created: now,
            modified: now,
            name: name.into(),
        }
    }
}

impl Default for DiagramMetadata {
    fn default() -> Self {
        Self::new("")
    }
}

/// Complete serializable diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramData {
    pub version: String,
    #[serde(default)]
    pub metadata: DiagramMetadata,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default = "default_next_sequence_id")]
    pub next_sequence_id: u64,
}

fn default_next_sequence_id() -> u64 {
    1
}

impl DiagramData {
    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let mut data: Self = serde_json::from_str(json)?;
        for element in &mut data.elements {
            element.reclassify();
        }
        if data.version != DIAGRAM_FORMAT_VERSION {
            tracing::warn!(
                version = %data.version,
                expected = DIAGRAM_FORMAT_VERSION,
                "diagram format version mismatch"
            );
        }
        Ok(data)
    }

    /// Save to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json().context("Failed to serialize diagram")?;
        std::fs::write(path.as_ref(), json).context("Failed to write diagram file")?;
        Ok(())
    }

    /// Load from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read diagram file")?;
        Self::from_json(&content).context("Failed to parse diagram")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Frame;
    use crate::model::ElementId;

    fn sample() -> DiagramData {
        let mut element = Element::new(
            ElementId(3),
            "GUT-SC-MAR-3M",
            Frame::new(10.0, 20.0, 150.0, 30.0, 30.0),
        );
        element.sequence_id = Some(1);
        element.measured_length_mm = 4200;
        element.color = Some("#ff8800".parse().unwrap());
        DiagramData {
            version: DIAGRAM_FORMAT_VERSION.to_string(),
            metadata: DiagramMetadata::new("Smith St"),
            elements: vec![element],
            blueprint: Some(Blueprint::new("plan.png", 800.0, 600.0)),
            groups: Vec::new(),
            next_sequence_id: 2,
        }
    }

    #[test]
    fn test_json_round_trip_rebuilds_kind_on_load() {
        let data = sample();
        let json = data.to_json().unwrap();
        assert!(json.contains("\"assetId\": \"GUT-SC-MAR-3M\""));
        assert!(json.contains("\"#ff8800\""));
        assert!(!json.contains("\"kind\""));

        let back = DiagramData::from_json(&json).unwrap();
        assert_eq!(back.metadata, data.metadata);
        // kind is not on the wire; it comes back from the asset id
        assert_eq!(back.elements[0].kind, data.elements[0].kind);
        assert_eq!(
            back.elements[0].kind,
            gutterkit_core::AssetKind::from_asset_id("GUT-SC-MAR-3M")
        );
        assert_eq!(back.elements[0].measured_length_mm, 4200);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"version":"1.0","elements":[{"id":1,"assetId":"BRK-SC-MAR","x":0,"y":0,"width":40,"height":40,"rotation":0,"zIndex":0}]}"#;
        let data = DiagramData::from_json(json).unwrap();
        assert_eq!(data.next_sequence_id, 1);
        assert!(data.blueprint.is_none());
        assert_eq!(data.elements[0].base_scale, 1.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.json");
        let data = sample();
        data.save_to_file(&path).unwrap();
        assert_eq!(DiagramData::load_from_file(&path).unwrap(), data);
    }

    #[test]
    fn test_bad_json() {
        let err = DiagramData::from_json("{").unwrap_err();
        assert!(matches!(err, crate::error::DesignerError::Serialization(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let err = DiagramData::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse diagram"));
    }
}
