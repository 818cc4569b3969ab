//! Diagram snapshot hand-off for editor state.
//!
//! No I/O happens here; the host persists `DiagramData` however it likes.

use chrono::Utc;

use super::EditorState;
use crate::document::Document;
use crate::serialization::{DiagramData, DIAGRAM_FORMAT_VERSION};

impl EditorState {
    /// Snapshot the diagram for persistence.
    pub fn to_diagram(&self) -> DiagramData {
        let mut metadata = self.metadata.clone();
        metadata.modified = Utc::now();
        DiagramData {
            version: DIAGRAM_FORMAT_VERSION.to_string(),
            metadata,
            elements: self.document.elements().to_vec(),
            blueprint: self.document.blueprint().cloned(),
            groups: self.document.groups().to_vec(),
            next_sequence_id: self.document.next_sequence_id(),
        }
    }

    /// Replace the document with a stored diagram.
    ///
    /// Kinds are re-derived from asset ids, geometry is clamped to the
    /// configured floors and the sequence counter resumes past every stored
    /// id. Both history streams and the selection are cleared. Images are
    /// relinked from the cache; missing ones are logged, not fatal.
    pub fn load_diagram(&mut self, data: DiagramData) {
        let mut blueprint = data.blueprint;
        if let Some(blueprint) = blueprint.as_mut() {
            let frame = blueprint
                .frame()
                .sanitized(self.config.resize.blueprint_min_dimension);
            blueprint.set_frame(frame);
            blueprint.set_opacity(blueprint.opacity);
        }
        self.document = Document::from_parts(
            data.elements,
            blueprint,
            data.groups,
            data.next_sequence_id,
            self.config.resize.min_dimension,
        );
        self.metadata = data.metadata;
        self.history.clear();
        tracing::info!(
            id = %self.metadata.id,
            elements = self.document.len(),
            "diagram loaded"
        );
        self.after_restore();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Point;
    use gutterkit_core::AssetKind;
    use image::RgbaImage;

    #[test]
    fn test_diagram_round_trip_resumes_counters() {
        let mut editor = EditorState::default();
        let gutter = editor.place_loaded(
            "GUT-CL-MAR-5M",
            AssetKind::from_asset_id("GUT-CL-MAR-5M"),
            Arc::new(RgbaImage::new(500, 20)),
            Point::new(0.0, 0.0),
        );
        editor.set_measured_length(gutter, 6400);
        let data = editor.to_diagram();
        let json = data.to_json().unwrap();

        let mut restored = EditorState::default();
        restored.load_diagram(DiagramData::from_json(&json).unwrap());
        assert_eq!(restored.document().len(), 1);
        let element = &restored.document().elements()[0];
        assert!(element.is_measurable());
        assert_eq!(element.measured_length_mm, 6400);
        assert!(!restored.can_undo());
        assert_eq!(restored.metadata().id, editor.metadata().id);

        let next = restored.place_loaded(
            "DP-80-3M",
            AssetKind::from_asset_id("DP-80-3M"),
            Arc::new(RgbaImage::new(20, 300)),
            Point::new(900.0, 900.0),
        );
        assert!(restored.document().element(next).unwrap().sequence_id > element_sequence(&restored, gutter));
    }

    fn element_sequence(editor: &EditorState, id: crate::model::ElementId) -> Option<u64> {
        editor.document().element(id).and_then(|e| e.sequence_id)
    }

    #[test]
    fn test_load_clamps_bad_geometry() {
        let json = r#"{"version":"1.0","elements":[{"id":4,"assetId":"BRK-SC-MAR","x":0,"y":0,"width":2,"height":-5,"rotation":0,"zIndex":0}],"nextSequenceId":1}"#;
        let mut editor = EditorState::default();
        editor.load_diagram(DiagramData::from_json(json).unwrap());
        let element = &editor.document().elements()[0];
        assert_eq!(element.width, 20.0);
        assert_eq!(element.height, 20.0);
    }
}
