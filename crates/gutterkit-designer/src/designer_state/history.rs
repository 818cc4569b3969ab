//! Undo/redo on the element and blueprint streams.

use super::EditorState;
use crate::document::DocumentSnapshot;
use crate::interaction::{CursorIcon, InteractionMode};

impl EditorState {
    pub fn can_undo(&self) -> bool {
        self.history.elements.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.elements.can_redo()
    }

    pub fn can_undo_blueprint(&self) -> bool {
        self.history.blueprint.can_undo()
    }

    pub fn can_redo_blueprint(&self) -> bool {
        self.history.blueprint.can_redo()
    }

    /// Step the element stream back.
    pub fn undo(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self.history.elements.undo(self.document.snapshot()) else {
            return false;
        };
        self.restore_elements(snapshot);
        true
    }

    /// Step the element stream forward.
    pub fn redo(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self.history.elements.redo(self.document.snapshot()) else {
            return false;
        };
        self.restore_elements(snapshot);
        true
    }

    /// Step the blueprint stream back: position, size, rotation, opacity, lock.
    pub fn undo_blueprint(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self
            .history
            .blueprint
            .undo(self.document.blueprint_snapshot())
        else {
            return false;
        };
        self.document.restore_blueprint(snapshot);
        self.after_restore();
        true
    }

    pub fn redo_blueprint(&mut self) -> bool {
        self.abandon_interaction();
        let Some(snapshot) = self
            .history
            .blueprint
            .redo(self.document.blueprint_snapshot())
        else {
            return false;
        };
        self.document.restore_blueprint(snapshot);
        self.after_restore();
        true
    }

    /// Swap in an element-stream snapshot. When the blueprint image comes
    /// or goes, the blueprint stream belongs to another image and is dropped.
    fn restore_elements(&mut self, snapshot: DocumentSnapshot) {
        let before = self.blueprint_image_ref();
        self.document.restore(snapshot);
        if self.blueprint_image_ref() != before {
            self.history.blueprint.clear();
        }
        self.after_restore();
    }

    fn blueprint_image_ref(&self) -> Option<String> {
        self.document.blueprint().map(|b| b.image_ref.clone())
    }

    /// A restore never continues an interaction
    fn abandon_interaction(&mut self) {
        if !self.mode.is_idle() {
            self.cancel_interaction();
        }
    }

    /// Reset transient state after the document was swapped and check that
    /// every image can be relinked from the cache.
    pub(crate) fn after_restore(&mut self) {
        self.selection.clear();
        self.mode = InteractionMode::Idle;
        self.hover = None;
        self.cursor = CursorIcon::Default;
        self.warn_missing_images();
        self.content_changed();
    }

    /// Log every asset id or blueprint image the cache cannot supply
    pub(crate) fn warn_missing_images(&self) {
        let mut missing: Vec<&str> = self
            .document
            .elements()
            .iter()
            .map(|e| e.asset_id.as_str())
            .filter(|id| !self.images.contains(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        for asset_id in missing {
            tracing::warn!(asset_id, "no image loaded for element asset");
        }
        if let Some(blueprint) = self.document.blueprint() {
            if !self.images.contains(&blueprint.image_ref) {
                tracing::warn!(image_ref = %blueprint.image_ref, "no image loaded for blueprint");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Point;
    use gutterkit_core::AssetKind;
    use image::RgbaImage;

    fn place(editor: &mut EditorState, x: f64) -> crate::model::ElementId {
        editor.place_loaded(
            "BRK-SC-MAR",
            AssetKind::from_asset_id("BRK-SC-MAR"),
            Arc::new(RgbaImage::new(40, 40)),
            Point::new(x, 0.0),
        )
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut editor = EditorState::default();
        let before = editor.document().snapshot();
        place(&mut editor, 0.0);
        let after = editor.document().snapshot();

        assert!(editor.undo());
        assert_eq!(editor.document().elements(), before.elements.as_slice());
        assert!(editor.selection().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.document().snapshot(), after);
        assert!(!editor.redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut editor = EditorState::default();
        place(&mut editor, 0.0);
        assert!(editor.undo());
        assert!(editor.can_redo());
        place(&mut editor, 500.0);
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_blueprint_stream_is_separate() {
        let mut editor = EditorState::default();
        editor.set_blueprint("plan.png", Arc::new(RgbaImage::new(400, 300)));
        place(&mut editor, 1000.0);
        assert!(editor.set_blueprint_opacity(0.5));

        // element undo leaves the blueprint's own changes alone
        assert!(editor.undo());
        assert_eq!(editor.document().blueprint().unwrap().opacity, 0.5);
        assert!(editor.document().is_empty());

        assert!(editor.undo_blueprint());
        assert_eq!(editor.document().blueprint().unwrap().opacity, 1.0);
        assert!(!editor.can_undo_blueprint());
        assert!(editor.redo_blueprint());
        assert_eq!(editor.document().blueprint().unwrap().opacity, 0.5);
    }

    #[test]
    fn test_replacing_blueprint_drops_its_transform_history() {
        let mut editor = EditorState::default();
        editor.set_blueprint("a.png", Arc::new(RgbaImage::new(400, 300)));
        assert!(editor.set_blueprint_opacity(0.5));
        editor.set_blueprint("b.png", Arc::new(RgbaImage::new(400, 300)));

        assert!(!editor.can_undo_blueprint());
        assert!(!editor.undo_blueprint());
        assert_eq!(editor.document().blueprint().unwrap().image_ref, "b.png");

        // the element stream still brings the old image back wholesale
        assert!(editor.undo());
        assert_eq!(editor.document().blueprint().unwrap().image_ref, "a.png");
        assert!(!editor.undo_blueprint());
        assert_eq!(editor.document().blueprint().unwrap().image_ref, "a.png");
    }

    #[test]
    fn test_removed_blueprint_stays_removed_on_blueprint_undo() {
        let mut editor = EditorState::default();
        editor.set_blueprint("a.png", Arc::new(RgbaImage::new(400, 300)));
        assert!(editor.set_blueprint_opacity(0.5));
        assert!(editor.remove_blueprint());

        assert!(!editor.undo_blueprint());
        assert!(editor.document().blueprint().is_none());

        assert!(editor.undo());
        assert!(editor.document().blueprint().is_some());
        assert!(!editor.can_undo_blueprint());
    }

    #[test]
    fn test_sequence_ids_survive_undo() {
        let mut editor = EditorState::default();
        let gutter = |editor: &mut EditorState| {
            editor.place_loaded(
                "GUT-SC-MAR-3M",
                AssetKind::from_asset_id("GUT-SC-MAR-3M"),
                Arc::new(RgbaImage::new(300, 30)),
                Point::new(0.0, 0.0),
            )
        };
        let first = gutter(&mut editor);
        let first_seq = editor.document().element(first).unwrap().sequence_id;
        assert!(editor.undo());
        let second = gutter(&mut editor);
        assert_ne!(editor.document().element(second).unwrap().sequence_id, first_seq);
    }
}
