//! Material take-off for editor state.

use super::EditorState;
use gutterkit_takeoff::{expand_with_accessories, MaterialLine, Takeoff, TakeoffItem};

impl EditorState {
    /// One take-off item per element, in document order.
    pub fn takeoff_items(&self) -> Vec<TakeoffItem> {
        self.document
            .elements()
            .iter()
            .map(|e| TakeoffItem {
                asset_id: e.asset_id.clone(),
                kind: e.kind,
                measured_length_mm: e.measured_length_mm,
            })
            .collect()
    }

    /// Material lines for the quote, using the configured stock lengths.
    pub fn material_lines(&self) -> gutterkit_takeoff::Result<Vec<MaterialLine>> {
        Takeoff::from_settings(&self.config.stock)?.material_lines(&self.takeoff_items())
    }

    /// Material lines plus inferred brackets, clips and screws.
    pub fn material_lines_with_accessories(&self) -> gutterkit_takeoff::Result<Vec<MaterialLine>> {
        let lines = self.material_lines()?;
        Ok(expand_with_accessories(&lines, &self.config.accessories))
    }
}
