//! Layer and z-order management
//!
//! Elements and the blueprint share one z axis. The blueprint starts on the
//! sentinel layer below every new element, but elements can be sent beneath
//! it.

use crate::document::Document;
use crate::model::ElementId;
use crate::selection_manager::expand_groups;
use gutterkit_core::constants::BLUEPRINT_Z_INDEX;

/// One entry of the paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Blueprint,
    Element(ElementId),
}

/// Targets expanded to whole groups, ordered bottom to top
fn stacked_targets(doc: &Document, ids: &[ElementId]) -> Vec<(ElementId, i32)> {
    let mut targets: Vec<(ElementId, i32)> = expand_groups(doc, ids)
        .into_iter()
        .filter_map(|id| doc.element(id).map(|e| (id, e.z_index)))
        .collect();
    targets.sort_by_key(|&(_, z)| z);
    targets
}

/// Raise elements (and their groups) above everything else
///
/// Members keep their relative order. Returns `false` when nothing matched.
pub fn bring_to_front(doc: &mut Document, ids: &[ElementId]) -> bool {
    let targets = stacked_targets(doc, ids);
    if targets.is_empty() {
        return false;
    }
    let top = doc
        .elements()
        .iter()
        .map(|e| e.z_index)
        .fold(BLUEPRINT_Z_INDEX, i32::max);
    let updates: Vec<(ElementId, i32)> = targets
        .iter()
        .zip(1..)
        .map(|(&(id, _), step)| (id, top + step))
        .collect();
    doc.set_z_indices(&updates);
    tracing::debug!(count = updates.len(), "brought to front");
    true
}

/// Lower elements (and their groups) below everything else
pub fn send_to_back(doc: &mut Document, ids: &[ElementId]) -> bool {
    let targets = stacked_targets(doc, ids);
    if targets.is_empty() {
        return false;
    }
    let floor = doc.blueprint().map_or(0, |b| b.z_index);
    let bottom = doc
        .elements()
        .iter()
        .map(|e| e.z_index)
        .fold(floor, i32::min);
    let count = targets.len() as i32;
    let updates: Vec<(ElementId, i32)> = targets
        .iter()
        .zip(0..)
        .map(|(&(id, _), step)| (id, bottom - count + step))
        .collect();
    doc.set_z_indices(&updates);
    tracing::debug!(count = updates.len(), "sent to back");
    true
}

/// Paint order, lowest z first; the blueprint paints first on ties
pub fn draw_order(doc: &Document) -> Vec<Layer> {
    let mut layers: Vec<(i32, u8, Layer)> = doc
        .elements()
        .iter()
        .map(|e| (e.z_index, 1, Layer::Element(e.id)))
        .collect();
    if let Some(blueprint) = doc.blueprint() {
        layers.push((blueprint.z_index, 0, Layer::Blueprint));
    }
    // Stable sort keeps document order among equal z.
    layers.sort_by_key(|&(z, rank, _)| (z, rank));
    layers.into_iter().map(|(_, _, layer)| layer).collect()
}
