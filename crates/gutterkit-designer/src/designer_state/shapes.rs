//! Element operations (place, duplicate, delete, nudge, group, restyle) and
//! blueprint management for editor state.

use std::sync::Arc;

use super::EditorState;
use crate::catalog::AssetCatalog;
use crate::error::Result;
use crate::geometry::{Bounds, Frame, Point};
use crate::layers;
use crate::model::{Blueprint, Element, ElementId, GroupId};
use crate::selection_manager::{elements_to_move, expand_groups};
use crate::snapping::{nudge_clear_of, snap_to_grid};
use gutterkit_core::{AssetKind, Color};
use image::RgbaImage;

impl EditorState {
    /// Load an asset's image and drop a new element centred on `drop` (world).
    ///
    /// The image is resolved before anything else happens, so a failed load
    /// returns the catalog's error and leaves the document, selection and
    /// history exactly as they were.
    pub async fn place_asset<C>(&mut self, catalog: &C, asset_id: &str, drop: Point) -> Result<ElementId>
    where
        C: AssetCatalog + ?Sized,
    {
        let image = catalog.load_image(asset_id).await.inspect_err(|e| {
            tracing::warn!(asset_id, error = %e, "asset image failed to load");
        })?;
        let kind = catalog.classify(asset_id);
        Ok(self.place_loaded(asset_id, kind, image, drop))
    }

    /// Drop an element for an already loaded image.
    ///
    /// The image is scaled to fit `max_unit` on its longer side (never below
    /// `min_unit`), linear parts get their default rotation, the top-left is
    /// snapped to the grid and the frame is nudged clear of existing
    /// elements. The new element becomes the selection.
    pub fn place_loaded(
        &mut self,
        asset_id: &str,
        kind: AssetKind,
        image: Arc<RgbaImage>,
        drop: Point,
    ) -> ElementId {
        let placement = &self.config.placement;
        let (natural_w, natural_h) = match image.dimensions() {
            (0, _) | (_, 0) => (placement.max_unit, placement.max_unit),
            (w, h) => (f64::from(w), f64::from(h)),
        };
        let base_scale = (placement.max_unit / natural_w).min(placement.max_unit / natural_h);
        let width = (natural_w * base_scale).max(placement.min_unit).round();
        let height = (natural_h * base_scale).max(placement.min_unit).round();
        let rotation = if kind.is_linear() {
            kind.default_rotation()
        } else {
            0.0
        };

        let snap = &self.config.snap;
        let mut x = drop.x - width / 2.0;
        let mut y = drop.y - height / 2.0;
        if snap.grid_snap_enabled {
            x = snap_to_grid(x, snap.grid_step);
            y = snap_to_grid(y, snap.grid_step);
        }
        let occupied: Vec<Bounds> = self.document.elements().iter().map(Element::bounds).collect();
        let frame = nudge_clear_of(
            Frame::new(x, y, width, height, rotation),
            &occupied,
            snap.grid_step,
            placement.overlap_gap,
            placement.retry_budget,
        )
        .sanitized(self.config.resize.min_dimension);

        let start = self.document.snapshot();
        let id = self.document.create_element(asset_id, kind, frame);
        if let Some(element) = self.document.element_mut(id) {
            element.base_scale = base_scale;
        }
        self.images.insert(asset_id, image);
        self.commit(start);
        self.selection.set(&[id]);
        tracing::debug!(%id, asset_id, x = frame.x, y = frame.y, "asset placed");
        id
    }

    /// Replace the selection.
    pub fn select(&mut self, ids: &[ElementId]) {
        let existing: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|&id| self.document.contains(id))
            .collect();
        self.selection.set(&existing);
    }

    /// Select the blueprint alone, if there is one.
    pub fn select_blueprint(&mut self) -> bool {
        if self.document.blueprint().is_none() {
            return false;
        }
        self.selection.select_blueprint();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Duplicate the group-expanded selection, offset by `duplicate_offset`.
    ///
    /// The copies become the selection. Returns their ids.
    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let sources = expand_groups(&self.document, self.selection.ids());
        if sources.is_empty() {
            return Vec::new();
        }
        let offset = self.config.placement.duplicate_offset;
        let start = self.document.snapshot();
        let copies: Vec<ElementId> = sources
            .into_iter()
            .filter_map(|source| self.document.duplicate_element(source, offset, offset))
            .collect();
        self.commit(start);
        self.selection.set(&copies);
        copies
    }

    /// Delete the selected elements. Returns how many went.
    pub fn delete_selection(&mut self) -> usize {
        if self.selection.ids().is_empty() {
            return 0;
        }
        let start = self.document.snapshot();
        let removed = self.document.remove_elements(self.selection.ids());
        self.selection.clear();
        self.commit(start);
        tracing::debug!(count = removed.len(), "elements deleted");
        removed.len()
    }

    /// Move the group-expanded selection by `(dx, dy)`, skipping locked elements.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64) -> bool {
        let movers = elements_to_move(&self.document, &self.selection);
        if movers.is_empty() {
            return false;
        }
        let start = self.document.snapshot();
        for id in movers {
            if let Some(element) = self.document.element_mut(id) {
                let position = element.position().offset(dx, dy);
                element.set_position(position);
            }
        }
        self.commit(start)
    }

    /// Check if grouping is possible (at least 2 elements selected).
    pub fn can_group(&self) -> bool {
        self.selection.len() >= 2
    }

    /// Check if ungrouping is possible (any selected element is in a group).
    pub fn can_ungroup(&self) -> bool {
        self.selection
            .iter()
            .any(|id| self.document.group_of(id).is_some())
    }

    pub fn group_selection(&mut self) -> Option<GroupId> {
        if !self.can_group() {
            return None;
        }
        let start = self.document.snapshot();
        let group = self.document.create_group(self.selection.ids())?;
        self.commit(start);
        Some(group)
    }

    pub fn ungroup_selection(&mut self) -> usize {
        let start = self.document.snapshot();
        let dissolved = self.document.ungroup(self.selection.ids());
        self.commit(start);
        dissolved
    }

    pub fn bring_selection_to_front(&mut self) -> bool {
        let start = self.document.snapshot();
        layers::bring_to_front(&mut self.document, self.selection.ids()) && self.commit(start)
    }

    pub fn send_selection_to_back(&mut self) -> bool {
        let start = self.document.snapshot();
        layers::send_to_back(&mut self.document, self.selection.ids()) && self.commit(start)
    }

    /// Apply `change` to every selected element and commit once
    fn update_selected(&mut self, mut change: impl FnMut(&mut Element)) -> bool {
        if self.selection.ids().is_empty() {
            return false;
        }
        let start = self.document.snapshot();
        for id in self.selection.ids() {
            if let Some(element) = self.document.element_mut(*id) {
                change(element);
            }
        }
        self.commit(start)
    }

    /// Tint the selected elements; `None` restores the original colours.
    pub fn set_selection_color(&mut self, color: Option<Color>) -> bool {
        self.update_selected(|e| e.color = color)
    }

    /// Mirror the selected elements horizontally or vertically.
    pub fn flip_selection(&mut self, horizontal: bool) -> bool {
        self.update_selected(|e| {
            if horizontal {
                e.flip_x = !e.flip_x;
            } else {
                e.flip_y = !e.flip_y;
            }
        })
    }

    pub fn set_selection_locked(&mut self, locked: bool) -> bool {
        self.update_selected(|e| e.locked = locked)
    }

    /// Record the drawn length of a measurable element; 0 clears it.
    pub fn set_measured_length(&mut self, id: ElementId, length_mm: u32) -> bool {
        if !self.document.element(id).is_some_and(Element::is_measurable) {
            return false;
        }
        let start = self.document.snapshot();
        if let Some(element) = self.document.element_mut(id) {
            element.measured_length_mm = length_mm;
        }
        self.commit(start)
    }

    /// Replace the blueprint with a new image at its natural size.
    ///
    /// Goes on the element stream: undoing it brings back the previous
    /// blueprint wholesale. Transform history of the old image is dropped.
    pub fn set_blueprint(&mut self, image_ref: &str, image: Arc<RgbaImage>) {
        let (w, h) = image.dimensions();
        let min = self.config.resize.blueprint_min_dimension;
        let frame = Frame::new(0.0, 0.0, f64::from(w), f64::from(h), 0.0).sanitized(min);
        let start = self.document.snapshot();
        self.document
            .set_blueprint(Blueprint::new(image_ref, frame.width, frame.height));
        self.images.insert(image_ref, image);
        self.history.blueprint.clear();
        self.commit(start);
    }

    /// Remove the blueprint. Returns `false` when there was none.
    pub fn remove_blueprint(&mut self) -> bool {
        let start = self.document.snapshot();
        if self.document.clear_blueprint().is_none() {
            return false;
        }
        self.selection.clear();
        self.history.blueprint.clear();
        self.commit(start)
    }

    pub fn set_blueprint_opacity(&mut self, opacity: f64) -> bool {
        let start = self.document.blueprint_snapshot();
        let Some(blueprint) = self.document.blueprint_mut() else {
            return false;
        };
        blueprint.set_opacity(opacity);
        self.commit_blueprint(start)
    }

    pub fn set_blueprint_locked(&mut self, locked: bool) -> bool {
        let start = self.document.blueprint_snapshot();
        let Some(blueprint) = self.document.blueprint_mut() else {
            return false;
        };
        blueprint.locked = locked;
        self.commit_blueprint(start)
    }
}
