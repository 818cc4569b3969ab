//! Document model
//!
//! The document owns every element in an arena `Vec`, the optional
//! blueprint and the groups, plus the id counters. Elements are addressed by
//! [`ElementId`]; all cross references (groups, selection, interaction
//! state) hold ids, never references.

use crate::geometry::{Bounds, Frame};
use crate::model::{Blueprint, Element, ElementId, Group, GroupId};
use gutterkit_core::constants::BLUEPRINT_Z_INDEX;
use gutterkit_core::{index_to_letter, AssetKind, LabelFamily};
use std::collections::{HashMap, HashSet};

/// Value copy of the document used by the undo stream
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub elements: Vec<Element>,
    pub blueprint: Option<Blueprint>,
    pub groups: Vec<Group>,
    pub next_element_id: u64,
    pub next_group_id: u64,
    pub next_sequence_id: u64,
}

/// Blueprint state captured by the blueprint undo stream
pub type BlueprintSnapshot = Option<Blueprint>;

/// The diagram: elements, blueprint and groups
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
    blueprint: Option<Blueprint>,
    groups: Vec<Group>,
    next_element_id: u64,
    next_group_id: u64,
    next_sequence_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            blueprint: None,
            groups: Vec::new(),
            next_element_id: 1,
            next_group_id: 1,
            next_sequence_id: 1,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.blueprint.as_ref()
    }

    pub fn blueprint_mut(&mut self) -> Option<&mut Blueprint> {
        self.blueprint.as_mut()
    }

    /// Replace the blueprint wholesale
    pub fn set_blueprint(&mut self, blueprint: Blueprint) {
        tracing::info!(
            image_ref = %blueprint.image_ref,
            width = blueprint.width,
            height = blueprint.height,
            "blueprint replaced"
        );
        self.blueprint = Some(blueprint);
    }

    pub fn clear_blueprint(&mut self) -> Option<Blueprint> {
        self.blueprint.take()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn next_sequence_id(&self) -> u64 {
        self.next_sequence_id
    }

    /// Z index for a newly created element: above every element and the blueprint sentinel
    pub fn next_z_index(&self) -> i32 {
        self.elements
            .iter()
            .map(|e| e.z_index)
            .fold(BLUEPRINT_Z_INDEX, i32::max)
            + 1
    }

    fn allocate_element_id(&mut self) -> ElementId {
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;
        id
    }

    fn allocate_sequence_id(&mut self) -> u64 {
        let id = self.next_sequence_id;
        self.next_sequence_id += 1;
        id
    }

    /// Create an element on top of the stack
    ///
    /// Measurable kinds get the next sequence id and an unset length.
    pub fn create_element(&mut self, asset_id: &str, kind: AssetKind, frame: Frame) -> ElementId {
        let id = self.allocate_element_id();
        let mut element = Element::new(id, asset_id, frame);
        element.kind = kind;
        element.z_index = self.next_z_index();
        if kind.is_measurable() {
            element.sequence_id = Some(self.allocate_sequence_id());
        }
        tracing::debug!(%id, asset_id, "element created");
        self.elements.push(element);
        id
    }

    /// Copy an element under a fresh id, offset by `(dx, dy)`
    ///
    /// The copy lands on top of the stack. A measurable copy gets its own
    /// sequence id and starts with no measured length.
    pub fn duplicate_element(&mut self, source: ElementId, dx: f64, dy: f64) -> Option<ElementId> {
        let mut copy = self.element(source)?.clone();
        let id = self.allocate_element_id();
        copy.id = id;
        copy.x += dx;
        copy.y += dy;
        copy.z_index = self.next_z_index();
        copy.locked = false;
        if copy.is_measurable() {
            copy.sequence_id = Some(self.allocate_sequence_id());
            copy.measured_length_mm = 0;
        } else {
            copy.sequence_id = None;
        }
        self.elements.push(copy);
        Some(id)
    }

    /// Remove elements and prune them from groups
    ///
    /// Returns the removed elements in document order.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Vec<Element> {
        let doomed: HashSet<ElementId> = ids.iter().copied().collect();
        let (removed, kept): (Vec<Element>, Vec<Element>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| doomed.contains(&e.id));
        self.elements = kept;
        if !removed.is_empty() {
            self.prune_groups();
        }
        removed
    }

    /// Drop deleted ids from groups and dissolve groups under two members
    fn prune_groups(&mut self) {
        let live: HashSet<ElementId> = self.elements.iter().map(|e| e.id).collect();
        for group in &mut self.groups {
            group.element_ids.retain(|id| live.contains(id));
        }
        self.groups.retain(|g| g.element_ids.len() >= 2);
    }

    pub fn group_of(&self, id: ElementId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(id))
    }

    /// Group existing elements
    ///
    /// Members are taken out of any group they already belong to. Returns
    /// `None` when fewer than two of the ids exist.
    pub fn create_group(&mut self, ids: &[ElementId]) -> Option<GroupId> {
        let mut members: Vec<ElementId> = Vec::new();
        for &id in ids {
            if self.contains(id) && !members.contains(&id) {
                members.push(id);
            }
        }
        if members.len() < 2 {
            return None;
        }
        for group in &mut self.groups {
            group.element_ids.retain(|id| !members.contains(id));
        }
        self.groups.retain(|g| g.element_ids.len() >= 2);

        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        tracing::debug!(%id, members = members.len(), "group created");
        self.groups.push(Group {
            id,
            element_ids: members,
        });
        Some(id)
    }

    /// Dissolve every group containing any of `ids`; returns how many went
    pub fn ungroup(&mut self, ids: &[ElementId]) -> usize {
        let before = self.groups.len();
        self.groups
            .retain(|g| !g.element_ids.iter().any(|id| ids.contains(id)));
        before - self.groups.len()
    }

    /// Set the z index of many elements at once
    pub(crate) fn set_z_indices(&mut self, updates: &[(ElementId, i32)]) {
        for &(id, z) in updates {
            if let Some(e) = self.element_mut(id) {
                e.z_index = z;
            }
        }
    }

    /// Bounds of the blueprint and every element
    pub fn content_bounds(&self) -> Option<Bounds> {
        Bounds::union_all(
            self.blueprint
                .iter()
                .map(Blueprint::bounds)
                .chain(self.elements.iter().map(Element::bounds)),
        )
    }

    /// Display labels for measurable elements
    ///
    /// Gutters are numbered 1, 2, ... and downpipes and droppers lettered
    /// A, B, ... in ascending sequence id order within each family.
    pub fn measurement_labels(&self) -> HashMap<ElementId, String> {
        let mut labels = HashMap::new();
        for family in [LabelFamily::Numbered, LabelFamily::Lettered] {
            let mut members: Vec<&Element> = self
                .elements
                .iter()
                .filter(|e| e.kind.label_family() == Some(family))
                .collect();
            members.sort_by_key(|e| e.sequence_id.unwrap_or(u64::MAX));
            for (index, element) in members.into_iter().enumerate() {
                let label = match family {
                    LabelFamily::Numbered => (index + 1).to_string(),
                    LabelFamily::Lettered => index_to_letter(index),
                };
                labels.insert(element.id, label);
            }
        }
        labels
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.clone(),
            blueprint: self.blueprint.clone(),
            groups: self.groups.clone(),
            next_element_id: self.next_element_id,
            next_group_id: self.next_group_id,
            next_sequence_id: self.next_sequence_id,
        }
    }

    /// Replace the content with a snapshot
    ///
    /// Counters never move backwards, so ids handed out after the snapshot
    /// was taken are not reissued. A blueprint showing the same image keeps
    /// its current transform, which belongs to the blueprint stream.
    pub fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.elements = snapshot.elements;
        self.groups = snapshot.groups;
        self.blueprint = match (self.blueprint.take(), snapshot.blueprint) {
            (Some(current), Some(stored)) if current.image_ref == stored.image_ref => Some(current),
            (_, stored) => stored,
        };
        self.next_element_id = self.next_element_id.max(snapshot.next_element_id);
        self.next_group_id = self.next_group_id.max(snapshot.next_group_id);
        self.next_sequence_id = self.next_sequence_id.max(snapshot.next_sequence_id);
        self.prune_groups();
        tracing::info!(elements = self.elements.len(), "document snapshot restored");
    }

    pub fn blueprint_snapshot(&self) -> BlueprintSnapshot {
        self.blueprint.clone()
    }

    pub fn restore_blueprint(&mut self, snapshot: BlueprintSnapshot) {
        self.blueprint = snapshot;
    }

    /// Rebuild a document from stored parts
    ///
    /// Kinds are re-derived from asset ids, geometry is clamped and the
    /// counters resume past every stored id.
    pub fn from_parts(
        mut elements: Vec<Element>,
        blueprint: Option<Blueprint>,
        groups: Vec<Group>,
        next_sequence_id: u64,
        min_dimension: f64,
    ) -> Self {
        for element in &mut elements {
            element.reclassify();
            element.set_frame(element.frame().sanitized(min_dimension));
        }
        let max_element = elements.iter().map(|e| e.id.0).max().unwrap_or(0);
        let max_group = groups.iter().map(|g| g.id.0).max().unwrap_or(0);
        let max_sequence = elements.iter().filter_map(|e| e.sequence_id).max().unwrap_or(0);
        let mut document = Self {
            elements,
            blueprint,
            groups,
            next_element_id: max_element + 1,
            next_group_id: max_group + 1,
            next_sequence_id: next_sequence_id.max(max_sequence + 1),
        };
        document.prune_groups();
        document
    }
}
