//! Selection state and hit-testing.

use crate::document::Document;
use crate::geometry::{Bounds, Point};
use crate::model::ElementId;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Something the pointer can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Blueprint,
    Element(ElementId),
}

/// One entry of a hit stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub target: HitTarget,
    pub z_index: i32,
    pub area: f64,
}

/// Candidates under a point; rarely more than a handful
pub type HitStack = SmallVec<[HitCandidate; 8]>;

/// Ordered element selection plus the independent blueprint flag.
///
/// The first id is the *primary* selection: move offsets are taken
/// relative to it and single-element handles are drawn for it.
///
/// # Examples
///
/// ```
/// use gutterkit_designer::model::ElementId;
/// use gutterkit_designer::selection_manager::Selection;
///
/// let mut selection = Selection::new();
/// selection.set(&[ElementId(2), ElementId(1)]);
/// assert_eq!(selection.primary(), Some(ElementId(2)));
/// selection.toggle(ElementId(2));
/// assert_eq!(selection.primary(), Some(ElementId(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
    blueprint_selected: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the element selection, dropping duplicates, and deselect the blueprint.
    pub fn set(&mut self, ids: &[ElementId]) {
        self.ids.clear();
        for &id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        self.blueprint_selected = false;
    }

    /// Add or remove one element, keeping the order of the rest.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|&s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Deselects every element and the blueprint.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.blueprint_selected = false;
    }

    pub fn primary(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Keep only ids matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&ElementId) -> bool) {
        self.ids.retain(keep);
    }

    /// Select the blueprint alone.
    pub fn select_blueprint(&mut self) {
        self.ids.clear();
        self.blueprint_selected = true;
    }

    pub fn blueprint_selected(&self) -> bool {
        self.blueprint_selected
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && !self.blueprint_selected
    }

    /// The single selected element, when exactly one is selected.
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Whether `target` is everything that is selected.
    pub fn is_sole(&self, target: HitTarget) -> bool {
        match target {
            HitTarget::Blueprint => self.blueprint_selected && self.ids.is_empty(),
            HitTarget::Element(id) => !self.blueprint_selected && self.single() == Some(id),
        }
    }
}

/// Everything under `p`, topmost first.
///
/// Candidates are sorted by z descending, then by area ascending so a small
/// part lying on a larger one at the same z wins. The blueprint only takes
/// part while it is unlocked.
pub fn hit_stack(doc: &Document, p: Point) -> HitStack {
    let mut stack: HitStack = doc
        .elements()
        .iter()
        .filter(|e| e.contains(p))
        .map(|e| HitCandidate {
            target: HitTarget::Element(e.id),
            z_index: e.z_index,
            area: e.area(),
        })
        .collect();
    if let Some(blueprint) = doc.blueprint() {
        if !blueprint.locked && blueprint.contains(p) {
            stack.push(HitCandidate {
                target: HitTarget::Blueprint,
                z_index: blueprint.z_index,
                area: blueprint.area(),
            });
        }
    }
    stack.sort_by(|a, b| {
        b.z_index
            .cmp(&a.z_index)
            .then(a.area.total_cmp(&b.area))
    });
    stack
}

/// Resolve a click to a target.
///
/// # Arguments
/// * `drill` - Cycle beneath the current selection (Alt-click): when the top
///   candidate is already the sole selection and there is more than one
///   candidate, the next one down is returned instead.
pub fn pick(doc: &Document, selection: &Selection, p: Point, drill: bool) -> Option<HitTarget> {
    let stack = hit_stack(doc, p);
    let top = stack.first()?.target;
    if drill && stack.len() > 1 && selection.is_sole(top) {
        return Some(stack[1].target);
    }
    Some(top)
}

/// Elements picked out by a marquee drag, in document order.
///
/// Dragging left to right (`start.x <= end.x`) is *window* selection: an
/// element's rotated bounding box must lie entirely inside the rectangle.
/// Dragging right to left is *crossing* selection: any overlap counts,
/// touching edges included.
pub fn marquee_select(doc: &Document, start: Point, end: Point) -> Vec<ElementId> {
    let rect = Bounds::from_corners(start, end);
    let window = start.x <= end.x;
    doc.elements()
        .iter()
        .filter(|e| {
            let b = e.bounds();
            if window {
                rect.contains_bounds(&b)
            } else {
                rect.intersects(&b, 0.0)
            }
        })
        .map(|e| e.id)
        .collect()
}

/// Expand ids to whole groups, keeping the given order first.
pub fn expand_groups(doc: &Document, ids: &[ElementId]) -> Vec<ElementId> {
    let mut seen: HashSet<ElementId> = HashSet::new();
    let mut out = Vec::new();
    for &id in ids {
        if seen.insert(id) {
            out.push(id);
        }
    }
    for &id in ids {
        if let Some(group) = doc.group_of(id) {
            for &member in &group.element_ids {
                if seen.insert(member) {
                    out.push(member);
                }
            }
        }
    }
    out.retain(|&id| doc.contains(id));
    out
}

/// Elements a drag of the selection moves: the group-expanded selection
/// without locked elements.
pub fn elements_to_move(doc: &Document, selection: &Selection) -> Vec<ElementId> {
    expand_groups(doc, selection.ids())
        .into_iter()
        .filter(|&id| doc.element(id).is_some_and(|e| !e.locked))
        .collect()
}
