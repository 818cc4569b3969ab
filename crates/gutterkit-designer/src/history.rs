//! Undo/redo history
//!
//! Two independent snapshot streams: one for elements (which also carries
//! the blueprint so replacing it can be undone) and one for blueprint
//! move/resize/rotate, so tweaking the background never takes an element
//! edit with it.

use crate::document::{BlueprintSnapshot, DocumentSnapshot};
use std::collections::VecDeque;

/// Bounded undo stack with a redo stack.
///
/// Entries are the state *before* a change. Undo hands back the previous
/// state in exchange for the current one, which becomes redoable.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    max_depth: usize,
}

impl<T> HistoryStack<T> {
    /// Creates a stack keeping at most `max_depth` undo entries (at least one).
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the state before a change; clears the redo stack.
    ///
    /// Beyond `max_depth` the oldest entry is dropped.
    pub fn record(&mut self, entry: T) {
        self.undo.push_back(entry);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Swaps `current` for the most recent undo entry.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Swaps `current` for the most recent redo entry.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// The editor's two history streams
#[derive(Debug, Clone)]
pub struct History {
    pub elements: HistoryStack<DocumentSnapshot>,
    pub blueprint: HistoryStack<BlueprintSnapshot>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            elements: HistoryStack::new(max_depth),
            blueprint: HistoryStack::new(max_depth),
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.blueprint.clear();
    }
}
