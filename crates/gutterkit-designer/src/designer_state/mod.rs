//! Editor state for host integration.
//!
//! `EditorState` is the single context object a host drives: it owns the
//! document, the selection, the pointer state machine, both undo streams,
//! the configuration and the loaded images. There are no globals; the
//! render loop borrows it between frames.
//!
//! This module is split into submodules:
//! - `pointer`: the transform state machine (pointer down/move/up)
//! - `keyboard`: key bindings
//! - `shapes`: placement and selection-wide element operations
//! - `history`: undo/redo on both streams
//! - `file_io`: diagram snapshot hand-off
//! - `takeoff`: material lines for the quote

mod file_io;
mod history;
mod keyboard;
mod pointer;
mod shapes;
mod takeoff;

use std::time::{Duration, Instant};

use crate::catalog::ImageCache;
use crate::document::{BlueprintSnapshot, Document, DocumentSnapshot};
use crate::history::History;
use crate::interaction::{CursorIcon, InteractionMode};
use crate::render::Debounce;
use crate::selection_manager::{HitTarget, Selection};
use crate::serialization::DiagramMetadata;
use gutterkit_core::AssetKind;
use gutterkit_settings::{EditorConfig, RotationBand};

/// Editor state: model, interaction and history in one place
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) document: Document,
    pub(crate) selection: Selection,
    pub(crate) mode: InteractionMode,
    pub(crate) history: History,
    pub(crate) config: EditorConfig,
    pub(crate) images: ImageCache,
    pub(crate) hover: Option<HitTarget>,
    pub(crate) cursor: CursorIcon,
    pub(crate) fit_debounce: Debounce,
    pub(crate) metadata: DiagramMetadata,
    revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    /// Creates an empty editor.
    pub fn new(config: EditorConfig) -> Self {
        let history = History::new(config.history.max_depth);
        let debounce = Debounce::new(Duration::from_millis(config.interaction.bbox_debounce_ms));
        Self {
            document: Document::new(),
            selection: Selection::new(),
            mode: InteractionMode::Idle,
            history,
            config,
            images: ImageCache::new(),
            hover: None,
            cursor: CursorIcon::Default,
            fit_debounce: debounce,
            metadata: DiagramMetadata::default(),
            revision: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Images loaded so far, keyed by asset id or blueprint `image_ref`.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Register an image, e.g. when relinking a loaded diagram.
    pub fn insert_image(&mut self, key: impl Into<String>, image: std::sync::Arc<image::RgbaImage>) {
        self.images.insert(key, image);
    }

    pub fn hover(&self) -> Option<HitTarget> {
        self.hover
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn fit_debounce(&self) -> &Debounce {
        &self.fit_debounce
    }

    pub fn metadata(&self) -> &DiagramMetadata {
        &self.metadata
    }

    /// Bumped on every committed change to the document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Forbidden rotation band for a kind, if it has one
    pub(crate) fn band_for(&self, kind: AssetKind) -> Option<&RotationBand> {
        kind.rotation_band_key()
            .and_then(|key| self.config.rotation_band(key))
    }

    /// Record that the content changed: restarts the fit debounce.
    pub(crate) fn content_changed(&mut self) {
        self.revision += 1;
        self.fit_debounce.trigger(Instant::now());
    }

    /// Push `start` onto the element stream if the document moved away from it
    pub(crate) fn commit(&mut self, start: DocumentSnapshot) -> bool {
        if self.document.snapshot() == start {
            return false;
        }
        self.history.elements.record(start);
        self.content_changed();
        true
    }

    /// Push `start` onto the blueprint stream if the blueprint changed
    pub(crate) fn commit_blueprint(&mut self, start: BlueprintSnapshot) -> bool {
        if self.document.blueprint_snapshot() == start {
            return false;
        }
        self.history.blueprint.record(start);
        self.content_changed();
        true
    }

    /// Abandon the current interaction, reverting any live change.
    ///
    /// Used for Escape, pointer cancel and focus loss. Nothing is pushed to
    /// either history stream. Hover and cursor go back to neutral.
    pub fn cancel_interaction(&mut self) {
        let mode = std::mem::take(&mut self.mode);
        if !mode.is_idle() {
            tracing::debug!(mode = mode.name(), "interaction cancelled");
        }
        match mode {
            InteractionMode::Idle => {}
            InteractionMode::Move(state) => self.revert(state.start_snapshot),
            InteractionMode::Resize(state) => self.revert(state.start_snapshot),
            InteractionMode::Rotate(state) => self.revert(state.start_snapshot),
            InteractionMode::ElementTransform(state) => self.revert(state.start_snapshot),
            InteractionMode::BlueprintMove(state) => {
                self.document.restore_blueprint(state.start_snapshot)
            }
            InteractionMode::BlueprintResize(state) => {
                self.document.restore_blueprint(state.start_snapshot)
            }
            InteractionMode::BlueprintRotate(state) => {
                self.document.restore_blueprint(state.start_snapshot)
            }
            InteractionMode::Marquee(_) | InteractionMode::Pan(_) => {}
        }
        self.hover = None;
        self.cursor = CursorIcon::Default;
    }

    fn revert(&mut self, start: DocumentSnapshot) {
        if self.document.snapshot() != start {
            self.document.restore(start);
        }
        let document = &self.document;
        self.selection.retain(|id| document.contains(*id));
    }
}
