//! # GutterKit Designer
//!
//! Editor core for laying gutter and downpipe components over a site
//! blueprint and turning the layout into a material quote.
//!
//! ## Core Components
//!
//! ### Document
//! - **Elements**: placed catalogue images with frame, colour, flips and lock
//! - **Blueprint**: one optional background image with its own undo stream
//! - **Groups**: elements that select, move and restack together
//!
//! ### Interaction
//! - **Hit testing**: rotated boxes, smallest area wins, Alt drills down
//! - **Transforms**: move, resize, rotate and two-finger gestures with
//!   rotation bands per component family
//! - **Snapping**: grid, alignment guides and clear-of-neighbour placement
//! - **History**: snapshot undo/redo
//!
//! ### Output
//! - **Render loop**: frame composition, tint cache and debounced fit
//! - **Quote**: material lines from the stock optimizer
//!
//! ## Architecture
//!
//! ```text
//! RenderLoop (host frames + input queue)
//!   ├── Viewport (fit, zoom, pan)
//!   └── EditorState
//!         ├── Document (elements, blueprint, groups)
//!         ├── Selection + InteractionMode
//!         └── History (element stream, blueprint stream)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gutterkit_designer::{EditorState, MemoryCatalog, Point};
//!
//! let mut editor = EditorState::default();
//! let id = editor.place_asset(&catalog, "GUT-SC-MAR-3M", Point::new(200.0, 150.0)).await?;
//! editor.set_measured_length(id, 7000);
//! let lines = editor.material_lines_with_accessories()?;
//! ```

pub mod catalog;
pub mod document;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod interaction;
pub mod layers;
pub mod model;
pub mod render;
pub mod selection_manager;
pub mod serialization;
pub mod snapping;
pub mod tint;
pub mod viewport;

// Editor state
pub mod designer_state;

pub use catalog::{AssetCatalog, ImageCache, MemoryCatalog};
pub use document::{BlueprintSnapshot, Document, DocumentSnapshot};
pub use error::{DesignerError, Result};
pub use geometry::{Bounds, Frame, Point};
pub use history::{History, HistoryStack};
pub use input::{
    InputEvent, Key, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerKind, WheelEvent,
};
pub use interaction::{CursorIcon, Handle, InteractionMode};
pub use layers::Layer;
pub use model::{Blueprint, Element, ElementId, Group, GroupId};
pub use render::{compose_frame, Debounce, FrameHost, RenderFrame, RenderLoop};
pub use selection_manager::{HitTarget, Selection};
pub use serialization::{DiagramData, DiagramMetadata};
pub use tint::TintCache;
pub use viewport::Viewport;

pub use designer_state::EditorState;
