//! Transform engine state
//!
//! The pointer state machine is an [`InteractionMode`] enum. Every variant
//! that can mutate the document owns the snapshot taken before its first
//! change, so committing pushes exactly that snapshot and cancelling just
//! drops it. The transitions themselves live in
//! `designer_state::pointer`.

pub mod gesture;
pub mod handles;
pub mod resize;
pub mod rotate;

pub use gesture::{gesture_frame, TouchPoint};
pub use handles::{Handle, HandleHit, HandleLayout};
pub use resize::{resize_frame, ResizeMode};
pub use rotate::{rotate_to, RotateGrip, RotateModifiers};

use crate::document::{BlueprintSnapshot, DocumentSnapshot};
use crate::geometry::{Frame, Point};
use crate::model::ElementId;
use crate::snapping::Guide;
use smallvec::SmallVec;

/// Dragging the selection
#[derive(Debug, Clone)]
pub struct MoveState {
    pub pointer_id: u32,
    pub primary: ElementId,
    /// Pointer position minus the primary's top-left at grab time
    pub grab_offset: Point,
    /// Previewed top-left of the primary; the document is untouched until commit
    pub preview: Point,
    /// Other movers and their top-left relative to the primary
    pub followers: Vec<(ElementId, Point)>,
    /// Alignment lines matching the current preview
    pub guides: SmallVec<[Guide; 2]>,
    pub moved: bool,
    pub start_snapshot: DocumentSnapshot,
}

impl MoveState {
    /// Preview top-left for a mover
    pub fn preview_position(&self, id: ElementId) -> Option<Point> {
        if id == self.primary {
            return Some(self.preview);
        }
        self.followers
            .iter()
            .find(|(follower, _)| *follower == id)
            .map(|(_, offset)| self.preview + *offset)
    }
}

#[derive(Debug, Clone)]
pub struct ResizeState {
    pub pointer_id: u32,
    pub element: ElementId,
    pub handle: Handle,
    pub start: Frame,
    /// Handle corner minus the pointer at grab time, world units
    pub grab_offset: Point,
    pub start_snapshot: DocumentSnapshot,
}

#[derive(Debug, Clone)]
pub struct RotateState {
    pub pointer_id: u32,
    pub element: ElementId,
    pub grip: RotateGrip,
    /// Last update was clamped by a forbidden band
    pub constrained: bool,
    pub start_snapshot: DocumentSnapshot,
}

/// Rubber-band selection, world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarqueeState {
    pub pointer_id: u32,
    pub start: Point,
    pub current: Point,
    /// Add to the existing selection instead of replacing it
    pub additive: bool,
}

/// View panning, display coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanState {
    pub pointer_id: u32,
    pub last: Point,
}

#[derive(Debug, Clone)]
pub struct BlueprintMoveState {
    pub pointer_id: u32,
    pub grab_offset: Point,
    pub start_snapshot: BlueprintSnapshot,
}

#[derive(Debug, Clone)]
pub struct BlueprintResizeState {
    pub pointer_id: u32,
    pub handle: Handle,
    pub start: Frame,
    pub grab_offset: Point,
    pub start_snapshot: BlueprintSnapshot,
}

#[derive(Debug, Clone)]
pub struct BlueprintRotateState {
    pub pointer_id: u32,
    pub grip: RotateGrip,
    pub start_snapshot: BlueprintSnapshot,
}

/// Two pointers on one element: pinch to scale, twist to rotate
#[derive(Debug, Clone)]
pub struct GestureState {
    pub element: ElementId,
    pub pointer_a: TouchPoint,
    pub pointer_b: TouchPoint,
    pub start: Frame,
    pub constrained: bool,
    pub start_snapshot: DocumentSnapshot,
}

/// What the pointer is currently doing
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Move(MoveState),
    Resize(ResizeState),
    Rotate(RotateState),
    Marquee(MarqueeState),
    Pan(PanState),
    BlueprintMove(BlueprintMoveState),
    BlueprintResize(BlueprintResizeState),
    BlueprintRotate(BlueprintRotateState),
    ElementTransform(GestureState),
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Move(_) => "move",
            InteractionMode::Resize(_) => "resize",
            InteractionMode::Rotate(_) => "rotate",
            InteractionMode::Marquee(_) => "marquee",
            InteractionMode::Pan(_) => "pan",
            InteractionMode::BlueprintMove(_) => "blueprint-move",
            InteractionMode::BlueprintResize(_) => "blueprint-resize",
            InteractionMode::BlueprintRotate(_) => "blueprint-rotate",
            InteractionMode::ElementTransform(_) => "element-transform",
        }
    }

    /// Whether `pointer_id` drives this interaction
    pub fn owns_pointer(&self, pointer_id: u32) -> bool {
        match self {
            InteractionMode::Idle => false,
            InteractionMode::Move(s) => s.pointer_id == pointer_id,
            InteractionMode::Resize(s) => s.pointer_id == pointer_id,
            InteractionMode::Rotate(s) => s.pointer_id == pointer_id,
            InteractionMode::Marquee(s) => s.pointer_id == pointer_id,
            InteractionMode::Pan(s) => s.pointer_id == pointer_id,
            InteractionMode::BlueprintMove(s) => s.pointer_id == pointer_id,
            InteractionMode::BlueprintResize(s) => s.pointer_id == pointer_id,
            InteractionMode::BlueprintRotate(s) => s.pointer_id == pointer_id,
            InteractionMode::ElementTransform(s) => {
                s.pointer_a.pointer_id == pointer_id || s.pointer_b.pointer_id == pointer_id
            }
        }
    }
}

/// Cursor the host should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    Resize(Handle),
    Rotate,
    Grab,
    Grabbing,
    NotAllowed,
}
