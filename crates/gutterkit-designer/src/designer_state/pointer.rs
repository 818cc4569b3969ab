//! Pointer state machine: down picks an interaction, move drives it, up
//! commits it.

use std::collections::HashSet;

use super::EditorState;
use crate::geometry::{Frame, Point};
use crate::input::{Modifiers, PointerButton, PointerEvent, PointerKind};
use crate::interaction::{
    gesture_frame, resize_frame, rotate_to, BlueprintMoveState, BlueprintResizeState,
    BlueprintRotateState, CursorIcon, GestureState, Handle, HandleHit, HandleLayout,
    InteractionMode, MarqueeState, MoveState, PanState, ResizeMode, ResizeState, RotateGrip,
    RotateModifiers, RotateState, TouchPoint,
};
use crate::model::ElementId;
use crate::selection_manager::{
    elements_to_move, expand_groups, hit_stack, marquee_select, pick, HitTarget,
};
use crate::snapping::{constrain_rotation, snap_rotation, snap_to_alignment, snap_to_grid};
use crate::viewport::Viewport;
use smallvec::SmallVec;

/// World position of a handle on the unpadded frame
fn handle_anchor(frame: &Frame, handle: Handle) -> Point {
    let (sx, sy) = handle.sign();
    frame.local_to_world(Point::new(sx * frame.width / 2.0, sy * frame.height / 2.0))
}

impl EditorState {
    /// Feed one pointer event through the state machine.
    ///
    /// The viewport converts client coordinates and receives pan drags.
    pub fn handle_pointer(&mut self, event: &PointerEvent, viewport: &mut Viewport) {
        let display = viewport.client_to_display(event.client);
        let world = viewport.display_to_world(display);
        match event.kind {
            PointerKind::Down => self.pointer_down(event, display, world, viewport),
            PointerKind::Move => self.pointer_move(event, display, world, viewport),
            PointerKind::Up => self.pointer_up(event),
            PointerKind::Cancel => {
                if self.mode.owns_pointer(event.pointer_id) {
                    self.cancel_interaction();
                }
            }
        }
    }

    /// Handle of the selected blueprint under a display point
    fn blueprint_handle_at(&self, display: Point, viewport: &Viewport) -> Option<HandleHit> {
        if !self.selection.blueprint_selected() {
            return None;
        }
        let frame = self.document.blueprint()?.frame();
        let interaction = &self.config.interaction;
        HandleLayout::new(&frame, viewport, 0.0, interaction.rotate_handle_offset_px)
            .hit_blueprint(display, interaction.blueprint_handle_size_px)
    }

    /// Handle of the single selected, unlocked element under a display point
    fn element_handle_at(
        &self,
        display: Point,
        viewport: &Viewport,
    ) -> Option<(ElementId, HandleHit)> {
        if self.selection.blueprint_selected() {
            return None;
        }
        let id = self.selection.single()?;
        let element = self.document.element(id)?;
        if element.locked {
            return None;
        }
        let interaction = &self.config.interaction;
        HandleLayout::new(
            &element.frame(),
            viewport,
            interaction.visual_padding_px,
            interaction.rotate_handle_offset_px,
        )
        .hit_element(
            display,
            interaction.handle_proximity_px,
            interaction.rotate_handle_proximity_px,
        )
        .map(|hit| (id, hit))
    }

    fn pointer_down(
        &mut self,
        event: &PointerEvent,
        display: Point,
        world: Point,
        viewport: &Viewport,
    ) {
        match self.mode {
            InteractionMode::Idle => {}
            InteractionMode::Move(_) => {
                self.start_gesture(event.pointer_id, world);
                return;
            }
            _ => {
                tracing::debug!(mode = self.mode.name(), "extra pointer ignored");
                return;
            }
        }
        if event.button == PointerButton::Secondary {
            return;
        }

        if let Some(hit) = self.blueprint_handle_at(display, viewport) {
            self.press_blueprint_handle(event.pointer_id, hit, world);
            return;
        }
        if let Some((id, hit)) = self.element_handle_at(display, viewport) {
            self.press_element_handle(event.pointer_id, id, hit, world);
            return;
        }

        let alt = event.modifiers.alt;
        let target = pick(&self.document, &self.selection, world, alt);
        let top = hit_stack(&self.document, world).first().map(|c| c.target);
        let drilled = alt && target != top;
        match target {
            Some(HitTarget::Element(id)) => self.press_element(event, id, world, alt && !drilled),
            Some(HitTarget::Blueprint) => self.press_blueprint(event.pointer_id, world),
            None => self.press_canvas(event, display, world),
        }
    }

    fn press_blueprint_handle(&mut self, pointer_id: u32, hit: HandleHit, world: Point) {
        let Some(blueprint) = self.document.blueprint() else {
            return;
        };
        if blueprint.locked {
            return;
        }
        let frame = blueprint.frame();
        let start_snapshot = self.document.blueprint_snapshot();
        self.mode = match hit {
            HandleHit::Resize(handle) => InteractionMode::BlueprintResize(BlueprintResizeState {
                pointer_id,
                handle,
                start: frame,
                grab_offset: handle_anchor(&frame, handle) - world,
                start_snapshot,
            }),
            HandleHit::Rotate => InteractionMode::BlueprintRotate(BlueprintRotateState {
                pointer_id,
                grip: RotateGrip::new(frame.center(), frame.rotation, world),
                start_snapshot,
            }),
        };
        tracing::debug!(mode = self.mode.name(), "interaction started");
    }

    fn press_element_handle(&mut self, pointer_id: u32, id: ElementId, hit: HandleHit, world: Point) {
        let Some(frame) = self.document.element(id).map(|e| e.frame()) else {
            return;
        };
        let start_snapshot = self.document.snapshot();
        self.mode = match hit {
            HandleHit::Resize(handle) => {
                self.cursor = CursorIcon::Resize(handle);
                InteractionMode::Resize(ResizeState {
                    pointer_id,
                    element: id,
                    handle,
                    start: frame,
                    grab_offset: handle_anchor(&frame, handle) - world,
                    start_snapshot,
                })
            }
            HandleHit::Rotate => {
                self.cursor = CursorIcon::Rotate;
                InteractionMode::Rotate(RotateState {
                    pointer_id,
                    element: id,
                    grip: RotateGrip::new(frame.center(), frame.rotation, world),
                    constrained: false,
                    start_snapshot,
                })
            }
        };
        tracing::debug!(mode = self.mode.name(), element = %id, "interaction started");
    }

    fn press_element(&mut self, event: &PointerEvent, id: ElementId, world: Point, duplicate: bool) {
        if event.modifiers.shift {
            self.selection.toggle(id);
            return;
        }
        if !self.selection.contains(id) {
            self.selection.set(&[id]);
        }
        if self.document.element(id).is_none_or(|e| e.locked) {
            return;
        }

        let start_snapshot = self.document.snapshot();
        if duplicate {
            self.duplicate_for_drag(id);
        }

        let movers = elements_to_move(&self.document, &self.selection);
        let Some(primary) = self
            .selection
            .primary()
            .filter(|p| movers.contains(p))
            .or_else(|| movers.first().copied())
        else {
            return;
        };
        let Some(origin) = self.document.element(primary).map(|e| e.position()) else {
            return;
        };
        let followers = movers
            .iter()
            .filter(|&&m| m != primary)
            .filter_map(|&m| self.document.element(m).map(|e| (m, e.position() - origin)))
            .collect();
        self.mode = InteractionMode::Move(MoveState {
            pointer_id: event.pointer_id,
            primary,
            grab_offset: world - origin,
            preview: origin,
            followers,
            guides: SmallVec::new(),
            moved: false,
            start_snapshot,
        });
        self.cursor = CursorIcon::Grabbing;
        tracing::debug!(primary = %primary, "move started");
    }

    /// Alt-drag: copy the selection in place and select the copies, the
    /// copy of `clicked` first
    fn duplicate_for_drag(&mut self, clicked: ElementId) {
        let sources = expand_groups(&self.document, self.selection.ids());
        let mut copies = Vec::with_capacity(sources.len());
        for source in sources {
            if let Some(copy) = self.document.duplicate_element(source, 0.0, 0.0) {
                if source == clicked {
                    copies.insert(0, copy);
                } else {
                    copies.push(copy);
                }
            }
        }
        tracing::debug!(count = copies.len(), "duplicated for drag");
        self.selection.set(&copies);
    }

    fn press_blueprint(&mut self, pointer_id: u32, world: Point) {
        if !self.selection.blueprint_selected() {
            self.selection.select_blueprint();
            return;
        }
        let Some(blueprint) = self.document.blueprint() else {
            return;
        };
        if blueprint.locked {
            return;
        }
        let grab_offset = world - Point::new(blueprint.x, blueprint.y);
        self.mode = InteractionMode::BlueprintMove(BlueprintMoveState {
            pointer_id,
            grab_offset,
            start_snapshot: self.document.blueprint_snapshot(),
        });
        self.cursor = CursorIcon::Grabbing;
    }

    fn press_canvas(&mut self, event: &PointerEvent, display: Point, world: Point) {
        if event.button == PointerButton::Middle || event.modifiers.space {
            self.mode = InteractionMode::Pan(PanState {
                pointer_id: event.pointer_id,
                last: display,
            });
            self.cursor = CursorIcon::Grabbing;
            return;
        }
        let additive = event.modifiers.shift;
        if !additive {
            self.selection.clear();
        }
        self.mode = InteractionMode::Marquee(MarqueeState {
            pointer_id: event.pointer_id,
            start: world,
            current: world,
            additive,
        });
    }

    /// A second pointer during a single-element move becomes pinch/twist
    fn start_gesture(&mut self, pointer_id: u32, world: Point) {
        let InteractionMode::Move(state) = &self.mode else {
            return;
        };
        if state.pointer_id == pointer_id || !state.followers.is_empty() {
            return;
        }
        let Some(element) = self.document.element(state.primary) else {
            return;
        };
        if element.locked {
            return;
        }
        let mut start = element.frame();
        start.x = state.preview.x;
        start.y = state.preview.y;
        let first = state.preview + state.grab_offset;

        let InteractionMode::Move(state) = std::mem::take(&mut self.mode) else {
            return;
        };
        self.mode = InteractionMode::ElementTransform(GestureState {
            element: state.primary,
            pointer_a: TouchPoint::new(state.pointer_id, first),
            pointer_b: TouchPoint::new(pointer_id, world),
            start,
            constrained: false,
            start_snapshot: state.start_snapshot,
        });
        tracing::debug!(element = %state.primary, "two-pointer transform started");
    }

    fn pointer_move(
        &mut self,
        event: &PointerEvent,
        display: Point,
        world: Point,
        viewport: &mut Viewport,
    ) {
        if self.mode.is_idle() {
            self.update_hover(display, world, viewport, event.modifiers);
            return;
        }
        if !self.mode.owns_pointer(event.pointer_id) {
            return;
        }
        let modifiers = event.modifiers;
        let mut mode = std::mem::take(&mut self.mode);
        match &mut mode {
            InteractionMode::Idle => {}
            InteractionMode::Move(state) => self.drag_move(state, world),
            InteractionMode::Resize(state) => self.drag_resize(state, world, modifiers.alt),
            InteractionMode::Rotate(state) => self.drag_rotate(state, world, modifiers),
            InteractionMode::Marquee(state) => state.current = world,
            InteractionMode::Pan(state) => {
                let delta = display - state.last;
                viewport.pan_by(delta.x, delta.y);
                state.last = display;
            }
            InteractionMode::BlueprintMove(state) => {
                if let Some(blueprint) = self.document.blueprint_mut() {
                    let position = world - state.grab_offset;
                    blueprint.x = position.x;
                    blueprint.y = position.y;
                }
            }
            InteractionMode::BlueprintResize(state) => {
                let mode = if modifiers.alt {
                    ResizeMode::Free
                } else {
                    ResizeMode::KeepAspect
                };
                let frame = resize_frame(
                    &state.start,
                    state.handle,
                    world + state.grab_offset,
                    mode,
                    self.config.resize.blueprint_min_dimension,
                );
                if let Some(blueprint) = self.document.blueprint_mut() {
                    blueprint.set_frame(frame);
                }
            }
            InteractionMode::BlueprintRotate(state) => {
                let snap = &self.config.snap;
                let rotation = snap_rotation(
                    state.grip.raw_rotation(world),
                    modifiers.shift,
                    snap.rotation_step_deg,
                    snap.rotation_magnetic_deg,
                );
                if let Some(blueprint) = self.document.blueprint_mut() {
                    blueprint.rotation = rotation;
                }
            }
            InteractionMode::ElementTransform(state) => {
                self.drag_gesture(state, event.pointer_id, world, modifiers.alt)
            }
        }
        self.mode = mode;
    }

    /// Frames of elements that are not moving, for alignment
    fn static_frames(&self, movers: &HashSet<ElementId>) -> Vec<Frame> {
        self.document
            .elements()
            .iter()
            .filter(|e| !movers.contains(&e.id))
            .map(|e| e.frame())
            .collect()
    }

    fn movers_of(state: &MoveState) -> HashSet<ElementId> {
        std::iter::once(state.primary)
            .chain(state.followers.iter().map(|(id, _)| *id))
            .collect()
    }

    fn drag_move(&mut self, state: &mut MoveState, world: Point) {
        let preview = world - state.grab_offset;
        if preview != state.preview {
            state.moved = true;
        }
        state.preview = preview;
        let Some(element) = self.document.element(state.primary) else {
            return;
        };
        let frame = Frame::new(preview.x, preview.y, element.width, element.height, element.rotation);
        let others = self.static_frames(&Self::movers_of(state));
        let snap = snap_to_alignment(frame, &others, self.config.snap.alignment_threshold);
        state.guides = snap.guides().collect();
    }

    fn drag_resize(&mut self, state: &ResizeState, world: Point, free_warp: bool) {
        let min_dimension = self.config.resize.min_dimension;
        let Some(element) = self.document.element_mut(state.element) else {
            return;
        };
        if element.locked {
            return;
        }
        let mode = ResizeMode::for_element(element.kind.is_linear(), free_warp);
        let frame = resize_frame(
            &state.start,
            state.handle,
            world + state.grab_offset,
            mode,
            min_dimension,
        );
        element.set_frame(frame);
    }

    fn drag_rotate(&mut self, state: &mut RotateState, world: Point, modifiers: Modifiers) {
        let Some((kind, previous)) = self
            .document
            .element(state.element)
            .filter(|e| !e.locked)
            .map(|e| (e.kind, e.rotation))
        else {
            return;
        };
        let band = self.band_for(kind).cloned();
        let result = rotate_to(
            &state.grip,
            world,
            previous,
            RotateModifiers {
                stepped: modifiers.shift,
                override_band: modifiers.alt,
            },
            &self.config.snap,
            band.as_ref(),
        );
        state.constrained = result.constrained;
        if let Some(element) = self.document.element_mut(state.element) {
            element.rotation = result.degrees;
        }
    }

    fn drag_gesture(
        &mut self,
        state: &mut GestureState,
        pointer_id: u32,
        world: Point,
        override_band: bool,
    ) {
        if state.pointer_a.pointer_id == pointer_id {
            state.pointer_a.current = world;
        } else if state.pointer_b.pointer_id == pointer_id {
            state.pointer_b.current = world;
        }
        let Some((kind, previous)) = self
            .document
            .element(state.element)
            .filter(|e| !e.locked)
            .map(|e| (e.kind, e.rotation))
        else {
            return;
        };
        let mut frame = gesture_frame(
            &state.start,
            &state.pointer_a,
            &state.pointer_b,
            self.config.resize.min_dimension,
        );
        if !override_band {
            let result = constrain_rotation(frame.rotation, previous, self.band_for(kind));
            frame.rotation = result.degrees;
            state.constrained = result.constrained;
        }
        if let Some(element) = self.document.element_mut(state.element) {
            element.set_frame(frame);
        }
    }

    fn update_hover(
        &mut self,
        display: Point,
        world: Point,
        viewport: &Viewport,
        modifiers: Modifiers,
    ) {
        let handle = self
            .element_handle_at(display, viewport)
            .map(|(_, hit)| hit)
            .or_else(|| {
                self.blueprint_handle_at(display, viewport)
                    .filter(|_| self.document.blueprint().is_some_and(|b| !b.locked))
            });
        let top = hit_stack(&self.document, world).first().map(|c| c.target);
        self.hover = top;
        self.cursor = match (handle, top) {
            (Some(HandleHit::Resize(h)), _) => CursorIcon::Resize(h),
            (Some(HandleHit::Rotate), _) => CursorIcon::Rotate,
            (None, Some(HitTarget::Element(id))) => {
                if self.document.element(id).is_some_and(|e| e.locked) {
                    CursorIcon::NotAllowed
                } else {
                    CursorIcon::Move
                }
            }
            (None, Some(HitTarget::Blueprint)) if self.selection.blueprint_selected() => {
                CursorIcon::Move
            }
            (None, _) if modifiers.space => CursorIcon::Grab,
            (None, _) => CursorIcon::Default,
        };
    }

    fn pointer_up(&mut self, event: &PointerEvent) {
        if !self.mode.owns_pointer(event.pointer_id) {
            return;
        }
        let mode = std::mem::take(&mut self.mode);
        let name = mode.name();
        let committed = match mode {
            InteractionMode::Idle | InteractionMode::Pan(_) => false,
            InteractionMode::Move(state) => self.finish_move(state),
            InteractionMode::Resize(state) => self.commit(state.start_snapshot),
            InteractionMode::Rotate(state) => self.commit(state.start_snapshot),
            InteractionMode::ElementTransform(state) => self.commit(state.start_snapshot),
            InteractionMode::Marquee(state) => {
                self.finish_marquee(state);
                false
            }
            InteractionMode::BlueprintMove(state) => self.commit_blueprint(state.start_snapshot),
            InteractionMode::BlueprintResize(state) => {
                self.commit_blueprint(state.start_snapshot)
            }
            InteractionMode::BlueprintRotate(state) => {
                self.commit_blueprint(state.start_snapshot)
            }
        };
        self.cursor = CursorIcon::Default;
        tracing::debug!(mode = name, committed, "interaction finished");
    }

    /// Place the movers: preview, then alignment, then grid
    fn finish_move(&mut self, state: MoveState) -> bool {
        if state.moved {
            if let Some(element) = self.document.element(state.primary) {
                let frame = Frame::new(
                    state.preview.x,
                    state.preview.y,
                    element.width,
                    element.height,
                    element.rotation,
                );
                let others = self.static_frames(&Self::movers_of(&state));
                let snap = &self.config.snap;
                let aligned = snap_to_alignment(frame, &others, snap.alignment_threshold).frame;
                let mut position = Point::new(aligned.x, aligned.y);
                if snap.grid_snap_enabled {
                    position = Point::new(
                        snap_to_grid(position.x, snap.grid_step),
                        snap_to_grid(position.y, snap.grid_step),
                    );
                }
                if let Some(element) = self.document.element_mut(state.primary) {
                    element.set_position(position);
                }
                for (id, offset) in &state.followers {
                    if let Some(element) = self.document.element_mut(*id) {
                        element.set_position(position + *offset);
                    }
                }
            }
        }
        self.commit(state.start_snapshot)
    }

    fn finish_marquee(&mut self, state: MarqueeState) {
        let hits = marquee_select(&self.document, state.start, state.current);
        if state.additive {
            let mut ids = self.selection.ids().to_vec();
            ids.extend(hits);
            self.selection.set(&ids);
        } else {
            self.selection.set(&hits);
        }
    }
}
