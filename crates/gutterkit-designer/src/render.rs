//! Frame composition and the render loop.
//!
//! [`compose_frame`] turns the editor state into a [`RenderFrame`]: a flat
//! list of what to paint, already in display space where that matters.
//! [`RenderLoop`] owns the viewport, the tint cache and the event queue and
//! pumps a [`FrameHost`]: wait for a frame, drain input into the editor,
//! compose, present.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::designer_state::EditorState;
use crate::geometry::{Bounds, Frame, Point};
use crate::input::InputEvent;
use crate::interaction::{CursorIcon, Handle, HandleLayout, InteractionMode};
use crate::layers::{draw_order, Layer};
use crate::model::ElementId;
use crate::snapping::Guide;
use crate::tint::TintCache;
use crate::viewport::Viewport;
use gutterkit_core::Color;
use gutterkit_settings::EditorConfig;
use image::RgbaImage;

/// Trailing-edge delay: pending until `delay` has passed since the last trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the delay from `now`
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }
}

/// One painted layer, in world space
#[derive(Debug, Clone)]
pub struct LayerDraw {
    pub layer: Layer,
    /// Frame to paint, with any move preview applied
    pub frame: Frame,
    /// Asset id for elements, `image_ref` for the blueprint
    pub image_key: String,
    pub color: Option<Color>,
    pub flip_x: bool,
    pub flip_y: bool,
    pub opacity: f64,
    /// Source image (or its tint once the render loop applied it)
    pub image: Option<Arc<RgbaImage>>,
}

/// What a handle does when grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Resize(Handle),
    Rotate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDraw {
    pub kind: HandleKind,
    /// Display position
    pub position: Point,
}

/// Selection outline: the four corners of a rotated box in display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub corners: [Point; 4],
}

/// Measurement label of a gutter, downpipe or dropper
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub element: ElementId,
    pub label: String,
    /// Display position of the element centre
    pub position: Point,
    pub length_mm: u32,
}

/// Everything a host needs to paint one frame
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub scale: f64,
    pub offset: Point,
    /// Bottom to top
    pub layers: Vec<LayerDraw>,
    pub outlines: Vec<Outline>,
    pub handles: Vec<HandleDraw>,
    /// Display segment from the top edge to the rotate knob
    pub rotate_stem: Option<(Point, Point)>,
    pub guides: Vec<Guide>,
    /// Display rectangle of an active marquee
    pub marquee: Option<Bounds>,
    pub badges: Vec<Badge>,
    pub cursor: CursorIcon,
}

fn outline(frame: &Frame, viewport: &Viewport) -> Outline {
    let (hw, hh) = (frame.width / 2.0, frame.height / 2.0);
    let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .map(|(x, y)| viewport.world_to_display(frame.local_to_world(Point::new(x, y))));
    Outline { corners }
}

/// Frame of an element as it should be drawn: the move preview wins
fn displayed_frame(editor: &EditorState, id: ElementId, frame: Frame) -> Frame {
    match editor.mode() {
        InteractionMode::Move(state) => match state.preview_position(id) {
            Some(p) => Frame { x: p.x, y: p.y, ..frame },
            None => frame,
        },
        _ => frame,
    }
}

/// Handles for the current selection, if it shows any
fn selection_handles(editor: &EditorState, viewport: &Viewport, frame: &mut RenderFrame) {
    let config = editor.config();
    let selection = editor.selection();
    let interaction = &config.interaction;

    if selection.blueprint_selected() {
        let Some(blueprint) = editor.document().blueprint() else {
            return;
        };
        if blueprint.locked {
            return;
        }
        let layout = HandleLayout::new(
            &blueprint.frame(),
            viewport,
            0.0,
            interaction.rotate_handle_offset_px,
        );
        for handle in Handle::CORNERS {
            frame.handles.push(HandleDraw {
                kind: HandleKind::Resize(handle),
                position: layout.handle_position(handle),
            });
        }
        frame.handles.push(HandleDraw {
            kind: HandleKind::Rotate,
            position: layout.rotate_position(),
        });
        frame.rotate_stem = Some((layout.stem_base(), layout.rotate_position()));
        return;
    }

    let showing = matches!(
        editor.mode(),
        InteractionMode::Idle | InteractionMode::Resize(_) | InteractionMode::Rotate(_)
    );
    let Some(id) = selection.single().filter(|_| showing) else {
        return;
    };
    let Some(element) = editor.document().element(id).filter(|e| !e.locked) else {
        return;
    };
    let layout = HandleLayout::new(
        &element.frame(),
        viewport,
        interaction.visual_padding_px,
        interaction.rotate_handle_offset_px,
    );
    for handle in Handle::ALL {
        frame.handles.push(HandleDraw {
            kind: HandleKind::Resize(handle),
            position: layout.handle_position(handle),
        });
    }
    frame.handles.push(HandleDraw {
        kind: HandleKind::Rotate,
        position: layout.rotate_position(),
    });
    frame.rotate_stem = Some((layout.stem_base(), layout.rotate_position()));
}

/// Build the frame for the current state.
///
/// The base fit is recomputed from the content bounds only while the editor
/// is idle and the fit debounce has settled; otherwise the last fit stays,
/// so the view does not jump under an active drag.
pub fn compose_frame(editor: &EditorState, viewport: &mut Viewport, now: Instant) -> RenderFrame {
    if editor.mode().is_idle() && !editor.fit_debounce().is_pending(now) {
        viewport.fit(editor.document().content_bounds());
    }
    let document = editor.document();
    let mut frame = RenderFrame {
        scale: viewport.scale(),
        offset: viewport.offset(),
        cursor: editor.cursor(),
        ..RenderFrame::default()
    };

    for layer in draw_order(document) {
        match layer {
            Layer::Blueprint => {
                if let Some(blueprint) = document.blueprint() {
                    frame.layers.push(LayerDraw {
                        layer,
                        frame: blueprint.frame(),
                        image_key: blueprint.image_ref.clone(),
                        color: None,
                        flip_x: false,
                        flip_y: false,
                        opacity: blueprint.opacity,
                        image: editor.images().get(&blueprint.image_ref),
                    });
                }
            }
            Layer::Element(id) => {
                if let Some(element) = document.element(id) {
                    frame.layers.push(LayerDraw {
                        layer,
                        frame: displayed_frame(editor, id, element.frame()),
                        image_key: element.asset_id.clone(),
                        color: element.color,
                        flip_x: element.flip_x,
                        flip_y: element.flip_y,
                        opacity: 1.0,
                        image: editor.images().get(&element.asset_id),
                    });
                }
            }
        }
    }

    let selection = editor.selection();
    for id in selection.iter() {
        if let Some(element) = document.element(id) {
            let shown = displayed_frame(editor, id, element.frame());
            frame.outlines.push(outline(&shown, viewport));
        }
    }
    if selection.blueprint_selected() {
        if let Some(blueprint) = document.blueprint() {
            frame.outlines.push(outline(&blueprint.frame(), viewport));
        }
    }
    selection_handles(editor, viewport, &mut frame);

    match editor.mode() {
        InteractionMode::Move(state) => frame.guides.extend(state.guides.iter().copied()),
        InteractionMode::Marquee(state) => {
            frame.marquee = Some(Bounds::from_corners(
                viewport.world_to_display(state.start),
                viewport.world_to_display(state.current),
            ));
        }
        _ => {}
    }

    let labels = document.measurement_labels();
    for element in document.elements() {
        if let Some(label) = labels.get(&element.id) {
            let shown = displayed_frame(editor, element.id, element.frame());
            frame.badges.push(Badge {
                element: element.id,
                label: label.clone(),
                position: viewport.world_to_display(shown.center()),
                length_mm: element.measured_length_mm,
            });
        }
    }
    frame
}

/// The host side of the render loop
pub trait FrameHost {
    /// Block until the next frame is due. `None` ends the loop.
    fn wait_for_next_frame(&mut self) -> Option<Instant>;

    /// Append pending input to `queue`
    fn poll_events(&mut self, queue: &mut VecDeque<InputEvent>);

    fn present(&mut self, frame: RenderFrame);
}

/// Drives an editor from a host's frames and input
#[derive(Debug, Clone)]
pub struct RenderLoop {
    viewport: Viewport,
    tints: TintCache,
    queue: VecDeque<InputEvent>,
}

impl RenderLoop {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_viewport(Viewport::new(800.0, 600.0, config.view.clone()))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            tints: TintCache::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn tints(&self) -> &TintCache {
        &self.tints
    }

    /// Queue an event for the next frame
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Route one event to the editor or the viewport
    pub fn dispatch(&mut self, editor: &mut EditorState, event: InputEvent) {
        match event {
            InputEvent::Pointer(pointer) => editor.handle_pointer(&pointer, &mut self.viewport),
            InputEvent::Key(key) => {
                editor.handle_key(&key);
            }
            InputEvent::Wheel(wheel) => {
                if wheel.modifiers.is_command() {
                    let anchor = self.viewport.client_to_display(wheel.client);
                    self.viewport.zoom_at(anchor, wheel.delta_y);
                } else {
                    self.viewport.pan_by(-wheel.delta_x, -wheel.delta_y);
                }
            }
            InputEvent::FocusLost => editor.cancel_interaction(),
            InputEvent::Resize { width, height } => self.viewport.set_canvas_size(width, height),
        }
    }

    /// Swap tinted images in for coloured elements and drop stale tints
    fn apply_tints(&mut self, frame: &mut RenderFrame) {
        let mut tinted = Vec::new();
        for draw in &mut frame.layers {
            let (Layer::Element(id), Some(color), Some(source)) =
                (draw.layer, draw.color, draw.image.as_ref())
            else {
                continue;
            };
            let width = draw.frame.width.round().max(1.0) as u32;
            let height = draw.frame.height.round().max(1.0) as u32;
            draw.image = Some(self.tints.get_or_render(id, source, color, width, height));
            tinted.push(id);
        }
        self.tints.retain(|id| tinted.contains(&id));
    }

    /// Compose one frame at `now`, with tints applied
    pub fn frame(&mut self, editor: &EditorState, now: Instant) -> RenderFrame {
        let mut frame = compose_frame(editor, &mut self.viewport, now);
        self.apply_tints(&mut frame);
        frame
    }

    /// Run until the host stops handing out frames. Returns the frame count.
    pub fn run(&mut self, editor: &mut EditorState, host: &mut impl FrameHost) -> usize {
        let mut frames = 0;
        while let Some(now) = host.wait_for_next_frame() {
            host.poll_events(&mut self.queue);
            while let Some(event) = self.queue.pop_front() {
                self.dispatch(editor, event);
            }
            let frame = self.frame(editor, now);
            host.present(frame);
            frames += 1;
        }
        tracing::debug!(frames, "render loop finished");
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, PointerEvent, WheelEvent};
    use gutterkit_core::AssetKind;

    #[test]
    fn test_debounce() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(100));
        assert!(!debounce.is_pending(start));
        debounce.trigger(start);
        assert!(debounce.is_pending(start + Duration::from_millis(99)));
        assert!(!debounce.is_pending(start + Duration::from_millis(100)));
        debounce.trigger(start + Duration::from_millis(50));
        assert!(debounce.is_pending(start + Duration::from_millis(120)));
    }

    fn editor_with_element() -> (EditorState, ElementId) {
        let mut editor = EditorState::default();
        let id = editor.place_loaded(
            "GUT-SC-MAR-3M",
            AssetKind::from_asset_id("GUT-SC-MAR-3M"),
            Arc::new(RgbaImage::from_pixel(300, 30, image::Rgba([0, 0, 0, 255]))),
            Point::new(400.0, 300.0),
        );
        (editor, id)
    }

    #[test]
    fn test_compose_lists_layers_badges_and_handles() {
        let (editor, id) = editor_with_element();
        let mut viewport = Viewport::default();
        let frame = compose_frame(&editor, &mut viewport, Instant::now() + Duration::from_secs(1));
        assert_eq!(frame.layers.len(), 1);
        assert_eq!(frame.layers[0].layer, Layer::Element(id));
        assert!(frame.layers[0].image.is_some());
        assert_eq!(frame.badges.len(), 1);
        assert_eq!(frame.badges[0].label, "1");
        assert_eq!(frame.outlines.len(), 1);
        // eight resize handles and the knob
        assert_eq!(frame.handles.len(), 9);
        assert!(frame.rotate_stem.is_some());
    }

    #[test]
    fn test_tints_follow_colour() {
        let (mut editor, _) = editor_with_element();
        let mut render = RenderLoop::new(editor.config());
        let later = Instant::now() + Duration::from_secs(1);
        render.frame(&editor, later);
        assert!(render.tints().is_empty());

        editor.set_selection_color(Some("#336699".parse().unwrap()));
        let frame = render.frame(&editor, later + Duration::from_secs(1));
        assert_eq!(render.tints().len(), 1);
        let tinted = frame.layers[0].image.as_ref().unwrap();
        assert_eq!(tinted.get_pixel(0, 0).0, [0x33, 0x66, 0x99, 255]);

        editor.set_selection_color(None);
        render.frame(&editor, later + Duration::from_secs(2));
        assert!(render.tints().is_empty());
    }

    #[test]
    fn test_wheel_routes_to_viewport() {
        let mut editor = EditorState::default();
        let mut render = RenderLoop::new(editor.config());
        render.dispatch(
            &mut editor,
            InputEvent::Wheel(WheelEvent {
                client: Point::new(400.0, 300.0),
                delta_x: 0.0,
                delta_y: -1.0,
                modifiers: Modifiers::command(),
            }),
        );
        assert!(render.viewport().zoom() > 1.0);
    }

    struct ScriptedHost {
        frames: VecDeque<(Instant, Vec<InputEvent>)>,
        presented: Vec<RenderFrame>,
    }

    impl FrameHost for ScriptedHost {
        fn wait_for_next_frame(&mut self) -> Option<Instant> {
            self.frames.front().map(|(now, _)| *now)
        }

        fn poll_events(&mut self, queue: &mut VecDeque<InputEvent>) {
            if let Some((_, events)) = self.frames.pop_front() {
                queue.extend(events);
            }
        }

        fn present(&mut self, frame: RenderFrame) {
            self.presented.push(frame);
        }
    }

    #[test]
    fn test_run_drains_events_each_frame() {
        // a long debounce keeps the identity view for the whole run
        let mut config = EditorConfig::default();
        config.interaction.bbox_debounce_ms = 60_000;
        let mut editor = EditorState::new(config);
        let id = editor.place_loaded(
            "GUT-SC-MAR-3M",
            AssetKind::from_asset_id("GUT-SC-MAR-3M"),
            Arc::new(RgbaImage::new(300, 30)),
            Point::new(400.0, 300.0),
        );
        editor.clear_selection();
        let start = editor.document().element(id).unwrap().frame();
        let center = start.center();
        let mut render = RenderLoop::with_viewport(Viewport::default());
        let now = Instant::now();
        let mut host = ScriptedHost {
            frames: VecDeque::from(vec![
                (now, vec![InputEvent::Pointer(PointerEvent::down(center.x, center.y))]),
                (now, vec![InputEvent::Pointer(PointerEvent::moved(center.x + 50.0, center.y))]),
                (now, vec![InputEvent::FocusLost]),
            ]),
            presented: Vec::new(),
        };
        let frames = render.run(&mut editor, &mut host);
        assert_eq!(frames, 3);
        let preview = host.presented[1].layers[0].frame;
        assert!((preview.x - start.x - 50.0).abs() < 1e-9);
        // focus loss cancelled the drag
        assert!(editor.mode().is_idle());
        assert_eq!(editor.document().element(id).unwrap().frame(), start);
        assert_eq!(editor.history().elements.undo_depth(), 1);
    }
}
