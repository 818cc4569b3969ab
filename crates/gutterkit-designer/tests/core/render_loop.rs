use std::sync::Arc;
use std::time::{Duration, Instant};

use gutterkit_core::AssetKind;
use gutterkit_designer::geometry::Point;
use gutterkit_designer::input::PointerEvent;
use gutterkit_designer::render::compose_frame;
use gutterkit_designer::{EditorState, Viewport};
use gutterkit_settings::EditorConfig;
use image::RgbaImage;

const SETTLED: Duration = Duration::from_secs(20);

fn slow_fit_editor() -> EditorState {
    let mut config = EditorConfig::default();
    config.interaction.bbox_debounce_ms = 10_000;
    EditorState::new(config)
}

#[test]
fn test_fit_waits_for_debounce() {
    let mut editor = slow_fit_editor();
    let mut viewport = Viewport::default();
    editor.place_loaded(
        "BRK-SC-MAR",
        AssetKind::from_asset_id("BRK-SC-MAR"),
        Arc::new(RgbaImage::new(40, 40)),
        Point::new(300.0, 300.0),
    );

    let frame = compose_frame(&editor, &mut viewport, Instant::now());
    assert_eq!(frame.scale, 1.0);

    let frame = compose_frame(&editor, &mut viewport, Instant::now() + SETTLED);
    assert!(frame.scale > 1.0);
}

#[test]
fn test_drag_keeps_last_fit_until_settled() {
    let mut editor = slow_fit_editor();
    let mut viewport = Viewport::default();
    let id = editor.place_loaded(
        "BRK-SC-MAR",
        AssetKind::from_asset_id("BRK-SC-MAR"),
        Arc::new(RgbaImage::new(40, 40)),
        Point::new(300.0, 300.0),
    );
    let fitted = compose_frame(&editor, &mut viewport, Instant::now() + SETTLED);

    let grab = viewport.world_to_display(editor.document().element(id).unwrap().center());
    editor.handle_pointer(&PointerEvent::down(grab.x, grab.y), &mut viewport);
    editor.handle_pointer(&PointerEvent::moved(grab.x + 120.0, grab.y), &mut viewport);

    // mid-drag: no refit even with the debounce long settled
    let during = compose_frame(&editor, &mut viewport, Instant::now() + SETTLED * 2);
    assert_eq!((during.scale, during.offset), (fitted.scale, fitted.offset));
    assert!(during.layers[0].frame.x > editor.document().element(id).unwrap().x);

    editor.handle_pointer(&PointerEvent::up(grab.x + 120.0, grab.y), &mut viewport);
    let pending = compose_frame(&editor, &mut viewport, Instant::now());
    assert_eq!((pending.scale, pending.offset), (fitted.scale, fitted.offset));

    let settled = compose_frame(&editor, &mut viewport, Instant::now() + SETTLED);
    assert_ne!(settled.offset, fitted.offset);
}

#[test]
fn test_marquee_is_drawn_in_display_space() {
    let mut editor = slow_fit_editor();
    let mut viewport = Viewport::default();
    editor.handle_pointer(&PointerEvent::down(10.0, 10.0), &mut viewport);
    editor.handle_pointer(&PointerEvent::moved(110.0, 60.0), &mut viewport);

    let frame = compose_frame(&editor, &mut viewport, Instant::now());
    let marquee = frame.marquee.unwrap();
    assert_eq!((marquee.min_x, marquee.min_y), (10.0, 10.0));
    assert_eq!((marquee.max_x, marquee.max_y), (110.0, 60.0));
}
