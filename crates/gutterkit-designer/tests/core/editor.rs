use std::sync::Arc;

use gutterkit_core::AssetKind;
use gutterkit_designer::geometry::Point;
use gutterkit_designer::input::{Key, KeyEvent, Modifiers, PointerEvent};
use gutterkit_designer::{
    Blueprint, DesignerError, DiagramData, EditorState, Element, Group, MemoryCatalog, Viewport,
};
use image::{Rgba, RgbaImage};

/// Everything a user can see; id counters never rewind and are left out
fn content(editor: &EditorState) -> (Vec<Element>, Option<Blueprint>, Vec<Group>) {
    let snapshot = editor.document().snapshot();
    (snapshot.elements, snapshot.blueprint, snapshot.groups)
}

fn drag(editor: &mut EditorState, viewport: &mut Viewport, from: Point, to: Point) {
    editor.handle_pointer(&PointerEvent::down(from.x, from.y), viewport);
    editor.handle_pointer(&PointerEvent::moved(to.x, to.y), viewport);
    editor.handle_pointer(&PointerEvent::up(to.x, to.y), viewport);
}

fn click(editor: &mut EditorState, viewport: &mut Viewport, at: Point) {
    editor.handle_pointer(&PointerEvent::down(at.x, at.y), viewport);
    editor.handle_pointer(&PointerEvent::up(at.x, at.y), viewport);
}

fn catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    catalog.insert("GUT-SC-MAR-3M", RgbaImage::from_pixel(300, 30, Rgba([0, 0, 0, 255])));
    catalog.insert("BRK-SC-MAR", RgbaImage::new(40, 40));
    catalog
}

#[tokio::test]
async fn test_failed_load_leaves_model_untouched() {
    let mut editor = EditorState::default();
    let catalog = catalog();
    editor
        .place_asset(&catalog, "BRK-SC-MAR", Point::new(100.0, 100.0))
        .await
        .unwrap();
    let before = editor.document().snapshot();
    let selection = editor.selection().clone();
    let depth = editor.history().elements.undo_depth();

    let err = editor
        .place_asset(&catalog, "NOT-A-PART", Point::new(300.0, 300.0))
        .await
        .unwrap_err();
    assert!(matches!(err, DesignerError::UnknownAsset(ref id) if id == "NOT-A-PART"));
    assert_eq!(editor.document().snapshot(), before);
    assert_eq!(editor.selection(), &selection);
    assert_eq!(editor.history().elements.undo_depth(), depth);
}

#[tokio::test]
async fn test_placed_gutter_is_quoted() {
    let mut editor = EditorState::default();
    let id = editor
        .place_asset(&catalog(), "GUT-SC-MAR-3M", Point::new(200.0, 200.0))
        .await
        .unwrap();
    assert!(editor.set_measured_length(id, 4500));

    let lines = editor.material_lines().unwrap();
    let total: u32 = lines
        .iter()
        .filter(|l| l.asset_id.starts_with("GUT-"))
        .map(|l| l.quantity * AssetKind::from_asset_id(&l.asset_id).standard_length_mm())
        .sum();
    assert!(total >= 4500);
}

#[test]
fn test_undo_redo_through_a_session() {
    let mut editor = EditorState::default();
    let mut viewport = Viewport::default();
    let empty = content(&editor);

    let id = editor.place_loaded(
        "BRK-SC-MAR",
        AssetKind::from_asset_id("BRK-SC-MAR"),
        Arc::new(RgbaImage::new(40, 40)),
        Point::new(100.0, 100.0),
    );
    let placed = content(&editor);

    // drag the element 200 to the right
    let center = editor.document().element(id).unwrap().center();
    drag(&mut editor, &mut viewport, center, Point::new(center.x + 200.0, center.y));
    let moved = content(&editor);
    assert_ne!(moved, placed);

    let command = Modifiers::command();
    assert!(editor.handle_key(&KeyEvent::new(Key::Char('z'), command)));
    assert_eq!(content(&editor), placed);
    assert!(editor.undo());
    assert_eq!(content(&editor), empty);
    assert!(!editor.undo());

    assert!(editor.redo());
    assert!(editor.handle_key(&KeyEvent::new(Key::Char('z'), command.with_shift())));
    assert_eq!(content(&editor), moved);
}

#[test]
fn test_move_resize_rotate_delete_unwind_and_replay() {
    let mut editor = EditorState::default();
    let mut viewport = Viewport::default();
    let mut states = vec![content(&editor)];
    let id = editor.place_loaded(
        "BRK-SC-MAR",
        AssetKind::from_asset_id("BRK-SC-MAR"),
        Arc::new(RgbaImage::new(40, 40)),
        Point::new(200.0, 200.0),
    );
    states.push(content(&editor));
    let element = |editor: &EditorState| editor.document().element(id).unwrap().clone();

    // move
    let center = element(&editor).center();
    click(&mut editor, &mut viewport, center);
    drag(&mut editor, &mut viewport, center, Point::new(center.x + 120.0, center.y + 60.0));
    assert_ne!(element(&editor).x, states[1].0[0].x);
    states.push(content(&editor));

    // resize from the SE handle, 10 outside the corner
    let e = element(&editor);
    let corner = Point::new(e.x + e.width + 10.0, e.y + e.height + 10.0);
    drag(&mut editor, &mut viewport, corner, Point::new(corner.x + 40.0, corner.y + 40.0));
    assert!(element(&editor).width > e.width);
    states.push(content(&editor));

    // rotate by the knob, 40 above the padded top edge, to a quarter turn
    let e = element(&editor);
    let center = e.center();
    let knob = Point::new(center.x, e.y - 10.0 - 40.0);
    drag(&mut editor, &mut viewport, knob, Point::new(center.x + 100.0, center.y));
    assert_ne!(element(&editor).rotation, e.rotation);
    states.push(content(&editor));

    // delete
    let at = element(&editor).center();
    click(&mut editor, &mut viewport, at);
    assert!(editor.handle_key(&KeyEvent::plain(Key::Delete)));
    assert!(editor.document().is_empty());
    states.push(content(&editor));

    for expected in states.iter().rev().skip(1) {
        assert!(editor.undo());
        assert_eq!(&content(&editor), expected);
    }
    assert!(!editor.undo());
    for expected in states.iter().skip(1) {
        assert!(editor.redo());
        assert_eq!(&content(&editor), expected);
    }
    assert!(!editor.redo());
}

#[test]
fn test_blueprint_edits_undo_on_their_own_stream() {
    let mut editor = EditorState::default();
    editor.set_blueprint("plan.png", Arc::new(RgbaImage::new(800, 600)));
    assert!(editor.select_blueprint());
    assert!(editor.set_blueprint_locked(true));
    assert!(editor.set_blueprint_opacity(0.4));
    assert!(!editor.can_redo_blueprint());

    assert!(editor.undo_blueprint());
    let blueprint = editor.document().blueprint().unwrap();
    assert_eq!(blueprint.opacity, 1.0);
    assert!(blueprint.locked);
    assert!(editor.undo_blueprint());
    assert!(!editor.document().blueprint().unwrap().locked);

    // adding the blueprint itself is a document edit
    assert!(editor.undo());
    assert!(editor.document().blueprint().is_none());
}

#[test]
fn test_diagram_round_trip_through_json() {
    let mut editor = EditorState::default();
    let id = editor.place_loaded(
        "GUT-SC-MAR-3M",
        AssetKind::from_asset_id("GUT-SC-MAR-3M"),
        Arc::new(RgbaImage::new(300, 30)),
        Point::new(200.0, 200.0),
    );
    editor.set_measured_length(id, 3200);
    let json = editor.to_diagram().to_json().unwrap();

    let mut restored = EditorState::default();
    restored.load_diagram(DiagramData::from_json(&json).unwrap());
    let element = restored.document().element(id).unwrap();
    assert_eq!(element.measured_length_mm, 3200);
    assert!(element.kind.is_gutter());
    assert!(!restored.can_undo());
}
