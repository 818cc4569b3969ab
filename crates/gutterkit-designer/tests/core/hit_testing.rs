use gutterkit_core::AssetKind;
use gutterkit_designer::geometry::{Frame, Point};
use gutterkit_designer::layers::{bring_to_front, draw_order, send_to_back, Layer};
use gutterkit_designer::model::{Blueprint, ElementId};
use gutterkit_designer::selection_manager::{hit_stack, marquee_select, pick, HitTarget, Selection};
use gutterkit_designer::Document;

fn add(doc: &mut Document, frame: Frame) -> ElementId {
    doc.create_element("BRK-SC-MAR", AssetKind::from_asset_id("BRK-SC-MAR"), frame)
}

#[test]
fn test_later_element_stacks_on_top() {
    let mut doc = Document::new();
    let big = add(&mut doc, Frame::new(0.0, 0.0, 200.0, 200.0, 0.0));
    let small = add(&mut doc, Frame::new(50.0, 50.0, 20.0, 20.0, 0.0));

    let stack = hit_stack(&doc, Point::new(60.0, 60.0));
    let targets: Vec<_> = stack.iter().map(|c| c.target).collect();
    assert_eq!(targets, vec![HitTarget::Element(small), HitTarget::Element(big)]);
    assert!(hit_stack(&doc, Point::new(500.0, 500.0)).is_empty());
}

#[test]
fn test_smaller_wins_at_equal_z() {
    let mut doc = Document::new();
    let small = add(&mut doc, Frame::new(50.0, 50.0, 20.0, 20.0, 0.0));
    let big = add(&mut doc, Frame::new(0.0, 0.0, 200.0, 200.0, 0.0));
    let z = doc.element(small).unwrap().z_index;
    doc.element_mut(big).unwrap().z_index = z;

    let top = hit_stack(&doc, Point::new(60.0, 60.0))[0].target;
    assert_eq!(top, HitTarget::Element(small));
}

#[test]
fn test_rotated_box_hit() {
    let mut doc = Document::new();
    // 200x20 bar rotated 90 degrees about its centre (100, 10)
    let bar = add(&mut doc, Frame::new(0.0, 0.0, 200.0, 20.0, 90.0));
    assert_eq!(
        pick(&doc, &Selection::new(), Point::new(100.0, 90.0), false),
        Some(HitTarget::Element(bar))
    );
    assert_eq!(pick(&doc, &Selection::new(), Point::new(10.0, 10.0), false), None);
}

#[test]
fn test_alt_click_drills_below_selection() {
    let mut doc = Document::new();
    let big = add(&mut doc, Frame::new(0.0, 0.0, 200.0, 200.0, 0.0));
    let small = add(&mut doc, Frame::new(50.0, 50.0, 20.0, 20.0, 0.0));
    let mut selection = Selection::new();
    let p = Point::new(60.0, 60.0);

    assert_eq!(pick(&doc, &selection, p, true), Some(HitTarget::Element(small)));
    selection.set(&[small]);
    assert_eq!(pick(&doc, &selection, p, true), Some(HitTarget::Element(big)));
    assert_eq!(pick(&doc, &selection, p, false), Some(HitTarget::Element(small)));
}

#[test]
fn test_locked_blueprint_is_not_hit() {
    let mut doc = Document::new();
    doc.set_blueprint(Blueprint::new("plan.png", 1000.0, 800.0));
    let p = Point::new(500.0, 500.0);
    assert_eq!(pick(&doc, &Selection::new(), p, false), Some(HitTarget::Blueprint));

    doc.blueprint_mut().unwrap().locked = true;
    assert_eq!(pick(&doc, &Selection::new(), p, false), None);
}

#[test]
fn test_marquee_window_and_crossing() {
    let mut doc = Document::new();
    let inside = add(&mut doc, Frame::new(10.0, 10.0, 20.0, 20.0, 0.0));
    let straddling = add(&mut doc, Frame::new(90.0, 10.0, 20.0, 20.0, 0.0));

    let window = marquee_select(&doc, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
    assert_eq!(window, vec![inside]);

    let crossing = marquee_select(&doc, Point::new(100.0, 100.0), Point::new(0.0, 0.0));
    assert_eq!(crossing, vec![inside, straddling]);
}

#[test]
fn test_z_order_moves_whole_groups() {
    let mut doc = Document::new();
    let a = add(&mut doc, Frame::new(0.0, 0.0, 10.0, 10.0, 0.0));
    let b = add(&mut doc, Frame::new(20.0, 0.0, 10.0, 10.0, 0.0));
    let c = add(&mut doc, Frame::new(40.0, 0.0, 10.0, 10.0, 0.0));
    doc.create_group(&[a, b]);
    doc.set_blueprint(Blueprint::new("plan.png", 100.0, 100.0));

    assert!(bring_to_front(&mut doc, &[a]));
    let order = draw_order(&doc);
    assert_eq!(
        order,
        vec![
            Layer::Blueprint,
            Layer::Element(c),
            Layer::Element(a),
            Layer::Element(b)
        ]
    );

    // back means beneath the blueprint too
    assert!(send_to_back(&mut doc, &[c]));
    assert_eq!(draw_order(&doc)[0], Layer::Element(c));
    assert!(!bring_to_front(&mut doc, &[ElementId(999)]));
}
