use gutterkit_designer::geometry::{Frame, Point};
use gutterkit_designer::interaction::{resize_frame, Handle, ResizeMode};
use proptest::prelude::*;

const MIN: f64 = 10.0;

fn any_handle() -> impl Strategy<Value = Handle> {
    prop::sample::select(Handle::ALL.to_vec())
}

proptest! {
    #[test]
    fn resize_respects_floor(
        w in 10.0f64..500.0,
        h in 10.0f64..500.0,
        rotation in 0.0f64..360.0,
        px in -1000.0f64..1000.0,
        py in -1000.0f64..1000.0,
        handle in any_handle(),
    ) {
        let start = Frame::new(0.0, 0.0, w, h, rotation);
        let free = resize_frame(&start, handle, Point::new(px, py), ResizeMode::Free, MIN);
        prop_assert!(free.width >= MIN && free.height >= MIN);
    }

    #[test]
    fn keep_aspect_preserves_ratio(
        w in 10.0f64..500.0,
        h in 10.0f64..500.0,
        px in -1000.0f64..1000.0,
        py in -1000.0f64..1000.0,
        handle in any_handle(),
    ) {
        let start = Frame::new(0.0, 0.0, w, h, 0.0);
        let out = resize_frame(&start, handle, Point::new(px, py), ResizeMode::KeepAspect, MIN);
        prop_assert!(out.width >= MIN - 1e-9 && out.height >= MIN - 1e-9);
        let ratio = out.width / out.height;
        prop_assert!((ratio - w / h).abs() <= 1e-6 * (w / h).max(1.0));
    }
}

#[test]
fn test_linear_parts_resize_freely() {
    assert_eq!(ResizeMode::for_element(true, false), ResizeMode::Free);
    assert_eq!(ResizeMode::for_element(false, false), ResizeMode::KeepAspect);
    assert_eq!(ResizeMode::for_element(false, true), ResizeMode::Free);
}

#[test]
fn test_corner_keep_aspect_takes_larger_candidate() {
    let start = Frame::new(0.0, 0.0, 100.0, 50.0, 0.0);
    let out = resize_frame(&start, Handle::SE, Point::new(150.0, 100.0), ResizeMode::KeepAspect, MIN);
    assert!((out.width - 200.0).abs() < 1e-9);
    assert!((out.height - 100.0).abs() < 1e-9);
    assert!(out.x.abs() < 1e-9 && out.y.abs() < 1e-9);
}
