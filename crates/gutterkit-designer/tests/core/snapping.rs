use gutterkit_designer::geometry::{normalize_angle_signed, Bounds, Frame};
use gutterkit_designer::snapping::{constrain_rotation, nudge_clear_of, snap_to_grid};
use gutterkit_settings::RotationBand;
use proptest::prelude::*;

fn gutter_band() -> RotationBand {
    RotationBand {
        kind: "gutter".to_string(),
        min_deg: 60.0,
        max_deg: 80.0,
    }
}

proptest! {
    #[test]
    fn grid_snap_is_idempotent(value in -1.0e6f64..1.0e6, step in 0.5f64..100.0) {
        let once = snap_to_grid(value, step);
        prop_assert_eq!(snap_to_grid(once, step), once);
        prop_assert!((once - value).abs() <= step / 2.0 + 1e-9);
    }

    #[test]
    fn rotation_never_lands_inside_band(deg in -720.0f64..720.0, previous in -180.0f64..180.0) {
        let band = gutter_band();
        let result = constrain_rotation(deg, previous, Some(&band));
        prop_assert!(!band.contains(normalize_angle_signed(result.degrees)));
        if result.constrained {
            prop_assert!(result.degrees == band.min_deg || result.degrees == band.max_deg);
        } else {
            prop_assert_eq!(result.degrees, deg);
        }
    }
}

#[test]
fn test_band_clamps_to_side_of_approach() {
    let band = gutter_band();
    let from_below = constrain_rotation(75.0, 50.0, Some(&band));
    assert!(from_below.constrained);
    assert_eq!(from_below.degrees, 60.0);

    let from_above = constrain_rotation(65.0, 85.0, Some(&band));
    assert_eq!(from_above.degrees, 80.0);

    // boundaries are allowed
    assert!(!constrain_rotation(60.0, 50.0, Some(&band)).constrained);
    assert!(!constrain_rotation(70.0, 50.0, None).constrained);
}

#[test]
fn test_nudge_moves_clear_of_neighbours() {
    let occupied = [Bounds::new(0.0, 0.0, 100.0, 100.0)];
    let frame = Frame::new(10.0, 10.0, 50.0, 50.0, 0.0);
    let placed = nudge_clear_of(frame, &occupied, 20.0, 8.0, 48);
    assert!(!placed.bounds().intersects(&occupied[0], 8.0));
    assert_eq!((placed.width, placed.height), (50.0, 50.0));

    let clear = Frame::new(300.0, 300.0, 50.0, 50.0, 0.0);
    assert_eq!(nudge_clear_of(clear, &occupied, 20.0, 8.0, 48), clear);
}

#[test]
fn test_nudge_gives_up_after_budget() {
    let occupied = [Bounds::new(-1.0e4, -1.0e4, 1.0e4, 1.0e4)];
    let frame = Frame::new(0.0, 0.0, 50.0, 50.0, 0.0);
    assert_eq!(nudge_clear_of(frame, &occupied, 20.0, 8.0, 16), frame);
}
