//! Rotate-handle drag

use crate::geometry::Point;
use crate::snapping::{constrain_rotation, snap_rotation, ConstrainedRotation};
use gutterkit_settings::{RotationBand, SnapSettings};

/// Angle bookkeeping captured when a rotate drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateGrip {
    pub center: Point,
    pub start_rotation: f64,
    /// Pointer angle about `center` at grab time, degrees
    pub grab_angle: f64,
}

impl RotateGrip {
    pub fn new(center: Point, start_rotation: f64, grab: Point) -> Self {
        Self {
            center,
            start_rotation,
            grab_angle: grab.angle_from(&center),
        }
    }

    /// Unsnapped rotation for the pointer at `pointer`
    pub fn raw_rotation(&self, pointer: Point) -> f64 {
        self.start_rotation + (pointer.angle_from(&self.center) - self.grab_angle)
    }
}

/// Modifier state that changes rotate behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotateModifiers {
    /// Round to the configured step instead of magnetic right angles
    pub stepped: bool,
    /// Ignore the forbidden band
    pub override_band: bool,
}

/// Rotation for the pointer at `pointer`, snapped and constrained
///
/// `previous` is the element's rotation before this update and decides
/// which band edge a forbidden angle clamps to.
pub fn rotate_to(
    grip: &RotateGrip,
    pointer: Point,
    previous: f64,
    modifiers: RotateModifiers,
    snap: &SnapSettings,
    band: Option<&RotationBand>,
) -> ConstrainedRotation {
    let snapped = snap_rotation(
        grip.raw_rotation(pointer),
        modifiers.stepped,
        snap.rotation_step_deg,
        snap.rotation_magnetic_deg,
    );
    if modifiers.override_band {
        return ConstrainedRotation {
            degrees: snapped,
            constrained: false,
        };
    }
    constrain_rotation(snapped, previous, band)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gutter_band() -> RotationBand {
        RotationBand {
            kind: "gutter".to_string(),
            min_deg: 60.0,
            max_deg: 80.0,
        }
    }

    #[test]
    fn test_relative_to_grab_angle() {
        let grip = RotateGrip::new(Point::new(0.0, 0.0), 30.0, Point::new(0.0, -10.0));
        // Grabbed straight up (-90), now pointing right (0): +90
        let r = grip.raw_rotation(Point::new(10.0, 0.0));
        assert!((r - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_to_snaps_then_constrains() {
        let grip = RotateGrip::new(Point::new(0.0, 0.0), 0.0, Point::new(10.0, 0.0));
        let toward = |deg: f64| {
            let rad = deg.to_radians();
            Point::new(rad.cos() * 10.0, rad.sin() * 10.0)
        };
        let snap = SnapSettings::default();
        let band = gutter_band();

        let r = rotate_to(&grip, toward(70.0), 40.0, RotateModifiers::default(), &snap, Some(&band));
        assert!(r.constrained);
        assert_eq!(r.degrees, 60.0);

        let r = rotate_to(&grip, toward(86.0), 40.0, RotateModifiers::default(), &snap, Some(&band));
        assert_eq!(r.degrees, 90.0);

        let free = RotateModifiers {
            stepped: false,
            override_band: true,
        };
        let r = rotate_to(&grip, toward(70.0), 40.0, free, &snap, Some(&band));
        assert!(!r.constrained);
        assert!((r.degrees - 70.0).abs() < 1e-9);

        let stepped = RotateModifiers {
            stepped: true,
            override_band: true,
        };
        let r = rotate_to(&grip, toward(52.0), 40.0, stepped, &snap, Some(&band));
        assert_eq!(r.degrees, 45.0);
    }
}
