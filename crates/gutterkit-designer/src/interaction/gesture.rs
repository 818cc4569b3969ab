//! Two-pointer pinch / twist on a single element

use crate::geometry::{Frame, Point};

/// One contact of a two-pointer gesture, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub pointer_id: u32,
    pub start: Point,
    pub current: Point,
}

impl TouchPoint {
    pub fn new(pointer_id: u32, at: Point) -> Self {
        Self {
            pointer_id,
            start: at,
            current: at,
        }
    }
}

/// Frame produced by the gesture before any rotation band is applied
///
/// The midpoint delta translates the element, the distance ratio scales
/// both sides (aspect kept, then floored at `min_dimension` with the ratio
/// re-applied) and the change in the angle between the contacts rotates it.
pub fn gesture_frame(start: &Frame, a: &TouchPoint, b: &TouchPoint, min_dimension: f64) -> Frame {
    let start_mid = a.start.midpoint(&b.start);
    let mid = a.current.midpoint(&b.current);
    let start_distance = a.start.distance_to(&b.start);
    let distance = a.current.distance_to(&b.current);
    let factor = if start_distance > f64::EPSILON && distance.is_finite() {
        distance / start_distance
    } else {
        1.0
    };

    let mut width = start.width * factor;
    let mut height = start.height * factor;
    if start.width > 0.0 && start.height > 0.0 {
        let ratio = start.width / start.height;
        width = width.max(min_dimension);
        height = height.max(min_dimension);
        width = width.max(height * ratio);
        height = width / ratio;
    }

    let twist = b.current.angle_from(&a.current) - b.start.angle_from(&a.start);
    let center = start.center() + (mid - start_mid);
    Frame::new(0.0, 0.0, width, height, start.rotation + twist).with_center(center)
}
