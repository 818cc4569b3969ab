//! Snapping rules
//!
//! Grid snapping, rotation snapping with the per-kind forbidden bands,
//! alignment guides against other elements, and the overlap nudge used when
//! a new element is dropped.

use crate::geometry::{normalize_angle_positive, normalize_angle_signed, Bounds, Frame};
use gutterkit_settings::RotationBand;

/// Round `value` to the nearest multiple of `step`
///
/// A non-positive or non-finite step leaves the value unchanged.
pub fn snap_to_grid(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step).round() * step
}

/// Snap a free rotation
///
/// With `stepped` (Shift held) the angle rounds to `step_deg`. Otherwise it
/// is normalized to [0, 360) and pulled onto the nearest right angle when
/// within `magnetic_deg` of it.
pub fn snap_rotation(deg: f64, stepped: bool, step_deg: f64, magnetic_deg: f64) -> f64 {
    if stepped {
        return snap_to_grid(deg, step_deg);
    }
    let angle = normalize_angle_positive(deg);
    for target in [0.0, 90.0, 180.0, 270.0, 360.0] {
        if (angle - target).abs() <= magnetic_deg {
            return target % 360.0;
        }
    }
    angle
}

/// Outcome of applying a rotation band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstrainedRotation {
    pub degrees: f64,
    pub constrained: bool,
}

/// Keep an angle out of a forbidden band
///
/// An angle strictly inside the band is clamped to the edge on the side the
/// element came from: `min` when `previous` sits below the band midpoint,
/// `max` otherwise. Using the previous angle stops the result flipping edges
/// while the pointer hovers near the midpoint.
pub fn constrain_rotation(
    degrees: f64,
    previous: f64,
    band: Option<&RotationBand>,
) -> ConstrainedRotation {
    let unconstrained = ConstrainedRotation {
        degrees,
        constrained: false,
    };
    let Some(band) = band else {
        return unconstrained;
    };
    if !band.contains(normalize_angle_signed(degrees)) {
        return unconstrained;
    }
    let degrees = if normalize_angle_signed(previous) < band.midpoint() {
        band.min_deg
    } else {
        band.max_deg
    };
    ConstrainedRotation {
        degrees,
        constrained: true,
    }
}

/// Axis of an alignment guide line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// Line of constant x
    Vertical,
    /// Line of constant y
    Horizontal,
}

/// A matched alignment line, drawn while it applies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f64,
}

/// Result of alignment snapping a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentSnap {
    pub frame: Frame,
    pub vertical: Option<Guide>,
    pub horizontal: Option<Guide>,
}

impl AlignmentSnap {
    pub fn guides(&self) -> impl Iterator<Item = Guide> {
        self.vertical.into_iter().chain(self.horizontal)
    }
}

/// Start, centre and end of a span
fn span_lines(start: f64, length: f64) -> [f64; 3] {
    [start, start + length / 2.0, start + length]
}

/// Snap one axis: the first guide line within `threshold` of the mover's
/// start, centre or end wins. Returns the new start and the matched line.
fn snap_axis(start: f64, length: f64, lines: &[f64], threshold: f64) -> Option<(f64, f64)> {
    let mover = span_lines(start, length);
    for &line in lines {
        for (index, &edge) in mover.iter().enumerate() {
            if (edge - line).abs() <= threshold {
                let new_start = line - length * index as f64 / 2.0;
                return Some((new_start, line));
            }
        }
    }
    None
}

/// Snap a moving frame to the edges and centres of other frames
///
/// Lines are taken from each other frame's unrotated box: left, centre-x,
/// right for the vertical axis and top, centre-y, bottom for the horizontal.
/// Callers leave the moving elements and the blueprint out of `others`.
pub fn snap_to_alignment<'a>(
    frame: Frame,
    others: impl IntoIterator<Item = &'a Frame>,
    threshold: f64,
) -> AlignmentSnap {
    let mut vertical_lines = Vec::new();
    let mut horizontal_lines = Vec::new();
    for other in others {
        vertical_lines.extend(span_lines(other.x, other.width));
        horizontal_lines.extend(span_lines(other.y, other.height));
    }

    let mut snapped = frame;
    let vertical = snap_axis(frame.x, frame.width, &vertical_lines, threshold).map(|(x, line)| {
        snapped.x = x;
        Guide {
            axis: GuideAxis::Vertical,
            position: line,
        }
    });
    let horizontal =
        snap_axis(frame.y, frame.height, &horizontal_lines, threshold).map(|(y, line)| {
            snapped.y = y;
            Guide {
                axis: GuideAxis::Horizontal,
                position: line,
            }
        });
    AlignmentSnap {
        frame: snapped,
        vertical,
        horizontal,
    }
}

/// Ring directions tried by the overlap nudge, in order
const NUDGE_DIRECTIONS: [(f64, f64); 8] = [
    (0.0, -1.0),  // N
    (0.0, 1.0),   // S
    (1.0, 0.0),   // E
    (-1.0, 0.0),  // W
    (1.0, -1.0),  // NE
    (-1.0, -1.0), // NW
    (1.0, 1.0),   // SE
    (-1.0, 1.0),  // SW
];

/// Nudge a dropped frame clear of existing elements
///
/// Tries rings `k = 1, 2, ...` of offsets N, S, E, W, NE, NW, SE, SW times
/// `k * step` until the frame's bounds, grown by `gap`, touch nothing in
/// `occupied`. Gives up after `budget` attempts and returns the frame as
/// given.
pub fn nudge_clear_of(
    frame: Frame,
    occupied: &[Bounds],
    step: f64,
    gap: f64,
    budget: usize,
) -> Frame {
    let is_clear = |candidate: &Frame| {
        let bounds = candidate.bounds();
        !occupied.iter().any(|other| bounds.intersects(other, gap))
    };
    if is_clear(&frame) {
        return frame;
    }
    let mut attempts = 0;
    for ring in 1.. {
        for (dx, dy) in NUDGE_DIRECTIONS {
            if attempts >= budget {
                tracing::debug!(budget, "placement nudge exhausted");
                return frame;
            }
            attempts += 1;
            let distance = ring as f64 * step;
            let mut candidate = frame;
            candidate.x += dx * distance;
            candidate.y += dy * distance;
            if is_clear(&candidate) {
                return candidate;
            }
        }
    }
    frame
}
