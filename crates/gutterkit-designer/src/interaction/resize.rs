//! Handle-driven resize
//!
//! Works in the start frame's local axes: the dragged handle follows the
//! pointer, the opposite edge (or corner) stays pinned in world space.

use super::handles::Handle;
use crate::geometry::{local_to_world, world_to_local, Frame, Point};

/// How the two dimensions relate while resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Width and height change independently
    Free,
    /// The start aspect ratio is preserved
    KeepAspect,
}

impl ResizeMode {
    /// Linear parts always resize freely; other parts keep their aspect
    /// unless the free-warp modifier is held
    pub fn for_element(is_linear: bool, free_warp: bool) -> Self {
        if is_linear || free_warp {
            ResizeMode::Free
        } else {
            ResizeMode::KeepAspect
        }
    }
}

/// New frame for dragging `handle` of `start` to `pointer` (world)
///
/// Each dimension becomes the pointer's distance from the opposite edge
/// along the local axis; edge handles leave the other axis alone. With
/// [`ResizeMode::KeepAspect`] the other axis follows the ratio, and for
/// corners the larger of the width-led and height-led candidates wins.
/// Both sides are then clamped to `min_dimension`, re-applying the ratio
/// so neither falls below it.
pub fn resize_frame(
    start: &Frame,
    handle: Handle,
    pointer: Point,
    mode: ResizeMode,
    min_dimension: f64,
) -> Frame {
    let center = start.center();
    let local = world_to_local(pointer, center, start.rotation);
    let (sx, sy) = handle.sign();
    let (w0, h0) = (start.width, start.height);

    let mut w = if sx != 0.0 { sx * local.x + w0 / 2.0 } else { w0 };
    let mut h = if sy != 0.0 { sy * local.y + h0 / 2.0 } else { h0 };
    if !w.is_finite() {
        w = w0;
    }
    if !h.is_finite() {
        h = h0;
    }

    let ratio = if mode == ResizeMode::KeepAspect && w0 > 0.0 && h0 > 0.0 {
        Some(w0 / h0)
    } else {
        None
    };

    if let Some(ratio) = ratio {
        match (sx != 0.0, sy != 0.0) {
            (true, false) => h = w / ratio,
            (false, true) => w = h * ratio,
            _ => {
                let (w_led, h_led) = ((w, w / ratio), (h * ratio, h));
                (w, h) = if w_led.0 >= h_led.0 { w_led } else { h_led };
            }
        }
    }

    w = w.max(min_dimension);
    h = h.max(min_dimension);
    if let Some(ratio) = ratio {
        w = w.max(h * ratio);
        h = w / ratio;
    }

    // The pinned side sits at -sign * half the start size; the new centre
    // is half the new size back along the handle direction.
    let new_center_local = Point::new(
        -sx * w0 / 2.0 + sx * w / 2.0,
        -sy * h0 / 2.0 + sy * h / 2.0,
    );
    let new_center = local_to_world(new_center_local, center, start.rotation);
    Frame::new(new_center.x - w / 2.0, new_center.y - h / 2.0, w, h, start.rotation)
}
