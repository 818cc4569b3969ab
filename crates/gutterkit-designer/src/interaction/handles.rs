//! Transform handles in display space
//!
//! Element handles sit on the element's box grown by a visual padding, with
//! a rotate knob on a stem above the top edge. Blueprint handles are the
//! four corners plus a rotate knob, hit-tested as small squares.

use crate::geometry::{point_to_segment_distance, world_to_local, Frame, Point};
use crate::viewport::Viewport;

/// Resize handle position around a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Handle {
    /// Hit-test order
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::N,
        Handle::NE,
        Handle::E,
        Handle::SE,
        Handle::S,
        Handle::SW,
        Handle::W,
    ];

    pub const CORNERS: [Handle; 4] = [Handle::NW, Handle::NE, Handle::SW, Handle::SE];

    /// Direction from the centre in local axes, each component -1, 0 or 1
    pub fn sign(&self) -> (f64, f64) {
        match self {
            Handle::N => (0.0, -1.0),
            Handle::NE => (1.0, -1.0),
            Handle::E => (1.0, 0.0),
            Handle::SE => (1.0, 1.0),
            Handle::S => (0.0, 1.0),
            Handle::SW => (-1.0, 1.0),
            Handle::W => (-1.0, 0.0),
            Handle::NW => (-1.0, -1.0),
        }
    }

    pub fn is_corner(&self) -> bool {
        let (sx, sy) = self.sign();
        sx != 0.0 && sy != 0.0
    }
}

/// What a pointer landed on among the handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Resize(Handle),
    Rotate,
}

/// A box's handle geometry projected to display space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleLayout {
    pub center: Point,
    pub half_width: f64,
    pub half_height: f64,
    pub rotation: f64,
    /// Distance of the rotate knob above the top edge
    pub rotate_offset: f64,
}

impl HandleLayout {
    /// Layout for `frame` grown by `padding` world units on each side
    pub fn new(frame: &Frame, viewport: &Viewport, padding: f64, rotate_offset: f64) -> Self {
        let scale = viewport.scale();
        Self {
            center: viewport.world_to_display(frame.center()),
            half_width: (frame.width / 2.0 + padding) * scale,
            half_height: (frame.height / 2.0 + padding) * scale,
            rotation: frame.rotation,
            rotate_offset,
        }
    }

    fn to_display(&self, local: Point) -> Point {
        crate::geometry::local_to_world(local, self.center, self.rotation)
    }

    fn local(&self, handle: Handle) -> Point {
        let (sx, sy) = handle.sign();
        Point::new(sx * self.half_width, sy * self.half_height)
    }

    fn rotate_local(&self) -> Point {
        Point::new(0.0, -self.half_height - self.rotate_offset)
    }

    /// Display position of a resize handle
    pub fn handle_position(&self, handle: Handle) -> Point {
        self.to_display(self.local(handle))
    }

    /// Display position of the rotate knob
    pub fn rotate_position(&self) -> Point {
        self.to_display(self.rotate_local())
    }

    /// Display position where the rotate stem meets the top edge
    pub fn stem_base(&self) -> Point {
        self.to_display(Point::new(0.0, -self.half_height))
    }

    /// Element handle under a display point
    ///
    /// Resize handles win over the rotate knob, which also accepts hits
    /// anywhere along its stem.
    pub fn hit_element(&self, p: Point, proximity: f64, rotate_proximity: f64) -> Option<HandleHit> {
        let local = world_to_local(p, self.center, self.rotation);
        if let Some(handle) = Handle::ALL
            .into_iter()
            .find(|&h| local.distance_to(&self.local(h)) <= proximity)
        {
            return Some(HandleHit::Resize(handle));
        }
        let knob = self.rotate_local();
        if local.distance_to(&knob) <= rotate_proximity {
            return Some(HandleHit::Rotate);
        }
        let stem_base = Point::new(0.0, -self.half_height);
        if point_to_segment_distance(local, stem_base, knob) <= proximity {
            return Some(HandleHit::Rotate);
        }
        None
    }

    /// Blueprint handle under a display point: corners, then the rotate knob
    pub fn hit_blueprint(&self, p: Point, handle_size: f64) -> Option<HandleHit> {
        let near = |q: Point| (p.x - q.x).abs() <= handle_size && (p.y - q.y).abs() <= handle_size;
        if let Some(handle) = Handle::CORNERS
            .into_iter()
            .find(|&h| near(self.handle_position(h)))
        {
            return Some(HandleHit::Resize(handle));
        }
        near(self.rotate_position()).then_some(HandleHit::Rotate)
    }
}
