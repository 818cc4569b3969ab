//! Geometry kernel
//!
//! Pure functions over rotated rectangles in world space. Every element and
//! the blueprint is an axis-aligned `width x height` box rotated by
//! `rotation` degrees about its centre, with `(x, y)` its unrotated top-left.
//!
//! Rotation convention (screen axes, +y down, so positive angles turn
//! clockwise on screen):
//!
//! ```text
//! x' = cx + px * cos(r) - py * sin(r)
//! y' = cy + px * sin(r) + py * cos(r)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in world or display units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of `self - origin` in degrees
    pub fn angle_from(&self, origin: &Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x).to_degrees()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds spanning two corner points in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Overlap test with `self` grown by `gap` on every side; touching counts
    pub fn intersects(&self, other: &Bounds, gap: f64) -> bool {
        self.min_x - gap <= other.max_x
            && other.min_x <= self.max_x + gap
            && self.min_y - gap <= other.max_y
            && other.min_y <= self.max_y + gap
    }

    /// Whether `other` lies entirely inside `self` (edges inclusive)
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Union of an iterator of bounds, `None` when empty
    pub fn union_all(iter: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
        iter.into_iter().reduce(|acc, b| acc.union(&b))
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1}] - [{:.1}, {:.1}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Placement of a rotated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move so the centre lands on `center`, keeping size and rotation
    pub fn with_center(mut self, center: Point) -> Self {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
        self
    }

    pub fn bounds(&self) -> Bounds {
        rotated_bbox(self.x, self.y, self.width, self.height, self.rotation)
    }

    pub fn contains(&self, p: Point) -> bool {
        point_in_rotated_rect(p, self.x, self.y, self.width, self.height, self.rotation)
    }

    /// World position of a point given in the frame's centre-relative axes
    pub fn local_to_world(&self, local: Point) -> Point {
        local_to_world(local, self.center(), self.rotation)
    }

    /// Clamp size to `min_dimension` and replace non-finite values
    pub fn sanitized(mut self, min_dimension: f64) -> Self {
        self.x = sanitize_coordinate(self.x);
        self.y = sanitize_coordinate(self.y);
        self.width = sanitize_dimension(self.width, min_dimension);
        self.height = sanitize_dimension(self.height, min_dimension);
        self.rotation = sanitize_angle(self.rotation);
        self
    }
}

/// Axis-aligned bounds of a `w x h` box at `(x, y)` rotated about its centre
pub fn rotated_bbox(x: f64, y: f64, w: f64, h: f64, rotation_deg: f64) -> Bounds {
    let center = Point::new(x + w / 2.0, y + h / 2.0);
    let (hw, hh) = (w / 2.0, h / 2.0);
    let corners = [
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ];
    let mut bounds = Bounds::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for corner in corners {
        let p = local_to_world(corner, center, rotation_deg);
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x);
        bounds.max_y = bounds.max_y.max(p.y);
    }
    bounds
}

/// Whether `p` falls inside the rotated rectangle (edges inclusive)
pub fn point_in_rotated_rect(p: Point, x: f64, y: f64, w: f64, h: f64, rotation_deg: f64) -> bool {
    let center = Point::new(x + w / 2.0, y + h / 2.0);
    let local = world_to_local(p, center, rotation_deg);
    local.x.abs() <= w / 2.0 && local.y.abs() <= h / 2.0
}

/// Express a world point in the centre-relative, unrotated axes of a frame
pub fn world_to_local(p: Point, center: Point, rotation_deg: f64) -> Point {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
}

/// Inverse of [`world_to_local`]
pub fn local_to_world(local: Point, center: Point, rotation_deg: f64) -> Point {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    Point::new(
        center.x + local.x * cos - local.y * sin,
        center.y + local.x * sin + local.y * cos,
    )
}

/// Shortest distance from `p` to the segment `a..b`
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Map an angle into (-180, 180]
pub fn normalize_angle_signed(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Map an angle into [0, 360)
pub fn normalize_angle_positive(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Finite dimension no smaller than `min`
pub fn sanitize_dimension(value: f64, min: f64) -> f64 {
    if value.is_finite() {
        value.max(min)
    } else {
        min
    }
}

/// Finite angle, zero otherwise
pub fn sanitize_angle(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Finite coordinate, zero otherwise
pub fn sanitize_coordinate(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
