use super::ElementId;
use crate::geometry::{Bounds, Frame, Point};
use gutterkit_core::{AssetKind, Color};
use serde::{Deserialize, Serialize};

/// A placed product instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub asset_id: String,
    /// Classification of `asset_id`; rebuilt from the id when loaded
    #[serde(skip)]
    pub kind: AssetKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, unbounded; normalize before comparing
    pub rotation: f64,
    pub z_index: i32,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    /// Scale applied to the source image when the element was sized
    #[serde(default = "default_base_scale")]
    pub base_scale: f64,
    #[serde(default)]
    pub locked: bool,
    /// Label ordering key, measurable kinds only
    #[serde(default)]
    pub sequence_id: Option<u64>,
    /// Drawn run length, 0 when not entered
    #[serde(default)]
    pub measured_length_mm: u32,
}

fn default_base_scale() -> f64 {
    1.0
}

impl Element {
    /// Unlocked, untinted element with the given frame
    pub fn new(id: ElementId, asset_id: impl Into<String>, frame: Frame) -> Self {
        let asset_id = asset_id.into();
        let kind = AssetKind::from_asset_id(&asset_id);
        Self {
            id,
            asset_id,
            kind,
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            rotation: frame.rotation,
            z_index: 0,
            color: None,
            flip_x: false,
            flip_y: false,
            base_scale: 1.0,
            locked: false,
            sequence_id: None,
            measured_length_mm: 0,
        }
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.x, self.y, self.width, self.height, self.rotation)
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.x = frame.x;
        self.y = frame.y;
        self.width = frame.width;
        self.height = frame.height;
        self.rotation = frame.rotation;
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }

    /// Rotated bounding box in world space
    pub fn bounds(&self) -> Bounds {
        self.frame().bounds()
    }

    /// Unrotated area, used to prefer smaller targets in hit tests
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        self.frame().contains(p)
    }

    pub fn is_measurable(&self) -> bool {
        self.kind.is_measurable()
    }

    /// Re-derive `kind` from `asset_id`
    pub fn reclassify(&mut self) {
        self.kind = AssetKind::from_asset_id(&self.asset_id);
    }
}
