use crate::geometry::{Bounds, Frame, Point};
use gutterkit_core::constants::BLUEPRINT_Z_INDEX;
use serde::{Deserialize, Serialize};

/// Background blueprint image the diagram is drawn over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// 0.0 (invisible) to 1.0 (opaque)
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    /// Key used to relink the image after a snapshot restore
    #[serde(default)]
    pub image_ref: String,
}

fn default_z_index() -> i32 {
    BLUEPRINT_Z_INDEX
}

fn default_opacity() -> f64 {
    1.0
}

impl Blueprint {
    /// Unrotated blueprint at the origin on the sentinel layer
    pub fn new(image_ref: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            z_index: BLUEPRINT_Z_INDEX,
            opacity: 1.0,
            locked: false,
            image_ref: image_ref.into(),
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

    pub fn bounds(&self) -> Bounds {
        self.frame().bounds()
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        self.frame().contains(p)
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
}
