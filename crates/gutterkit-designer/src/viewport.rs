//! Viewport and coordinate transformation for canvas rendering.
//!
//! Handles conversion between client coordinates (pointer events), display
//! coordinates (canvas pixels, origin at the canvas top-left) and world
//! coordinates (document space). The effective transform is a base fit that
//! frames the content, multiplied by the user's zoom and shifted by the
//! user's pan:
//!
//! ```text
//! scale  = base_scale * zoom
//! offset = base_offset + pan
//! display = world * scale + offset
//! ```

use std::fmt;

use crate::geometry::{Bounds, Point};
use gutterkit_settings::ViewSettings;

/// Represents the viewport transformation state (fit, zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    canvas_width: f64,
    canvas_height: f64,
    /// Client position of the canvas top-left corner
    canvas_origin: Point,
    base_scale: f64,
    base_offset: Point,
    zoom: f64,
    pan: Point,
    /// Content bounds used by the last fit
    fitted: Option<Bounds>,
    settings: ViewSettings,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, ViewSettings::default())
    }
}

impl Viewport {
    /// Creates an identity viewport (one world unit per pixel) of the given size.
    pub fn new(canvas_width: f64, canvas_height: f64, settings: ViewSettings) -> Self {
        Self {
            canvas_width,
            canvas_height,
            canvas_origin: Point::default(),
            base_scale: 1.0,
            base_offset: Point::default(),
            zoom: 1.0,
            pan: Point::default(),
            fitted: None,
            settings,
        }
    }

    /// Gets the canvas width.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Gets the canvas height.
    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the host resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Sets where the canvas sits in client coordinates.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Gets the user zoom level (1.0 = fitted).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Gets the user pan in display pixels.
    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Effective world-to-display scale.
    pub fn scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    /// Effective display position of the world origin.
    pub fn offset(&self) -> Point {
        self.base_offset + self.pan
    }

    /// Base fit scale from the last [`Viewport::fit`].
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Base fit offset from the last [`Viewport::fit`].
    pub fn base_offset(&self) -> Point {
        self.base_offset
    }

    /// Frames `content` in the canvas with `fit_padding` pixels around it.
    ///
    /// ```text
    /// base_scale    = min((W - 2p) / w, (H - 2p) / h)
    /// base_offset.x = (W - w * base_scale) / 2 - min_x * base_scale
    /// ```
    ///
    /// Without content, or with a degenerate box or canvas, the base resets
    /// to the identity. User zoom and pan are kept and re-clamped.
    pub fn fit(&mut self, content: Option<Bounds>) {
        let pad = self.settings.fit_padding;
        let usable_w = self.canvas_width - 2.0 * pad;
        let usable_h = self.canvas_height - 2.0 * pad;
        match content {
            Some(b) if b.width() > 0.0 && b.height() > 0.0 && usable_w > 0.0 && usable_h > 0.0 => {
                let scale = (usable_w / b.width()).min(usable_h / b.height());
                self.base_scale = scale;
                self.base_offset = Point::new(
                    (self.canvas_width - b.width() * scale) / 2.0 - b.min_x * scale,
                    (self.canvas_height - b.height() * scale) / 2.0 - b.min_y * scale,
                );
                self.fitted = Some(b);
            }
            _ => {
                self.base_scale = 1.0;
                self.base_offset = Point::default();
                self.fitted = None;
            }
        }
        self.clamp_pan();
    }

    /// Keeps the fitted content within `view_pad` pixels of the canvas.
    ///
    /// When the content is larger than the canvas the bounds swap, so the
    /// content then has to cover the canvas instead.
    pub fn clamp_pan(&mut self) {
        let Some(b) = self.fitted else {
            return;
        };
        let pad = self.settings.view_pad;
        let scale = self.scale();
        let clamp_axis = |offset: f64, min: f64, max: f64, extent: f64| {
            let lo = -pad - min * scale;
            let hi = extent + pad - max * scale;
            offset.clamp(lo.min(hi), lo.max(hi))
        };
        let offset = self.offset();
        let clamped = Point::new(
            clamp_axis(offset.x, b.min_x, b.max_x, self.canvas_width),
            clamp_axis(offset.y, b.min_y, b.max_y, self.canvas_height),
        );
        self.pan = clamped - self.base_offset;
    }

    /// Converts client coordinates to display coordinates.
    pub fn client_to_display(&self, client: Point) -> Point {
        client - self.canvas_origin
    }

    /// Converts display coordinates to world coordinates.
    pub fn display_to_world(&self, display: Point) -> Point {
        let scale = self.scale();
        let offset = self.offset();
        Point::new((display.x - offset.x) / scale, (display.y - offset.y) / scale)
    }

    /// Converts client coordinates to world coordinates.
    pub fn client_to_world(&self, client: Point) -> Point {
        self.display_to_world(self.client_to_display(client))
    }

    /// Converts world coordinates to display coordinates.
    pub fn world_to_display(&self, world: Point) -> Point {
        let scale = self.scale();
        let offset = self.offset();
        Point::new(world.x * scale + offset.x, world.y * scale + offset.y)
    }

    /// Zooms so the world point under `anchor` (display) stays put.
    fn zoom_about(&mut self, anchor: Point, zoom: f64) {
        let zoom = zoom.clamp(self.settings.min_zoom, self.settings.max_zoom);
        let content = self.display_to_world(anchor);
        let new_scale = self.base_scale * zoom;
        self.zoom = zoom;
        self.pan = Point::new(
            anchor.x - content.x * new_scale - self.base_offset.x,
            anchor.y - content.y * new_scale - self.base_offset.y,
        );
        self.clamp_pan();
    }

    /// Wheel zoom at a display point; scrolling down zooms out.
    pub fn zoom_at(&mut self, anchor: Point, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            self.settings.wheel_zoom_factor
        } else {
            1.0 / self.settings.wheel_zoom_factor
        };
        self.zoom_about(anchor, self.zoom * factor);
    }

    /// Zooms in one button step about the canvas centre.
    pub fn zoom_in(&mut self) {
        let center = Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0);
        self.zoom_about(center, self.zoom * self.settings.button_zoom_factor);
    }

    /// Zooms out one button step about the canvas centre.
    pub fn zoom_out(&mut self) {
        let center = Point::new(self.canvas_width / 2.0, self.canvas_height / 2.0);
        self.zoom_about(center, self.zoom / self.settings.button_zoom_factor);
    }

    /// Pans by a display-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.offset(dx, dy);
        self.clamp_pan();
    }

    /// Back to the plain fit: zoom 1, no pan.
    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Point::default();
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport(zoom: {:.2}x, scale: {:.3}, pan: ({:.1}, {:.1}))",
            self.zoom,
            self.scale(),
            self.pan.x,
            self.pan.y
        )
    }
}
