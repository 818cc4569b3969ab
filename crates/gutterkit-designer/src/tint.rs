//! Element recolouring
//!
//! A tint fills the element's footprint with a flat colour and keeps only
//! the pixels where the source image is opaque, so line-art diagrams recolour
//! cleanly. Tinted bitmaps are cached per element and rebuilt whenever the
//! colour or the size changes; they never take part in undo state.

use crate::model::ElementId;
use gutterkit_core::Color;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::Arc;

/// Colour fill masked by the alpha of `source` resized to `width x height`
pub fn tint_image(source: &RgbaImage, color: Color, width: u32, height: u32) -> RgbaImage {
    let (width, height) = (width.max(1), height.max(1));
    if has_opaque_corners(source) {
        tracing::warn!(
            width = source.width(),
            height = source.height(),
            "tint source has an opaque background; the whole box will be filled"
        );
    }
    let mask = if source.dimensions() == (width, height) {
        source.clone()
    } else {
        imageops::resize(source, width, height, FilterType::Triangle)
    };
    let [r, g, b, _] = color.to_rgba();
    RgbaImage::from_fn(width, height, |x, y| Rgba([r, g, b, mask.get_pixel(x, y)[3]]))
}

/// All four corners fully opaque: almost certainly a flattened background
fn has_opaque_corners(source: &RgbaImage) -> bool {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return false;
    }
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .into_iter()
        .all(|(x, y)| source.get_pixel(x, y)[3] == 255)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TintKey {
    color: Color,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
struct TintEntry {
    key: TintKey,
    image: Arc<RgbaImage>,
}

/// Tinted bitmaps keyed by element
#[derive(Debug, Clone, Default)]
pub struct TintCache {
    entries: HashMap<ElementId, TintEntry>,
}

impl TintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tint for an element, rebuilt when colour or size changed
    pub fn get_or_render(
        &mut self,
        id: ElementId,
        source: &RgbaImage,
        color: Color,
        width: u32,
        height: u32,
    ) -> Arc<RgbaImage> {
        let key = TintKey {
            color,
            width,
            height,
        };
        if let Some(entry) = self.entries.get(&id) {
            if entry.key == key {
                return Arc::clone(&entry.image);
            }
        }
        let image = Arc::new(tint_image(source, color, width, height));
        self.entries.insert(
            id,
            TintEntry {
                key,
                image: Arc::clone(&image),
            },
        );
        image
    }

    pub fn invalidate(&mut self, id: ElementId) {
        self.entries.remove(&id);
    }

    /// Drop entries for elements that no longer need a tint
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.entries.retain(|id, _| keep(*id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
