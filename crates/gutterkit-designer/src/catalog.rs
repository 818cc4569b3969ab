//! Asset catalog contract
//!
//! The catalog resolves product ids to their kind and their diagram image.
//! Images load asynchronously; the editor awaits them before touching the
//! document so a failed load leaves nothing half-placed.

use crate::error::{DesignerError, Result};
use async_trait::async_trait;
use gutterkit_core::AssetKind;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of product classification and diagram images
#[async_trait]
pub trait AssetCatalog: Send + Sync {
    /// Classify an asset id; parses the id unless the catalog knows better
    fn classify(&self, asset_id: &str) -> AssetKind {
        AssetKind::from_asset_id(asset_id)
    }

    /// Load the diagram image for an asset
    async fn load_image(&self, asset_id: &str) -> Result<Arc<RgbaImage>>;
}

/// Decode an encoded image (PNG, JPEG, ...) into RGBA
pub fn decode_image(asset_id: &str, bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| DesignerError::asset_load(asset_id, e))
}

/// Loaded images by asset id (or blueprint image ref)
///
/// Snapshots never hold pixels; restoring one relinks through this cache.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, image: Arc<RgbaImage>) {
        self.images.insert(key.into(), image);
    }

    pub fn get(&self, key: &str) -> Option<Arc<RgbaImage>> {
        self.images.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Catalog backed by images held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset_id: impl Into<String>, image: RgbaImage) {
        self.images.insert(asset_id.into(), Arc::new(image));
    }

    /// Decode and store an encoded image
    pub fn insert_encoded(&mut self, asset_id: &str, bytes: &[u8]) -> Result<()> {
        let image = decode_image(asset_id, bytes)?;
        self.insert(asset_id, image);
        Ok(())
    }
}

#[async_trait]
impl AssetCatalog for MemoryCatalog {
    async fn load_image(&self, asset_id: &str) -> Result<Arc<RgbaImage>> {
        self.images
            .get(asset_id)
            .cloned()
            .ok_or_else(|| DesignerError::UnknownAsset(asset_id.to_string()))
    }
}
