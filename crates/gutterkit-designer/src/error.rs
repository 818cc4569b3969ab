//! Error types for the designer crate.
//!
//! Most editor operations clamp bad geometry or quietly ignore missing and
//! locked targets, so only the few failures a caller must react to are
//! modelled here.

use thiserror::Error;

/// Errors that can occur during designer operations.
#[derive(Error, Debug)]
pub enum DesignerError {
    /// The catalog could not produce an image for the asset.
    #[error("Failed to load image for asset '{asset_id}': {reason}")]
    AssetLoad { asset_id: String, reason: String },

    /// The catalog does not know the asset id.
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// A diagram snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DesignerError {
    /// Image load failure for an asset
    pub fn asset_load(asset_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            asset_id: asset_id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for designer operations.
pub type Result<T> = std::result::Result<T, DesignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designer_error_display() {
        let err = DesignerError::asset_load("GUT-SC-MAR-3M", "404 Not Found");
        assert_eq!(
            err.to_string(),
            "Failed to load image for asset 'GUT-SC-MAR-3M': 404 Not Found"
        );

        let err = DesignerError::UnknownAsset("XYZ".to_string());
        assert_eq!(err.to_string(), "Unknown asset: XYZ");
    }

    #[test]
    fn test_serialization_conversion() {
        let json_err = serde_json::from_str::<u32>("[").unwrap_err();
        let err: DesignerError = json_err.into();
        assert!(matches!(err, DesignerError::Serialization(_)));
    }
}
