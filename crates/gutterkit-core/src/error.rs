//! Error handling for GutterKit core types
//!
//! Errors raised while parsing catalog identifiers and presentation values.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Core error type
///
/// Represents failures converting user or catalog supplied strings into
/// strongly typed values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The asset identifier was empty or whitespace
    #[error("Asset id is empty")]
    EmptyAssetId,

    /// A tint colour could not be parsed as `#rrggbb`
    #[error("Invalid colour '{value}': expected #rrggbb")]
    InvalidColor {
        /// The rejected input.
        value: String,
    },

    /// A downpipe size other than 65 or 80 mm
    #[error("Unsupported downpipe size: {size}mm")]
    UnsupportedDownpipeSize {
        /// The rejected size in millimetres.
        size: u32,
    },

    /// A gutter profile code other than SC or CL
    #[error("Unknown gutter profile code: {code}")]
    UnknownProfile {
        /// The rejected profile code.
        code: String,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
