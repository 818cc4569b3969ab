//! Error types for the take-off crate.

use thiserror::Error;

/// Errors that can occur while planning stock cuts or building material lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TakeoffError {
    /// No multiset of stock pieces reaches the required length.
    #[error("No stock combination covers {required_mm}mm")]
    NoCombination { required_mm: u32 },

    /// The stock list is empty or contains a zero length.
    #[error("Invalid stock lengths: {0}")]
    InvalidStock(String),

    /// The run is longer than the optimizer will plan for.
    #[error("Run of {required_mm}mm exceeds the {limit_mm}mm planning limit")]
    RunTooLong { required_mm: i64, limit_mm: u32 },
}

/// Result type alias for take-off operations.
pub type Result<T> = std::result::Result<T, TakeoffError>;
