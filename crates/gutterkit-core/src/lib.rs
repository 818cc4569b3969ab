//! # GutterKit Core
//!
//! Core types and utilities shared by every GutterKit crate.
//! Provides the closed [`AssetKind`] classification of catalog ids, the
//! unit helpers used for labels and product codes, the element tint
//! [`Color`], and the core error types.

pub mod asset;
pub mod color;
pub mod constants;
pub mod error;
pub mod units;

pub use asset::{AssetKind, DownpipeSize, GutterProfile, LabelFamily};
pub use color::Color;
pub use error::{CoreError, Result};
pub use units::{format_metres, index_to_letter, metres_to_mm, mm_to_metres};
