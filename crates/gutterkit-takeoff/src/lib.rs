//! # GutterKit Take-off
//!
//! Turns drawn runs into purchasable material lines.
//!
//! - **Stock Optimizer**: exact minimum-waste, minimum-piece cutting plans per run
//! - **Quote Aggregation**: per-profile and per-size piece counts for the whole diagram
//! - **Accessories**: brackets, clips and screws inferred from the aggregated lines

pub mod accessories;
pub mod error;
pub mod quote;
pub mod stock;

pub use accessories::expand_with_accessories;
pub use error::{Result, TakeoffError};
pub use quote::{MaterialLine, Takeoff, TakeoffItem};
pub use stock::{CutPiece, CutPlan, StockSet};
