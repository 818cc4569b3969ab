//! Document model types
//!
//! Elements live in an arena owned by [`crate::document::Document`] and are
//! addressed by [`ElementId`]; nothing holds references into the arena.

mod blueprint;
mod element;
mod group;

pub use blueprint::Blueprint;
pub use element::Element;
pub use group::Group;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a placed element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Stable identity of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grp-{}", self.0)
    }
}
