//! Asset classification
//!
//! Catalog ids such as `GUT-SC-MAR-3M` or `DP-80-1.5M` encode what a part is.
//! They are parsed once into an [`AssetKind`] when an element is created, and
//! every later policy decision (measurability, resize semantics, rotation
//! bands, quote grouping) matches on the enum instead of the id string.

use crate::constants::{
    DEFAULT_STANDARD_LENGTH_MM, GUTTER_DEFAULT_ROTATION_DEG, UPRIGHT_DEFAULT_ROTATION_DEG,
};
use crate::error::{CoreError, Result};
use crate::units::metres_to_mm;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Gutter profile family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GutterProfile {
    /// Storm Cloud (`SC`)
    StormCloud,
    /// Classic (`CL`)
    Classic,
}

impl GutterProfile {
    /// Two-letter code used in product ids
    pub fn code(&self) -> &'static str {
        match self {
            Self::StormCloud => "SC",
            Self::Classic => "CL",
        }
    }

    /// Human readable profile name
    pub fn name(&self) -> &'static str {
        match self {
            Self::StormCloud => "Storm Cloud",
            Self::Classic => "Classic",
        }
    }
}

impl fmt::Display for GutterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GutterProfile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "SC" => Ok(Self::StormCloud),
            "CL" => Ok(Self::Classic),
            other => Err(CoreError::UnknownProfile {
                code: other.to_string(),
            }),
        }
    }
}

/// Downpipe bore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownpipeSize {
    /// 65 mm downpipe
    Mm65,
    /// 80 mm downpipe
    Mm80,
}

impl DownpipeSize {
    /// Size in millimetres
    pub fn mm(&self) -> u32 {
        match self {
            Self::Mm65 => 65,
            Self::Mm80 => 80,
        }
    }

    /// Size from its millimetre value
    pub fn from_mm(mm: u32) -> Result<Self> {
        match mm {
            65 => Ok(Self::Mm65),
            80 => Ok(Self::Mm80),
            size => Err(CoreError::UnsupportedDownpipeSize { size }),
        }
    }
}

impl fmt::Display for DownpipeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.mm())
    }
}

/// How measurable parts are labelled on the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelFamily {
    /// Gutter runs: 1, 2, 3, ...
    Numbered,
    /// Downpipes and droppers: A, B, ..., Z, AA, ...
    Lettered,
}

/// Closed classification of a catalog asset id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetKind {
    /// Gutter run. `profile` is `None` for the generic `gutter` placeholder.
    Gutter {
        profile: Option<GutterProfile>,
        stock_length_mm: Option<u32>,
    },
    /// Downpipe or downpipe joiner
    Downpipe {
        size: Option<DownpipeSize>,
        stock_length_mm: Option<u32>,
        joiner: bool,
    },
    /// Dropper (rain head outlet)
    Dropper,
    /// Gutter bracket
    Bracket { profile: Option<GutterProfile> },
    /// Fixing screw
    Screw,
    /// Downpipe clip, standard or adjustable
    Clip {
        size: Option<DownpipeSize>,
        adjustable: bool,
    },
    /// Anything the editor has no special policy for
    Other,
}

fn gutter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^GUT-(SC|CL)-MAR-(\d+(?:\.\d+)?)M$").expect("invalid regex pattern")
    })
}

fn downpipe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^DP-(65|80)-(\d+(?:\.\d+)?)M$").expect("invalid regex pattern")
    })
}

fn size_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]+-(65|80)\b").expect("invalid regex pattern"))
}

fn parse_length(metres: &str) -> Option<u32> {
    metres
        .parse::<f64>()
        .ok()
        .map(metres_to_mm)
        .filter(|mm| *mm > 0)
}

fn parse_size(upper: &str) -> Option<DownpipeSize> {
    size_suffix_pattern()
        .captures(upper)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .and_then(|mm| DownpipeSize::from_mm(mm).ok())
}

impl AssetKind {
    /// Classify a catalog asset id
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown ids classify as [`AssetKind::Other`].
    pub fn from_asset_id(asset_id: &str) -> Self {
        let trimmed = asset_id.trim();
        let upper = trimmed.to_uppercase();

        if let Some(caps) = gutter_pattern().captures(trimmed) {
            return Self::Gutter {
                profile: caps[1].parse().ok(),
                stock_length_mm: parse_length(&caps[2]),
            };
        }
        if upper == "GUTTER" {
            return Self::Gutter {
                profile: None,
                stock_length_mm: None,
            };
        }
        if upper.starts_with("DPJ-") {
            return Self::Downpipe {
                size: parse_size(&upper),
                stock_length_mm: None,
                joiner: true,
            };
        }
        if upper.starts_with("DP-65-") || upper.starts_with("DP-80-") {
            let stock_length_mm = downpipe_pattern()
                .captures(trimmed)
                .and_then(|caps| parse_length(&caps[2]));
            return Self::Downpipe {
                size: parse_size(&upper),
                stock_length_mm,
                joiner: false,
            };
        }
        if upper == "DOWNPIPE" || upper.starts_with("DP-") {
            return Self::Downpipe {
                size: None,
                stock_length_mm: None,
                joiner: false,
            };
        }
        if upper == "DROPPER" || upper.starts_with("DRP-") {
            return Self::Dropper;
        }
        if let Some(rest) = upper.strip_prefix("BRK-") {
            let profile = rest.split('-').next().and_then(|code| code.parse().ok());
            return Self::Bracket { profile };
        }
        if upper.starts_with("SCR-") {
            return Self::Screw;
        }
        if upper.starts_with("SCL-") || upper.starts_with("ACL-") {
            return Self::Clip {
                size: parse_size(&upper),
                adjustable: upper.starts_with("ACL-"),
            };
        }
        Self::Other
    }

    /// Participates in sequence numbering and length take-off
    ///
    /// Profiled gutters, sized main downpipes and droppers. Joiners and
    /// generic placeholders are counted, not measured.
    pub fn is_measurable(&self) -> bool {
        match self {
            Self::Gutter { profile, .. } => profile.is_some(),
            Self::Downpipe { size, joiner, .. } => size.is_some() && !joiner,
            Self::Dropper => true,
            _ => false,
        }
    }

    /// Resizes length and thickness independently
    pub fn is_linear(&self) -> bool {
        self.is_measurable()
    }

    /// True for any gutter, including the generic placeholder
    pub fn is_gutter(&self) -> bool {
        matches!(self, Self::Gutter { .. })
    }

    /// Key into the configured rotation bands, if this kind has one
    pub fn rotation_band_key(&self) -> Option<&'static str> {
        match self {
            Self::Gutter { .. } => Some("gutter"),
            _ => None,
        }
    }

    /// Label family for measurable kinds
    pub fn label_family(&self) -> Option<LabelFamily> {
        if !self.is_measurable() {
            return None;
        }
        match self {
            Self::Gutter { .. } => Some(LabelFamily::Numbered),
            _ => Some(LabelFamily::Lettered),
        }
    }

    /// Rotation applied when a linear part is dropped onto the canvas
    pub fn default_rotation(&self) -> f64 {
        match self {
            Self::Gutter { .. } => GUTTER_DEFAULT_ROTATION_DEG,
            Self::Downpipe { .. } | Self::Dropper => UPRIGHT_DEFAULT_ROTATION_DEG,
            _ => 0.0,
        }
    }

    /// Stock length encoded in the asset id, or the standard default
    pub fn standard_length_mm(&self) -> u32 {
        let encoded = match self {
            Self::Gutter {
                stock_length_mm, ..
            }
            | Self::Downpipe {
                stock_length_mm, ..
            } => *stock_length_mm,
            _ => None,
        };
        encoded.unwrap_or(DEFAULT_STANDARD_LENGTH_MM)
    }
}

impl Default for AssetKind {
    fn default() -> Self {
        Self::Other
    }
}
