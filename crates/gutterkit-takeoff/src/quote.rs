//! Quote aggregation
//!
//! Every measurable run is optimized on its own, then piece counts are summed
//! per gutter profile or downpipe size into one line per stock length. The
//! total run length of each profile or size rides on its first (longest)
//! line so accessory rules (brackets per metre, clips per downpipe) can work
//! from what was actually drawn without counting a run twice.

use crate::error::Result;
use crate::stock::{CutPlan, StockSet};
use gutterkit_core::{format_metres, AssetKind, DownpipeSize, GutterProfile};
use gutterkit_settings::StockSettings;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// One element as seen by the take-off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeoffItem {
    pub asset_id: String,
    pub kind: AssetKind,
    /// Drawn length in millimetres; 0 when the user has not entered one
    pub measured_length_mm: u32,
}

impl TakeoffItem {
    /// Item classified from its asset id, with no measured length
    pub fn new(asset_id: impl Into<String>) -> Self {
        let asset_id = asset_id.into();
        let kind = AssetKind::from_asset_id(&asset_id);
        Self {
            asset_id,
            kind,
            measured_length_mm: 0,
        }
    }

    /// Set the measured length
    pub fn with_length(mut self, measured_length_mm: u32) -> Self {
        self.measured_length_mm = measured_length_mm;
        self
    }

    fn has_length(&self) -> bool {
        self.kind.is_measurable() && self.measured_length_mm > 0
    }
}

/// A purchasable line handed to the quoting collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub asset_id: String,
    pub quantity: u32,
    /// Run length behind this line's profile or size (first line only), or
    /// the summed measured length of another measurable part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_mm: Option<u32>,
    /// At least one contributing run had no measured length
    #[serde(default)]
    pub incomplete: bool,
}

impl MaterialLine {
    /// Plain counted line
    pub fn count(asset_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            asset_id: asset_id.into(),
            quantity,
            length_mm: None,
            incomplete: false,
        }
    }
}

/// Product id for a gutter stock length, e.g. `GUT-SC-MAR-1.5M`
pub fn gutter_product_id(profile: GutterProfile, length_mm: u32) -> String {
    format!("GUT-{}-MAR-{}M", profile.code(), format_metres(length_mm))
}

/// Product id for a downpipe stock length, e.g. `DP-80-3M`
pub fn downpipe_product_id(size: DownpipeSize, length_mm: u32) -> String {
    format!("DP-{}-{}M", size.mm(), format_metres(length_mm))
}

#[derive(Debug, Default)]
struct RunTally {
    count: u32,
    incomplete: bool,
}

/// Piece counts per stock length plus the run length behind a family
#[derive(Debug)]
struct FamilyTally<K> {
    pieces: BTreeMap<(K, Reverse<u32>), RunTally>,
    required_mm: BTreeMap<K, u32>,
}

impl<K: Ord + Copy> FamilyTally<K> {
    fn new() -> Self {
        Self {
            pieces: BTreeMap::new(),
            required_mm: BTreeMap::new(),
        }
    }

    fn add_run(&mut self, key: K, plan: &CutPlan, has_length: bool) {
        for piece in &plan.pieces {
            let tally = self.pieces.entry((key, Reverse(piece.length_mm))).or_default();
            tally.count += piece.count;
            tally.incomplete |= !has_length;
        }
        *self.required_mm.entry(key).or_default() += plan.required_mm;
    }

    /// Lines in key order, longest stock first; only the first line of each
    /// family carries the family's run length so it is counted once
    fn into_lines(self, product_id: impl Fn(K, u32) -> String, lines: &mut Vec<MaterialLine>) {
        let mut previous = None;
        for ((key, Reverse(length_mm)), tally) in self.pieces {
            let first_of_family = previous != Some(key);
            previous = Some(key);
            let length = self.required_mm.get(&key).copied().unwrap_or_default();
            lines.push(MaterialLine {
                asset_id: product_id(key, length_mm),
                quantity: tally.count,
                length_mm: Some(length).filter(|mm| first_of_family && *mm > 0),
                incomplete: tally.incomplete,
            });
        }
    }
}

#[derive(Debug, Default)]
struct LengthTally {
    length_mm: u32,
    count: u32,
}

/// Take-off engine configured with the stock lengths for each family
#[derive(Debug, Clone)]
pub struct Takeoff {
    gutter_stock: StockSet,
    downpipe_stock: StockSet,
}

impl Default for Takeoff {
    fn default() -> Self {
        Self::new(StockSet::gutter_default(), StockSet::downpipe_default())
    }
}

impl Takeoff {
    pub fn new(gutter_stock: StockSet, downpipe_stock: StockSet) -> Self {
        Self {
            gutter_stock,
            downpipe_stock,
        }
    }

    /// Build from the configured stock lengths
    pub fn from_settings(settings: &StockSettings) -> Result<Self> {
        Ok(Self::new(
            StockSet::new(settings.gutter_lengths_mm.iter().copied())?,
            StockSet::new(settings.downpipe_lengths_mm.iter().copied())?,
        ))
    }

    pub fn gutter_stock(&self) -> &StockSet {
        &self.gutter_stock
    }

    pub fn downpipe_stock(&self) -> &StockSet {
        &self.downpipe_stock
    }

    /// Aggregate items into material lines
    ///
    /// Output order: gutter lines (by profile, longest stock first), downpipe
    /// lines (by size, longest first), other measurable parts, then counted
    /// parts. Within the last two groups lines are ordered by asset id.
    /// Unmeasured runs are planned at their standard length and flag every
    /// line they contribute to as `incomplete`.
    pub fn material_lines(&self, items: &[TakeoffItem]) -> Result<Vec<MaterialLine>> {
        let mut gutters = FamilyTally::<GutterProfile>::new();
        let mut downpipes = FamilyTally::<DownpipeSize>::new();
        let mut other_measured: BTreeMap<&str, (AssetKind, LengthTally)> = BTreeMap::new();
        let mut counted: BTreeMap<&str, u32> = BTreeMap::new();

        for item in items {
            if item.asset_id.trim().is_empty() {
                continue;
            }
            let has_length = item.has_length();
            let required_mm = if has_length {
                item.measured_length_mm
            } else {
                item.kind.standard_length_mm()
            };

            match item.kind {
                AssetKind::Gutter {
                    profile: Some(profile),
                    ..
                } => {
                    let plan = self.gutter_stock.optimize(required_mm as i64)?;
                    gutters.add_run(profile, &plan, has_length);
                }
                AssetKind::Downpipe {
                    size: Some(size),
                    joiner: false,
                    ..
                } => {
                    let plan = self.downpipe_stock.optimize(required_mm as i64)?;
                    downpipes.add_run(size, &plan, has_length);
                }
                kind if kind.is_measurable() => {
                    let (_, tally) = other_measured
                        .entry(item.asset_id.as_str())
                        .or_insert_with(|| (kind, LengthTally::default()));
                    if has_length {
                        tally.length_mm += item.measured_length_mm;
                    } else {
                        tally.count += 1;
                    }
                }
                _ => *counted.entry(item.asset_id.as_str()).or_default() += 1,
            }
        }

        let mut lines = Vec::new();
        gutters.into_lines(gutter_product_id, &mut lines);
        downpipes.into_lines(downpipe_product_id, &mut lines);

        for (asset_id, (kind, tally)) in other_measured {
            let quantity = if tally.length_mm > 0 {
                tally.length_mm.div_ceil(kind.standard_length_mm())
            } else {
                tally.count
            };
            if quantity == 0 {
                continue;
            }
            lines.push(MaterialLine {
                asset_id: asset_id.to_string(),
                quantity,
                length_mm: Some(tally.length_mm).filter(|mm| *mm > 0),
                incomplete: tally.length_mm == 0,
            });
        }

        for (asset_id, quantity) in counted {
            lines.push(MaterialLine::count(asset_id, quantity));
        }

        tracing::debug!(items = items.len(), lines = lines.len(), "built material lines");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids() {
        assert_eq!(
            gutter_product_id(GutterProfile::StormCloud, 1500),
            "GUT-SC-MAR-1.5M"
        );
        assert_eq!(downpipe_product_id(DownpipeSize::Mm80, 3000), "DP-80-3M");
    }

    #[test]
    fn test_counted_parts() {
        let items = vec![
            TakeoffItem::new("BRK-SC-MAR"),
            TakeoffItem::new("BRK-SC-MAR"),
            TakeoffItem::new("DPJ-65"),
            TakeoffItem::new(""),
        ];
        let lines = Takeoff::default().material_lines(&items).unwrap();
        assert_eq!(
            lines,
            vec![
                MaterialLine::count("BRK-SC-MAR", 2),
                MaterialLine::count("DPJ-65", 1),
            ]
        );
    }

    #[test]
    fn test_dropper_lengths_round_up_to_standard() {
        let items = vec![
            TakeoffItem::new("DRP-65").with_length(2000),
            TakeoffItem::new("DRP-65").with_length(2500),
        ];
        let lines = Takeoff::default().material_lines(&items).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].length_mm, Some(4500));
        assert!(!lines[0].incomplete);
    }
}
