//! Accessory expansion
//!
//! Infers the brackets, clips and screws a set of material lines needs and
//! merges them with any the user placed by hand, summing by asset id.

use crate::quote::MaterialLine;
use gutterkit_core::constants::STAINLESS_SCREW_ID;
use gutterkit_core::{AssetKind, DownpipeSize, GutterProfile};
use gutterkit_settings::AccessorySettings;
use std::collections::{HashMap, HashSet};

/// Ordered merge of lines keyed by asset id
#[derive(Debug, Default)]
struct LineMerger {
    lines: Vec<MaterialLine>,
    index: HashMap<String, usize>,
}

impl LineMerger {
    fn add(&mut self, line: MaterialLine) {
        match self.index.get(&line.asset_id) {
            Some(&i) => {
                let existing = &mut self.lines[i];
                existing.quantity += line.quantity;
                existing.incomplete |= line.incomplete;
                if existing.length_mm.is_none() {
                    existing.length_mm = line.length_mm;
                }
            }
            None => {
                self.index.insert(line.asset_id.clone(), self.lines.len());
                self.lines.push(line);
            }
        }
    }

    fn add_count(&mut self, asset_id: &str, quantity: u32) {
        if quantity > 0 {
            self.add(MaterialLine::count(asset_id, quantity));
        }
    }

    fn finish(self) -> Vec<MaterialLine> {
        self.lines.into_iter().filter(|l| l.quantity > 0).collect()
    }
}

/// Gutter profile or downpipe size a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Family {
    Gutter(GutterProfile),
    Downpipe(DownpipeSize),
}

fn family_of(kind: &AssetKind) -> Option<Family> {
    match *kind {
        AssetKind::Gutter {
            profile: Some(profile),
            ..
        } => Some(Family::Gutter(profile)),
        AssetKind::Downpipe { size, .. } => {
            Some(Family::Downpipe(size.unwrap_or(DownpipeSize::Mm65)))
        }
        _ => None,
    }
}

/// Expand lines with inferred accessories
///
/// # Arguments
/// * `lines` - Aggregated material lines
/// * `rules` - Spacing and screw-count rules
///
/// # Returns
/// The input lines followed by inferred accessories, merged by asset id.
///
/// Gutters get `1 + floor(mm / bracket_spacing)` brackets. When any line of
/// a profile carries a length, the profile's summed length is used once;
/// otherwise each line falls back to `stock length x quantity`. Downpipes
/// get `max(1, ceil(mm / clip_spacing))` clips the same way, or one clip per
/// piece without a length, adjustable when any adjustable clip is already
/// listed. Droppers and clips add their fixing screws.
pub fn expand_with_accessories(
    lines: &[MaterialLine],
    rules: &AccessorySettings,
) -> Vec<MaterialLine> {
    let classified: Vec<(&MaterialLine, AssetKind)> = lines
        .iter()
        .filter(|l| l.quantity > 0)
        .map(|l| (l, AssetKind::from_asset_id(&l.asset_id)))
        .collect();

    let use_adjustable = classified.iter().any(|(_, kind)| {
        matches!(
            kind,
            AssetKind::Clip {
                adjustable: true,
                ..
            }
        )
    });
    let clip_prefix = if use_adjustable { "ACL" } else { "SCL" };

    let mut measured: HashMap<Family, u32> = HashMap::new();
    for (line, kind) in &classified {
        if let (Some(family), Some(mm)) = (family_of(kind), line.length_mm) {
            *measured.entry(family).or_default() += mm;
        }
    }
    let mut emitted: HashSet<Family> = HashSet::new();

    let mut merged = LineMerger::default();
    for (line, kind) in classified {
        merged.add(line.clone());

        let family = family_of(&kind);
        let family_total = family.and_then(|f| measured.get(&f).copied());
        // A measured family is expanded once, on its first line.
        if let (Some(f), Some(_)) = (family, family_total) {
            if !emitted.insert(f) {
                continue;
            }
        }

        match (kind, family) {
            (
                AssetKind::Gutter {
                    stock_length_mm, ..
                },
                Some(Family::Gutter(profile)),
            ) => {
                let total_mm = family_total.unwrap_or_else(|| {
                    stock_length_mm
                        .unwrap_or_default()
                        .saturating_mul(line.quantity)
                });
                let brackets = 1 + total_mm / rules.bracket_spacing_mm;
                merged.add_count(&format!("BRK-{}-MAR", profile.code()), brackets);
                merged.add_count(STAINLESS_SCREW_ID, brackets * rules.screws_per_bracket);
            }
            (AssetKind::Downpipe { .. }, Some(Family::Downpipe(size))) => {
                let clips = match family_total {
                    Some(mm) if mm > 0 => mm.div_ceil(rules.clip_spacing_mm).max(1),
                    _ => line.quantity,
                };
                merged.add_count(&format!("{}-{}", clip_prefix, size.mm()), clips);
                merged.add_count(STAINLESS_SCREW_ID, clips * rules.screws_per_clip);
            }
            (AssetKind::Dropper, _) => {
                merged.add_count(
                    STAINLESS_SCREW_ID,
                    line.quantity * rules.screws_per_dropper,
                );
            }
            (AssetKind::Clip { .. }, _) => {
                merged.add_count(STAINLESS_SCREW_ID, line.quantity * rules.screws_per_clip);
            }
            _ => {}
        }
    }
    merged.finish()
}
