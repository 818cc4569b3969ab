//! Stock-length cutting optimizer
//!
//! Given a required run length `R` and a fixed set of purchasable lengths,
//! finds the multiset of pieces with total `T >= R` that minimizes waste
//! `T - R` and then piece count. Each run is planned on its own; pieces are
//! never spliced across runs.
//!
//! The search is exact. A single coin-change table over `0..=R + max(L)`
//! gives the minimum piece count for every candidate total, and totals are
//! scanned in ascending order so the first feasible one wins. Because the
//! waste is `T - R`, ascending `T` is ascending waste, and the piece-count
//! tie-break only matters inside one `T`, where the table keeps the first
//! (longest) stock length that reaches the minimum.

use crate::error::{Result, TakeoffError};
use serde::{Deserialize, Serialize};

/// Longest single run the optimizer will plan (1 km)
pub const MAX_RUN_MM: u32 = 1_000_000;

/// Pieces of one stock length in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPiece {
    pub length_mm: u32,
    pub count: u32,
}

/// Optimal set of stock pieces for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPlan {
    pub required_mm: u32,
    pub total_mm: u32,
    pub waste_mm: u32,
    /// Non-zero counts, longest stock first
    pub pieces: Vec<CutPiece>,
}

impl CutPlan {
    fn empty() -> Self {
        Self {
            required_mm: 0,
            total_mm: 0,
            waste_mm: 0,
            pieces: Vec::new(),
        }
    }

    /// Total number of pieces to buy
    pub fn piece_count(&self) -> u32 {
        self.pieces.iter().map(|p| p.count).sum()
    }

    /// Count for a given stock length, zero if unused
    pub fn count_of(&self, length_mm: u32) -> u32 {
        self.pieces
            .iter()
            .find(|p| p.length_mm == length_mm)
            .map_or(0, |p| p.count)
    }
}

/// Purchasable lengths for one product family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSet {
    lengths: Vec<u32>,
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl StockSet {
    /// Create a stock set; lengths are deduplicated and sorted longest first
    pub fn new(lengths: impl IntoIterator<Item = u32>) -> Result<Self> {
        let mut lengths: Vec<u32> = lengths.into_iter().collect();
        if lengths.is_empty() {
            return Err(TakeoffError::InvalidStock("no stock lengths".to_string()));
        }
        if lengths.contains(&0) {
            return Err(TakeoffError::InvalidStock(
                "stock lengths must be > 0".to_string(),
            ));
        }
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        lengths.dedup();
        Ok(Self { lengths })
    }

    /// Marley gutter stock: 5 m, 3 m, 1.5 m
    pub fn gutter_default() -> Self {
        Self {
            lengths: vec![5000, 3000, 1500],
        }
    }

    /// Marley downpipe stock: 3 m, 1.5 m
    pub fn downpipe_default() -> Self {
        Self {
            lengths: vec![3000, 1500],
        }
    }

    /// Lengths, longest first
    pub fn lengths(&self) -> &[u32] {
        &self.lengths
    }

    /// Longest stock length
    pub fn max_length(&self) -> u32 {
        self.lengths[0]
    }

    /// Plan the cut for one run of `required_mm`
    ///
    /// # Returns
    /// An empty plan for `required_mm <= 0`, otherwise the minimum-waste,
    /// minimum-piece plan, or [`TakeoffError::NoCombination`] when nothing
    /// in `[R, R + max]` is reachable.
    pub fn optimize(&self, required_mm: i64) -> Result<CutPlan> {
        if required_mm <= 0 {
            return Ok(CutPlan::empty());
        }
        if required_mm > MAX_RUN_MM as i64 {
            return Err(TakeoffError::RunTooLong {
                required_mm,
                limit_mm: MAX_RUN_MM,
            });
        }
        let required = required_mm as u32;

        // Every reachable total is a multiple of the gcd, so work in those units.
        let unit = self.lengths.iter().copied().fold(0, gcd);
        let units: Vec<usize> = self.lengths.iter().map(|l| (l / unit) as usize).collect();
        let first = required.div_ceil(unit) as usize;
        let last = ((required + self.max_length()) / unit) as usize;

        const UNREACHABLE: u32 = u32::MAX;
        let mut pieces = vec![UNREACHABLE; last + 1];
        let mut choice = vec![usize::MAX; last + 1];
        pieces[0] = 0;
        for t in 1..=last {
            for (index, &u) in units.iter().enumerate() {
                if u > t || pieces[t - u] == UNREACHABLE {
                    continue;
                }
                if pieces[t - u] + 1 < pieces[t] {
                    pieces[t] = pieces[t - u] + 1;
                    choice[t] = index;
                }
            }
        }

        let Some(total) = (first..=last).find(|&t| pieces[t] != UNREACHABLE) else {
            return Err(TakeoffError::NoCombination {
                required_mm: required,
            });
        };

        let mut counts = vec![0u32; self.lengths.len()];
        let mut t = total;
        while t > 0 {
            let index = choice[t];
            counts[index] += 1;
            t -= units[index];
        }

        let total_mm = total as u32 * unit;
        let plan = CutPlan {
            required_mm: required,
            total_mm,
            waste_mm: total_mm - required,
            pieces: self
                .lengths
                .iter()
                .zip(counts)
                .filter(|(_, count)| *count > 0)
                .map(|(&length_mm, count)| CutPiece { length_mm, count })
                .collect(),
        };
        tracing::debug!(
            required_mm = required,
            total_mm,
            pieces = plan.piece_count(),
            "planned stock cut"
        );
        Ok(plan)
    }
}
