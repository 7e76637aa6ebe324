//! Selection output and candidate bookkeeping.

use serde::{Deserialize, Serialize};

use crate::budget::Spend;
use crate::oracle::GainOracle;

// =============================================================================
// Selection
// =============================================================================

/// Output of an optimizer run.
///
/// `ranking` lists selected indices in commit order. `gains[i]` is the marginal
/// gain the oracle reported for `ranking[i]` at the moment it was committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub ranking: Vec<usize>,
    pub gains: Vec<f64>,
}

impl Selection {
    /// Empty selection with room for `k` entries.
    pub fn with_capacity(k: usize) -> Self {
        Self {
            ranking: Vec::with_capacity(k),
            gains: Vec::with_capacity(k),
        }
    }

    /// Append a committed index and its gain.
    #[inline]
    pub fn push(&mut self, index: usize, gain: f64) {
        self.ranking.push(index);
        self.gains.push(gain);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Sum of all recorded gains.
    pub fn total_gain(&self) -> f64 {
        self.gains.iter().sum()
    }

    /// Whether `index` was selected.
    pub fn contains(&self, index: usize) -> bool {
        self.ranking.contains(&index)
    }

    /// Iterate `(index, gain)` pairs in commit order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.ranking.iter().copied().zip(self.gains.iter().copied())
    }
}

// =============================================================================
// CandidatePool
// =============================================================================

/// Uncommitted candidates of one run, kept in pool order.
///
/// Pool order is the tie-break order of arg-max scans.
#[derive(Debug, Clone)]
pub(crate) struct CandidatePool {
    items: Vec<usize>,
}

impl CandidatePool {
    /// Candidates from `pool` that the oracle has not already selected.
    pub(crate) fn new<O: GainOracle + ?Sized>(oracle: &O, pool: &[usize]) -> Self {
        Self {
            items: pool
                .iter()
                .copied()
                .filter(|&i| !oracle.is_selected(i))
                .collect(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.items
    }

    /// Drop a committed candidate, preserving the order of the rest.
    pub(crate) fn remove(&mut self, index: usize) {
        if let Some(pos) = self.items.iter().position(|&i| i == index) {
            self.items.remove(pos);
        }
    }

    /// Candidates that still fit the budget.
    pub(crate) fn affordable(&self, spend: &Spend<'_>) -> Vec<usize> {
        if spend.is_limited() {
            self.items.iter().copied().filter(|&i| spend.fits(i)).collect()
        } else {
            self.items.clone()
        }
    }
}
