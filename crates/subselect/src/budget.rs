//! Knapsack constraint shared by every optimizer.
//!
//! With a [`Budget`], each ground set element carries a cost and the total cost
//! of committed selections may never exceed the budget. Candidates that would
//! overflow the remaining budget are skipped, and a run ends early once no
//! affordable candidate remains.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-element costs and a total budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    costs: Vec<f64>,
    limit: f64,
}

impl Budget {
    /// Create a budget over `costs`, one entry per ground set element.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the limit or any cost is negative or not finite.
    pub fn new(costs: Vec<f64>, limit: f64) -> Result<Self, ConfigError> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(ConfigError::InvalidBudget(limit));
        }
        if let Some((index, &cost)) = costs
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(ConfigError::InvalidCost { index, cost });
        }
        Ok(Self { costs, limit })
    }

    /// Cost of one element.
    #[inline]
    pub fn cost(&self, index: usize) -> f64 {
        self.costs[index]
    }

    /// All costs.
    #[inline]
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Total budget.
    #[inline]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Total cost of a set of elements.
    pub fn total_cost(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.costs[i]).sum()
    }

    /// Check that there is one cost per ground set element.
    pub fn validate_for(&self, n_items: usize) -> Result<(), ConfigError> {
        if self.costs.len() != n_items {
            return Err(ConfigError::CostLengthMismatch {
                costs: self.costs.len(),
                n: n_items,
            });
        }
        Ok(())
    }
}

/// Running spend of one selection against an optional budget.
///
/// Without a budget everything is affordable.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Spend<'a> {
    budget: Option<&'a Budget>,
    spent: f64,
}

impl<'a> Spend<'a> {
    pub(crate) fn new(budget: Option<&'a Budget>) -> Self {
        Self { budget, spent: 0.0 }
    }

    /// Whether a budget is being enforced.
    #[inline]
    pub(crate) fn is_limited(&self) -> bool {
        self.budget.is_some()
    }

    #[inline]
    pub(crate) fn fits(&self, index: usize) -> bool {
        self.budget
            .is_none_or(|b| self.spent + b.cost(index) <= b.limit())
    }

    #[inline]
    pub(crate) fn charge(&mut self, index: usize) {
        if let Some(b) = self.budget {
            self.spent += b.cost(index);
        }
    }

    #[inline]
    pub(crate) fn spent(&self) -> f64 {
        self.spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_budget() {
        assert_eq!(
            Budget::new(vec![1.0], -1.0),
            Err(ConfigError::InvalidBudget(-1.0))
        );
        assert!(matches!(
            Budget::new(vec![1.0], f64::INFINITY),
            Err(ConfigError::InvalidBudget(_))
        ));
    }

    #[test]
    fn rejects_invalid_cost() {
        assert_eq!(
            Budget::new(vec![1.0, -2.0], 3.0),
            Err(ConfigError::InvalidCost {
                index: 1,
                cost: -2.0
            })
        );
    }

    #[test]
    fn validate_length() {
        let budget = Budget::new(vec![1.0, 2.0], 3.0).unwrap();
        assert!(budget.validate_for(2).is_ok());
        assert_eq!(
            budget.validate_for(3),
            Err(ConfigError::CostLengthMismatch { costs: 2, n: 3 })
        );
    }

    #[test]
    fn spend_tracks_remaining_budget() {
        let budget = Budget::new(vec![1.0, 2.0, 2.5], 3.0).unwrap();
        let mut spend = Spend::new(Some(&budget));

        assert!(spend.fits(2));
        spend.charge(1);
        assert!(spend.fits(0));
        assert!(!spend.fits(2));
        spend.charge(0);
        assert_eq!(spend.spent(), 3.0);
        assert!(!spend.fits(0));
    }

    #[test]
    fn unlimited_spend_fits_everything() {
        let mut spend = Spend::new(None);
        assert!(!spend.is_limited());
        spend.charge(0);
        assert!(spend.fits(123));
    }
}
