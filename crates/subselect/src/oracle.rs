//! The gain oracle contract consumed by every optimizer.
//!
//! An oracle wraps a submodular set function over the ground set `0..n` and
//! owns the selection state: a membership mask plus whatever aggregate
//! statistic the objective needs to answer marginal gain queries.
//!
//! Optimizers never see the objective itself. They only ask for marginal gains
//! of candidate indices and tell the oracle which index to commit.
//!
//! # Contract
//!
//! Implementations must be submodular: the gain of any index never increases
//! as the selection grows. The lazy optimizers rely on this to skip
//! re-evaluations. It is not checked at runtime.

/// A submodular objective with mutable selection state.
///
/// `Send + Sync` is required so that read-only gain scans can be split across
/// worker threads.
pub trait GainOracle: Send + Sync {
    /// Size of the ground set.
    fn n_items(&self) -> usize;

    /// Reset the selection state.
    ///
    /// Indices in `initial_subset` are folded into the aggregate and marked
    /// as selected before any optimizer runs.
    fn initialize(&mut self, initial_subset: Option<&[usize]>);

    /// Marginal gain of adding each candidate to the current selection.
    ///
    /// Writes `gains[i]` for `candidates[i]`. Must not mutate state, and must
    /// give the same answer whether called on one candidate or on many.
    fn calculate_gains(&self, candidates: &[usize], gains: &mut [f64]);

    /// Commit `index` into the selection state.
    fn select_next(&mut self, index: usize);

    /// Whether `index` is currently part of the selection.
    fn is_selected(&self, index: usize) -> bool;

    /// Marginal gain of a single candidate.
    #[inline]
    fn gain(&self, index: usize) -> f64 {
        let mut gain = [0.0];
        self.calculate_gains(&[index], &mut gain);
        gain[0]
    }
}

/// An oracle that can also take elements back out of its selection.
///
/// Needed by [`BidirectionalGreedy`](crate::optim::BidirectionalGreedy), which
/// shrinks an upper set while growing a lower one.
pub trait ReversibleOracle: GainOracle {
    /// Change in objective from removing each selected candidate.
    ///
    /// Writes `f(S \ {i}) - f(S)` into `gains[i]` for `candidates[i]`.
    fn calculate_removal_gains(&self, candidates: &[usize], gains: &mut [f64]);

    /// Remove `index` from the selection state.
    fn deselect(&mut self, index: usize);

    /// Removal gain of a single candidate.
    #[inline]
    fn removal_gain(&self, index: usize) -> f64 {
        let mut gain = [0.0];
        self.calculate_removal_gains(&[index], &mut gain);
        gain[0]
    }
}
