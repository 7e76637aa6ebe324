//! subselect: greedy optimizers for submodular subset selection.
//!
//! Picks a size-k subset of a ground set `0..n` that approximately maximizes a
//! submodular objective. The objective lives behind the [`GainOracle`] trait;
//! this crate only drives it.
//!
//! # Key Types
//!
//! - [`GainOracle`] / [`ReversibleOracle`] - The objective contract
//! - [`SelectionConfig`] / [`SubsetSelector`] - Configure and run a selection
//! - [`OptimizerKind`] - Closed set of batch optimizers
//! - [`SieveStreaming`] - Incremental selection over a stream
//! - [`Selection`] - Ranking plus per-step gains
//!
//! # Selecting
//!
//! Use `SelectionConfig::builder()` to configure, then `SubsetSelector::fit()`.
//! Individual optimizers in [`optim`] can also be driven directly.
//!
//! ```
//! use subselect::{SelectionConfig, SubsetSelector};
//! use subselect::optim::OptimizerKind;
//! use subselect::testing::{FeatureBased, random_features};
//!
//! let mut oracle = FeatureBased::new(random_features(100, 5, 0));
//! let config = SelectionConfig::builder()
//!     .k(10)
//!     .optimizer(OptimizerKind::two_stage(3))
//!     .build()
//!     .unwrap();
//!
//! let selection = SubsetSelector::new(config).unwrap().fit(&mut oracle).unwrap();
//! assert_eq!(selection.len(), 10);
//! ```

// Re-export approx traits for users who want to compare gains
pub use approx;

pub mod budget;
pub mod error;
pub mod logger;
pub mod optim;
pub mod oracle;
pub mod queue;
pub mod selection;
pub mod selector;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Contracts and outputs
pub use oracle::{GainOracle, ReversibleOracle};
pub use selection::Selection;

// Configuration and entry point
pub use budget::Budget;
pub use logger::Verbosity;
pub use selector::{SelectionConfig, SubsetSelector};

// Optimizers
pub use optim::{BidirectionalGreedy, Optimizer, OptimizerKind, RunOptions, SieveStreaming};

// Errors
pub use error::{ConfigError, SelectionError};
pub use queue::{PriorityQueue, QueueEmpty};

// Shared utilities
pub use utils::{Parallelism, run_with_threads};
