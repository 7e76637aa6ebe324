//! Reference oracles and data generators.
//!
//! These objectives are small, exact implementations of common submodular
//! functions. They back the crate's own tests and benches and are handy for
//! checking a custom oracle against known behavior.
//!
//! | Oracle | Objective | Monotone | Reversible |
//! |--------|-----------|----------|------------|
//! | [`WeightedCoverage`] | Total weight of covered concepts | yes | yes |
//! | [`FeatureBased`] | Concave function of summed features | yes | no |
//! | [`FacilityLocation`] | Sum of best similarity per point | yes | no |
//! | [`GraphCut`] | Weight of edges leaving the selection | no | yes |

mod coverage;
mod data;
mod facility_location;
mod feature_based;
mod graph_cut;

pub use coverage::WeightedCoverage;
pub use data::{random_features, rbf_similarity};
pub use facility_location::FacilityLocation;
pub use feature_based::{Concavity, FeatureBased};
pub use graph_cut::GraphCut;
