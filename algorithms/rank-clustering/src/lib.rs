//! `rank-clustering` groups samples by their derived rank features.
//!
//! ## The big picture
//!
//! `rank-clustering` is a crate in the `consensus-rank` workspace. It takes the per-sample
//! variances produced by `rank-ensemble` and turns them into clusters which are then compared to
//! the known labels.
//!
//! ## Current state
//!
//! `rank-clustering` provides:
//! * [K-Means](KMeans), squared euclidean m_k-means seeded with k-means++
//! * [Consensus K-Means](ConsensusKMeans), which clusters the co-association matrix of many
//!   seeded k-means runs and reports per-cluster outliers
//! * [Variance split](VarianceSplit), a one-dimensional partitioner that recursively cuts a
//!   sorted feature where the population variance drops the most
//!
//! Partitions of any origin can be combined with [`CoAssociation`].
mod consensus;
#[allow(clippy::new_ret_no_self)]
mod k_means;
mod variance_split;

pub use consensus::*;
pub use k_means::*;
pub use variance_split::*;
