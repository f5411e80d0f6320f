//! `consensus-rank` evaluates whether unsupervised clustering recovers known groupings in a
//! small labeled dataset.
//!
//! The workspace is split the same way most of our toolkits are:
//!
//! * this crate holds the shared vocabulary: the [`Float`] bound, labeled samples and the
//!   label map, the error type, hyperparameter checking, a couple of dense linear algebra
//!   primitives and the entropy based clustering metrics;
//! * `rank-ensemble` builds per-sample features from the variance of PageRank scores
//!   across an ensemble of random projections;
//! * `rank-clustering` provides k-means, consensus k-means over a co-association matrix and a
//!   recursive variance-split partitioner;
//! * `rank-datasets` ships the Fisher iris data and synthetic blobs;
//! * `rank-cli` wires everything into the experiment driver.
//!
//! All computation is in-memory and deterministic for fixed seeds.

pub mod dataset;
pub mod error;
pub mod linalg;
mod metrics_clustering;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Float, LabelMap, LabeledSample, Samples};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;

/// Metrics comparing a clustering against ground truth labels
pub mod metrics {
    pub use crate::metrics_clustering::{max_entropy, row_entropy, ContingencyTable, EntropyReport};
}
