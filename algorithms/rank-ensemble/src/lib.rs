//! # Rank ensembles
//!
//! `rank-ensemble` derives one feature per sample from how stable its centrality is under many
//! random views of the data.
//!
//! ## The big picture
//!
//! `rank-ensemble` is a crate in the `consensus-rank` workspace. The pipeline is:
//!
//! * draw an ensemble of Gaussian [random projections](ProjectionSpec), each a pure function of
//!   its seed;
//! * for every unordered pair of projections, project the records through both and score every
//!   sample with [PageRank](PageRankValidParams) over the complete cosine similarity graph
//!   between the two views;
//! * aggregate the per-pair scores into a per-sample mean and [variance](RankVariance).
//!
//! Samples whose relative standing shifts a lot between random views get a high variance, which
//! makes the variance a proxy for how peripheral a sample is.
//!
//! ## Current state
//!
//! The pair units are scheduled on a bounded `rayon` pool. Every unit reads the shared records
//! immutably and owns its output slot; aggregation only starts once all units have joined.
mod ensemble;
mod error;
mod projection;
mod similarity;

pub use ensemble::*;
pub use error::{RankError, RankParamsError, Result};
pub use projection::ProjectionSpec;
pub use similarity::{similarity_graph, PageRank, PageRankParams, PageRankValidParams};
