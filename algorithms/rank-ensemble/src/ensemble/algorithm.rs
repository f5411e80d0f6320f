use std::collections::HashSet;

use consensus_rank::{prelude::*, Float};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use ndarray_rand::rand_distr::{Distribution, StandardNormal};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;

use crate::ensemble::{RankEnsembleParams, RankEnsembleValidParams};
use crate::error::{RankError, Result};
use crate::projection::ProjectionSpec;

/// Seed of the default projection seed generator
const DEFAULT_SEED: u64 = 1;

/// Rank ensemble
///
/// Scores every sample by how much its PageRank centrality moves between random views of the
/// data. An ensemble of `S` Gaussian random projections is drawn, every one of the `S(S-1)/2`
/// unordered pairs `(a, b)` becomes a unit of work: the records are projected through `a` and
/// `b`, the complete cosine similarity graph between the two views is ranked, and the unit
/// yields one score per sample. The mean and the population variance of the scores across all
/// units are the result.
///
/// Units run on a dedicated `rayon` pool bounded by `n_threads`. They only share the records
/// and the projected views, both read-only, and each writes a private score vector, so the
/// result does not depend on the number of threads.
///
/// ## Example
///
/// ```rust
/// use consensus_rank::prelude::*;
/// use rank_ensemble::RankEnsemble;
/// use ndarray::array;
///
/// let records = array![[1., 0.], [0.9, 0.1], [0., 1.], [0.2, 0.8], [5., 5.]];
/// let spread = RankEnsemble::params()
///     .ensemble_size(4)
///     .n_threads(2)
///     .fit(&records)
///     .unwrap();
///
/// assert_eq!(spread.n_units(), 6);
/// assert_eq!(spread.variance().len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RankVariance<F> {
    projections: Vec<ProjectionSpec>,
    ranks: Array2<F>,
    mean: Array1<F>,
    variance: Array1<F>,
}

/// Marker for the rank ensemble builder
pub struct RankEnsemble;

impl RankEnsemble {
    pub fn params() -> RankEnsembleParams<Xoshiro256Plus> {
        RankEnsembleParams::new(Xoshiro256Plus::seed_from_u64(DEFAULT_SEED))
    }

    pub fn params_with_rng<R: Rng>(rng: R) -> RankEnsembleParams<R> {
        RankEnsembleParams::new(rng)
    }
}

impl<F: Float> RankVariance<F> {
    /// The projections of the ensemble, in the order their seeds were drawn
    pub fn projections(&self) -> &[ProjectionSpec] {
        &self.projections
    }

    /// Number of projection pairs that were ranked
    pub fn n_units(&self) -> usize {
        self.ranks.nrows()
    }

    /// Scores of every unit, with shape `(n_units, n_samples)`
    ///
    /// Units are ordered by their pair `(a, b)` with `a < b`, in lexicographic order.
    pub fn ranks(&self) -> &Array2<F> {
        &self.ranks
    }

    /// Per-sample mean score
    pub fn mean(&self) -> &Array1<F> {
        &self.mean
    }

    /// Per-sample population variance of the scores
    pub fn variance(&self) -> &Array1<F> {
        &self.variance
    }

    /// Consumes the result, returning the variance
    pub fn into_variance(self) -> Array1<F> {
        self.variance
    }
}

/// Unordered pairs `(a, b)` with `a < b < size`, in lexicographic order
fn projection_pairs(size: usize) -> Vec<(usize, usize)> {
    (0..size)
        .flat_map(|a| (a + 1..size).map(move |b| (a, b)))
        .collect()
}

impl<R: Rng + Clone> RankEnsembleValidParams<R> {
    /// Draws the projections of the ensemble for records with `n_features` features
    ///
    /// Seeds are non-zero and pairwise distinct.
    pub fn projections(&self, n_features: usize) -> Vec<ProjectionSpec> {
        let mut rng = self.rng().clone();
        let target_dim = self.target_dim().unwrap_or(n_features);

        let mut seen = HashSet::with_capacity(self.ensemble_size());
        let mut projections = Vec::with_capacity(self.ensemble_size());
        while projections.len() < self.ensemble_size() {
            let projection = ProjectionSpec::new(target_dim, n_features, rng.gen::<u64>() >> 1);
            if seen.insert(projection.seed()) {
                projections.push(projection);
            }
        }

        projections
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F> + Sync> Fit<ArrayBase<D, Ix2>, RankError>
    for RankEnsembleValidParams<R>
where
    StandardNormal: Distribution<F>,
{
    type Object = RankVariance<F>;

    /// Given records with shape `(n_samples, n_features)`, ranks every sample in all units of
    /// the ensemble and returns the per-sample mean and variance.
    fn fit(&self, records: &ArrayBase<D, Ix2>) -> Result<Self::Object> {
        let projections = self.projections(records.ncols());
        let pairs = projection_pairs(projections.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_threads().unwrap_or(0))
            .build()?;
        info!(
            "ranking {} samples in {} projection pairs on {} threads",
            records.nrows(),
            pairs.len(),
            pool.current_num_threads()
        );

        let rank = self.rank();
        let ranks = pool.install(|| -> Result<Vec<Array1<F>>> {
            let views = projections
                .par_iter()
                .map(|projection| projection.project(records))
                .collect::<Result<Vec<_>>>()?;
            debug!("projected records through {} views", views.len());

            pairs
                .par_iter()
                .map(|&(a, b)| rank.similarity_rank(&views[a], &views[b]))
                .collect()
        })?;

        let n_samples = records.nrows();
        let flat = ranks.iter().flatten().copied().collect::<Vec<_>>();
        let ranks = Array2::from_shape_vec((pairs.len(), n_samples), flat)
            .map_err(consensus_rank::Error::from)?;

        let mean = ranks
            .mean_axis(Axis(0))
            .ok_or(consensus_rank::Error::NotEnoughSamples)?;
        let variance = ranks.var_axis(Axis(0), F::zero());
        debug!(
            "rank variance spans [{}, {}]",
            variance.iter().copied().fold(F::infinity(), F::min),
            variance.iter().copied().fold(F::neg_infinity(), F::max)
        );

        Ok(RankVariance {
            projections,
            ranks,
            mean,
            variance,
        })
    }
}
