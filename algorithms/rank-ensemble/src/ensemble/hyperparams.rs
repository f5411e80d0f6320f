use consensus_rank::ParamGuard;
use rand::Rng;

use crate::error::RankParamsError;
use crate::similarity::{PageRank, PageRankValidParams};

/// The set of hyperparameters that can be specified for the execution of
/// the [rank ensemble](crate::RankEnsemble).
#[derive(Clone, Debug, PartialEq)]
pub struct RankEnsembleValidParams<R: Rng> {
    /// Number of random projections, every unordered pair of them is one unit of work
    ensemble_size: usize,
    /// Output dimension of every projection, `None` keeps the input dimension
    target_dim: Option<usize>,
    /// Size of the worker pool, `None` uses every available core
    n_threads: Option<usize>,
    /// Ranking of the similarity graph of each unit
    rank: PageRankValidParams,
    /// Source of the projection seeds
    rng: R,
}

/// An helper struct used to construct a set of [valid hyperparameters](RankEnsembleValidParams)
/// for the [rank ensemble](crate::RankEnsemble) (using the builder pattern).
#[derive(Clone, Debug, PartialEq)]
pub struct RankEnsembleParams<R: Rng>(RankEnsembleValidParams<R>);

impl<R: Rng> RankEnsembleParams<R> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `ensemble_size = 33`
    /// * `target_dim = None` (same as the input)
    /// * `n_threads = None` (all cores)
    /// * PageRank with `damping = 1.0`, `tolerance = 1e-9`, `max_iterations = 10_000`
    pub fn new(rng: R) -> Self {
        Self(RankEnsembleValidParams {
            ensemble_size: 33,
            target_dim: None,
            n_threads: None,
            rank: PageRank::params().check_unwrap(),
            rng,
        })
    }

    /// Change the number of random projections
    pub fn ensemble_size(mut self, ensemble_size: usize) -> Self {
        self.0.ensemble_size = ensemble_size;
        self
    }

    /// Change the output dimension of the projections
    pub fn target_dim(mut self, target_dim: usize) -> Self {
        self.0.target_dim = Some(target_dim);
        self
    }

    /// Bound the worker pool to `n_threads`
    pub fn n_threads(mut self, n_threads: usize) -> Self {
        self.0.n_threads = Some(n_threads);
        self
    }

    /// Change the PageRank damping factor
    pub fn damping(mut self, damping: f64) -> Self {
        self.0.rank.damping = damping;
        self
    }

    /// Change the PageRank convergence tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.rank.tolerance = tolerance;
        self
    }

    /// Change the PageRank iteration cap
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.rank.max_iterations = max_iterations;
        self
    }

    /// Change the random number generator used for the projection seeds
    pub fn with_rng<R2: Rng>(self, rng: R2) -> RankEnsembleParams<R2> {
        RankEnsembleParams(RankEnsembleValidParams {
            ensemble_size: self.0.ensemble_size,
            target_dim: self.0.target_dim,
            n_threads: self.0.n_threads,
            rank: self.0.rank,
            rng,
        })
    }
}

impl<R: Rng> ParamGuard for RankEnsembleParams<R> {
    type Checked = RankEnsembleValidParams<R>;
    type Error = RankParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        self.0.rank.validate()?;
        if self.0.ensemble_size < 2 {
            Err(RankParamsError::EnsembleSize(self.0.ensemble_size))
        } else if self.0.target_dim == Some(0) {
            Err(RankParamsError::TargetDim)
        } else if self.0.n_threads == Some(0) {
            Err(RankParamsError::Threads)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<R: Rng> RankEnsembleValidParams<R> {
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    /// Number of projection pairs ranked by a fit
    pub fn n_units(&self) -> usize {
        self.ensemble_size * (self.ensemble_size - 1) / 2
    }

    pub fn target_dim(&self) -> Option<usize> {
        self.target_dim
    }

    pub fn n_threads(&self) -> Option<usize> {
        self.n_threads
    }

    pub fn rank(&self) -> &PageRankValidParams {
        &self.rank
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}
