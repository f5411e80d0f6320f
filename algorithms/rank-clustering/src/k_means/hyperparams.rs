use crate::k_means::KMeansParamsError;
use consensus_rank::{Float, ParamGuard};
use rand::Rng;

/// Checked settings of a [k-means](crate::KMeans) fit
///
/// Every run draws its k-means++ seeds from `rng`, so a fit with a freshly seeded generator is
/// reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansValidParams<F: Float, R: Rng> {
    n_clusters: usize,
    n_runs: usize,
    tolerance: F,
    max_n_iterations: u64,
    rng: R,
}

/// Builder of [`KMeansValidParams`]
///
/// Defaults: a single run, `tolerance = 1e-4` and `max_n_iterations = 300`.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansParams<F: Float, R: Rng>(KMeansValidParams<F, R>);

impl<F: Float, R: Rng> KMeansParams<F, R> {
    pub fn new(n_clusters: usize, rng: R) -> Self {
        KMeansParams(KMeansValidParams {
            n_clusters,
            n_runs: 1,
            tolerance: F::cast(1e-4),
            max_n_iterations: 300,
            rng,
        })
    }

    /// Number of seedings tried one after the other, the converged run of lowest inertia wins
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// A run has converged once the summed squared centroid shift falls below `tolerance`
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for KMeansParams<F, R> {
    type Checked = KMeansValidParams<F, R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let params = &self.0;
        if params.n_clusters == 0 {
            return Err(KMeansParamsError::NClusters);
        }
        if params.n_runs == 0 {
            return Err(KMeansParamsError::NRuns);
        }
        if params.tolerance.is_nan() || params.tolerance <= F::zero() {
            return Err(KMeansParamsError::Tolerance);
        }
        if params.max_n_iterations == 0 {
            return Err(KMeansParamsError::MaxIterations);
        }

        Ok(params)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}
