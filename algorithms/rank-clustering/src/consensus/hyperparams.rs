use crate::consensus::ConsensusParamsError;
use crate::k_means::{KMeans, KMeansParams};
use consensus_rank::{Float, ParamGuard};
use rand::SeedableRng;
use rand_isaac::Isaac64Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// [consensus k-means](crate::ConsensusKMeans).
pub struct ConsensusValidParams<F: Float> {
    /// The number of clusters of every run and of the final clustering
    n_clusters: usize,
    /// Number of independent k-means runs, run `i` is seeded with `i` (starting at 1)
    n_runs: usize,
    /// Seed of the k-means run over the co-association matrix
    final_seed: u64,
    /// Deviation from the cluster mean, in standard deviations, beyond which a value is an outlier
    sigma: F,
    /// Convergence tolerance of every k-means run
    tolerance: F,
    /// Iteration cap of every k-means run
    max_n_iterations: u64,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](ConsensusValidParams) for
/// [consensus k-means](crate::ConsensusKMeans) (using the builder pattern).
pub struct ConsensusParams<F: Float>(ConsensusValidParams<F>);

impl<F: Float> ConsensusParams<F> {
    /// Defaults are provided if optional parameters are not specified:
    /// * `n_runs = 100`
    /// * `final_seed = 1`
    /// * `sigma = 3`
    /// * `tolerance = 1e-4`
    /// * `max_n_iterations = 300`
    pub fn new(n_clusters: usize) -> Self {
        Self(ConsensusValidParams {
            n_clusters,
            n_runs: 100,
            final_seed: 1,
            sigma: F::cast(3.),
            tolerance: F::cast(1e-4),
            max_n_iterations: 300,
        })
    }

    /// Change the number of k-means runs accumulated in the co-association matrix
    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    /// Change the seed of the final clustering
    pub fn final_seed(mut self, final_seed: u64) -> Self {
        self.0.final_seed = final_seed;
        self
    }

    /// Change the outlier threshold
    pub fn sigma(mut self, sigma: F) -> Self {
        self.0.sigma = sigma;
        self
    }

    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }
}

impl<F: Float> ParamGuard for ConsensusParams<F> {
    type Checked = ConsensusValidParams<F>;
    type Error = ConsensusParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            Err(ConsensusParamsError::NClusters)
        } else if self.0.n_runs == 0 {
            Err(ConsensusParamsError::NRuns)
        } else if !self.0.sigma.is_finite() || self.0.sigma <= F::zero() {
            Err(ConsensusParamsError::Sigma)
        } else if self.0.tolerance <= F::zero() {
            Err(ConsensusParamsError::Tolerance)
        } else if self.0.max_n_iterations == 0 {
            Err(ConsensusParamsError::MaxIterations)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> ConsensusValidParams<F> {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn final_seed(&self) -> u64 {
        self.final_seed
    }

    pub fn sigma(&self) -> F {
        self.sigma
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    /// Parameters of a single k-means run seeded with `seed`
    pub fn k_means(&self, seed: u64) -> KMeansParams<F, Isaac64Rng> {
        KMeans::params_with_rng(self.n_clusters, Isaac64Rng::seed_from_u64(seed))
            .n_runs(1)
            .tolerance(self.tolerance)
            .max_n_iterations(self.max_n_iterations)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConsensusKMeans, ConsensusParams, ConsensusParamsError, ConsensusValidParams};
    use consensus_rank::ParamGuard;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<ConsensusParams<f64>>();
        has_autotraits::<ConsensusValidParams<f64>>();
    }

    #[test]
    fn defaults() {
        let params = ConsensusKMeans::params::<f64>(3).check_unwrap();
        assert_eq!(params.n_clusters(), 3);
        assert_eq!(params.n_runs(), 100);
        assert_eq!(params.final_seed(), 1);
        assert_eq!(params.sigma(), 3.0f64);
    }

    #[test]
    fn k_means_settings_follow_the_consensus() {
        let params = ConsensusKMeans::params::<f64>(4)
            .tolerance(1e-6)
            .max_n_iterations(50)
            .check_unwrap();
        let k_means = params.k_means(9).check_unwrap();
        assert_eq!(k_means.n_clusters(), 4);
        assert_eq!(k_means.n_runs(), 1);
        assert_eq!(k_means.tolerance(), 1e-6);
        assert_eq!(k_means.max_n_iterations(), 50);
    }

    #[test]
    fn n_clusters_cannot_be_zero() {
        let res = ConsensusKMeans::params::<f64>(0).check();
        assert!(matches!(res, Err(ConsensusParamsError::NClusters)))
    }

    #[test]
    fn n_runs_cannot_be_zero() {
        let res = ConsensusKMeans::params::<f64>(2).n_runs(0).check();
        assert!(matches!(res, Err(ConsensusParamsError::NRuns)))
    }

    #[test]
    fn sigma_has_to_be_positive() {
        let res = ConsensusKMeans::params(2).sigma(0.).check();
        assert!(matches!(res, Err(ConsensusParamsError::Sigma)));
        let res = ConsensusKMeans::params(2).sigma(f64::NAN).check();
        assert!(matches!(res, Err(ConsensusParamsError::Sigma)));
    }

    #[test]
    fn tolerance_has_to_be_positive() {
        let res = ConsensusKMeans::params(2).tolerance(-1.).check();
        assert!(matches!(res, Err(ConsensusParamsError::Tolerance)))
    }

    #[test]
    fn max_n_iterations_cannot_be_zero() {
        let res = ConsensusKMeans::params::<f64>(2).max_n_iterations(0).check();
        assert!(matches!(res, Err(ConsensusParamsError::MaxIterations)))
    }
}
