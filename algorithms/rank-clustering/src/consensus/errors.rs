use crate::k_means::KMeansError;
use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum ConsensusParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("n_runs cannot be 0")]
    NRuns,
    #[error("sigma must be a positive finite number")]
    Sigma,
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when running consensus k-means
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] ConsensusParamsError),
    /// When one of the underlying k-means runs fails
    #[error("k-means run failed: {0}")]
    KMeans(#[from] KMeansError),
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}
