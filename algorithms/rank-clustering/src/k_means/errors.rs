use thiserror::Error;

/// Rejected k-means settings
#[derive(Error, Debug)]
pub enum KMeansParamsError {
    #[error("at least one cluster is needed")]
    NClusters,
    #[error("at least one run is needed")]
    NRuns,
    #[error("convergence tolerance must be positive")]
    Tolerance,
    #[error("iteration cap must be positive")]
    MaxIterations,
}

/// Failure of a k-means fit
#[derive(Error, Debug)]
pub enum KMeansError {
    #[error("invalid k-means settings: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    #[error("cannot find {n_clusters} clusters in {n_samples} observations")]
    TooManyClusters { n_clusters: usize, n_samples: usize },
    /// No run reached the tolerance within the iteration cap
    #[error("no k-means run converged")]
    NotConverged,
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}
