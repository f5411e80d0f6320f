use ndarray_rand::rand_distr::NormalError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankError>;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum RankParamsError {
    #[error("ensemble size must be at least 2, got {0}")]
    EnsembleSize(usize),
    #[error("damping must be in [0, 1], got {0}")]
    Damping(f64),
    #[error("tolerance must be greater than 0")]
    Tolerance,
    #[error("max_iterations cannot be 0")]
    MaxIterations,
    #[error("target dimension cannot be 0")]
    TargetDim,
    #[error("number of threads cannot be 0")]
    Threads,
}

/// An error when computing rank scores or the rank ensemble
#[derive(Error, Debug)]
pub enum RankError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] RankParamsError),
    /// When the ranking iteration does not reach the tolerance
    #[error("PageRank did not converge after {iterations} iterations (delta {delta})")]
    NotConverged { iterations: usize, delta: f64 },
    #[error("projection has no input dimension")]
    EmptyProjection,
    #[error(transparent)]
    Normal(#[from] NormalError),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}
