use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug)]
pub enum SplitParamsError {
    #[error("n_groups cannot be 0")]
    NGroups,
}

/// An error when partitioning a feature
#[derive(Error, Debug)]
pub enum SplitError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] SplitParamsError),
    #[error("feature {feature} out of range for records with {n_features} features")]
    FeatureIndex { feature: usize, n_features: usize },
    #[error("feature {0} contains NaN")]
    NaN(usize),
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}
