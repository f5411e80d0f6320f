use rank_clustering::{ConsensusError, ConsensusParamsError, KMeansError, SplitError};
use rank_datasets::DatasetError;
use rank_ensemble::RankError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExperimentError>;

/// Everything that aborts an experiment run
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("invalid option: {0}")]
    Options(String),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
    #[error(transparent)]
    ConsensusParams(#[from] ConsensusParamsError),
    #[error(transparent)]
    KMeans(#[from] KMeansError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}
