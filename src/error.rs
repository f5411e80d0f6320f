//! Error types shared by the workspace
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("column count mismatch: {0} != {1}")]
    ShapeMismatch(usize, usize),
    #[error("unknown label {0:?}")]
    UnknownLabel(String),
    #[error("sample {index} has {found} features, expected {expected}")]
    FeatureArity {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Not enough samples to compute the mean")]
    NotEnoughSamples,
}
