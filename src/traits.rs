//! Provide traits for different classes of algorithms
//!

use crate::dataset::Records;

/// Fittable algorithms
///
/// A fittable algorithm takes records and creates a concept of some kind about it. Checked
/// hyperparameters implement this trait, unchecked ones get it through [`ParamGuard`] with the
/// checking step done automatically.
///
/// [`ParamGuard`]: crate::ParamGuard
pub trait Fit<R: Records, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, records: &R) -> Result<Self::Object, E>;
}

/// Predict with model
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}
