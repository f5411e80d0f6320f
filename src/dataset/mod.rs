//! Datasets
//!
//! This module implements the labeled sample collection shared by the experiment and the
//! helper traits used by the algorithms.
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix2, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod labels;
pub use labels::LabelMap;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in records of a dataset,
/// projection matrices and rank scores.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + num_traits::MulAdd<Output = Self>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

impl<F, D: Data<Elem = F>> Records for ArrayBase<D, Ix2> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.nrows()
    }

    fn nfeatures(&self) -> usize {
        self.ncols()
    }
}

/// A single observation of the experiment
///
/// The feature vector only ever grows: derived features are appended at the end. The original
/// index survives any re-ordering of the collection and is used to map results back.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample<F> {
    features: Vec<F>,
    label: String,
    cluster: Option<usize>,
    index: usize,
}

impl<F: Float> LabeledSample<F> {
    pub fn new(features: Vec<F>, label: impl Into<String>, index: usize) -> Self {
        LabeledSample {
            features,
            label: label.into(),
            cluster: None,
            index,
        }
    }

    pub fn features(&self) -> &[F] {
        &self.features
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cluster assigned by the last clustering, `None` before any assignment
    pub fn cluster(&self) -> Option<usize> {
        self.cluster
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered collection of labeled samples with a common feature arity
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Samples<F> {
    samples: Vec<LabeledSample<F>>,
    nfeatures: usize,
}

impl<F: Float> Samples<F> {
    /// Wraps the samples, failing if the feature vectors do not share one arity
    pub fn new(samples: Vec<LabeledSample<F>>) -> Result<Self> {
        let nfeatures = samples.first().map(|s| s.features.len()).unwrap_or(0);
        if let Some(bad) = samples.iter().find(|s| s.features.len() != nfeatures) {
            return Err(Error::FeatureArity {
                index: bad.index,
                expected: nfeatures,
                found: bad.features.len(),
            });
        }

        Ok(Samples { samples, nfeatures })
    }

    /// Builds samples from a record matrix with shape `(n_samples, n_features)` and one
    /// label per row. Row numbers become the original indices.
    pub fn from_records<D: Data<Elem = F>>(
        records: &ArrayBase<D, Ix2>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if records.nrows() != labels.len() {
            return Err(Error::ShapeMismatch(records.nrows(), labels.len()));
        }

        let samples = records
            .rows()
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(index, (row, label))| LabeledSample::new(row.to_vec(), label, index))
            .collect();

        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledSample<F>> {
        self.samples.iter()
    }

    /// Feature matrix with shape `(n_samples, n_features)`
    pub fn records(&self) -> Array2<F> {
        let mut records = Array2::zeros((self.samples.len(), self.nfeatures));
        for (mut row, sample) in records.rows_mut().into_iter().zip(&self.samples) {
            row.assign(&ArrayView1::from(&sample.features[..]));
        }
        records
    }

    /// Ground-truth labels in sample order
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }

    /// Appends one derived feature to every sample
    pub fn append_feature(&mut self, values: ArrayView1<F>) -> Result<()> {
        if values.len() != self.samples.len() {
            return Err(Error::ShapeMismatch(self.samples.len(), values.len()));
        }

        for (sample, value) in self.samples.iter_mut().zip(values.iter()) {
            sample.features.push(*value);
        }
        self.nfeatures += 1;

        Ok(())
    }

    /// Stores a cluster assignment, one cluster id per sample in collection order
    pub fn assign_clusters(&mut self, memberships: &Array1<usize>) -> Result<()> {
        if memberships.len() != self.samples.len() {
            return Err(Error::ShapeMismatch(self.samples.len(), memberships.len()));
        }

        for (sample, &cluster) in self.samples.iter_mut().zip(memberships.iter()) {
            sample.cluster = Some(cluster);
        }

        Ok(())
    }
}

impl<F> Records for Samples<F> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.samples.len()
    }

    fn nfeatures(&self) -> usize {
        self.nfeatures
    }
}
