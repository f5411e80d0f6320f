use std::collections::HashMap;

use ndarray::Array1;

use super::{Float, Samples};
use crate::error::{Error, Result};

/// Immutable mapping from label names to dense ids `0..n_labels`
///
/// Ids are handed out in order of first appearance. The map is built once per experiment and
/// passed by reference to everything that needs integer targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl LabelMap {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut ids = HashMap::new();
        for label in labels {
            let label = label.as_ref();
            if !ids.contains_key(label) {
                ids.insert(label.to_string(), names.len());
                names.push(label.to_string());
            }
        }

        LabelMap { names, ids }
    }

    pub fn from_samples<F: Float>(samples: &Samples<F>) -> Self {
        Self::from_labels(samples.iter().map(|s| s.label()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, label: &str) -> Result<usize> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Integer targets of `samples` in collection order
    pub fn targets<F: Float>(&self, samples: &Samples<F>) -> Result<Array1<usize>> {
        samples.iter().map(|s| self.id(s.label())).collect()
    }
}
