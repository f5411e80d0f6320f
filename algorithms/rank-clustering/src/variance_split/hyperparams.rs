use crate::variance_split::SplitParamsError;
use consensus_rank::ParamGuard;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
/// The set of hyperparameters that can be specified for the
/// [variance split](crate::VarianceSplit).
pub struct VarianceSplitValidParams {
    /// Maximal number of groups, fewer are returned once no segment can be split
    n_groups: usize,
    /// Index of the feature to partition
    feature: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An helper struct used to construct a set of [valid hyperparameters](VarianceSplitValidParams)
/// for the [variance split](crate::VarianceSplit) (using the builder pattern).
pub struct VarianceSplitParams(VarianceSplitValidParams);

impl Default for VarianceSplitParams {
    fn default() -> Self {
        Self::new()
    }
}

impl VarianceSplitParams {
    /// Defaults are `n_groups = 3` and `feature = 0`
    pub fn new() -> Self {
        Self(VarianceSplitValidParams {
            n_groups: 3,
            feature: 0,
        })
    }

    pub fn n_groups(mut self, n_groups: usize) -> Self {
        self.0.n_groups = n_groups;
        self
    }

    /// Change the partitioned feature
    pub fn feature(mut self, feature: usize) -> Self {
        self.0.feature = feature;
        self
    }
}

impl ParamGuard for VarianceSplitParams {
    type Checked = VarianceSplitValidParams;
    type Error = SplitParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_groups == 0 {
            Err(SplitParamsError::NGroups)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl VarianceSplitValidParams {
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    pub fn feature(&self) -> usize {
        self.feature
    }
}
