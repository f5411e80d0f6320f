//! The experiment pipeline
//!
//! An experiment runs in three stages over one labeled dataset:
//!
//! 1. augmentation: every round draws a rank ensemble over the current features and appends the
//!    per-sample rank variance as a new feature, so later rounds also see earlier variances;
//! 2. sweep: for every cluster count, consensus k-means over the variance columns, reported
//!    with its outliers and entropies against the labels;
//! 3. split: every variance column is cut into groups by the variance split, the partitions are
//!    combined in a co-association matrix and clustered once more.
use std::fmt;
use std::io::Write;
use std::ops::RangeInclusive;

use consensus_rank::metrics::EntropyReport;
use consensus_rank::traits::Fit;
use consensus_rank::{LabelMap, ParamGuard, Samples};
use log::{debug, info};
use ndarray::{stack, Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rank_clustering::{
    CoAssociation, ConsensusClustering, ConsensusError, ConsensusKMeans, OutlierReport,
    SplitError, VarianceSplit,
};
use rank_ensemble::{RankEnsemble, RankError};

use crate::error::{ExperimentError, Result};

/// Settings of one experiment run
#[derive(Clone, Debug, PartialEq)]
pub struct Experiment {
    /// Number of augmentation rounds
    pub rounds: usize,
    /// Random projections per rank ensemble
    pub ensemble_size: usize,
    /// Worker threads of every rank ensemble, all cores if `None`
    pub n_threads: Option<usize>,
    /// k-means runs per consensus clustering
    pub n_runs: usize,
    /// Cluster counts of the sweep
    pub clusters: RangeInclusive<usize>,
    /// Groups of every variance split and clusters of the split ensemble
    pub split_groups: usize,
    /// Seed of the master generator the round seeds are drawn from
    pub seed: u64,
}

impl Default for Experiment {
    fn default() -> Self {
        Experiment {
            rounds: 4,
            ensemble_size: 33,
            n_threads: None,
            n_runs: 100,
            clusters: 1..=7,
            split_groups: 3,
            seed: 1,
        }
    }
}

/// Consensus clustering of the derived features with one cluster count
#[derive(Clone, Debug)]
pub struct SweepResult {
    pub n_clusters: usize,
    pub outliers: OutlierReport,
    pub entropy: EntropyReport<f64>,
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "clusters {}", self.n_clusters)?;
        writeln!(f, "{}", self.outliers)?;
        write!(f, "{}", self.entropy)
    }
}

/// Clustering of the co-associated variance splits
#[derive(Clone, Debug)]
pub struct SplitResult {
    /// Label and cluster of every sample, in dataset order
    pub assignments: Vec<(String, usize)>,
    pub entropy: EntropyReport<f64>,
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, cluster) in &self.assignments {
            writeln!(f, "{} {}", label, cluster)?;
        }
        write!(f, "{}", self.entropy)
    }
}

impl Experiment {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(ExperimentError::Options(
                "at least one augmentation round is needed".into(),
            ));
        }
        if self.clusters.is_empty() || *self.clusters.start() == 0 {
            return Err(ExperimentError::Options(format!(
                "cluster range {}..={} must be non-empty and start at 1 or above",
                self.clusters.start(),
                self.clusters.end()
            )));
        }
        if self.split_groups == 0 {
            return Err(ExperimentError::Options(
                "split groups must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Appends one rank variance feature per round to `samples`
    ///
    /// Returns the variance columns with shape `(n_samples, rounds)`.
    pub fn augment(&self, samples: &mut Samples<f64>) -> Result<Array2<f64>> {
        let mut master = Xoshiro256Plus::seed_from_u64(self.seed);
        let mut columns = Vec::with_capacity(self.rounds);

        for round in 0..self.rounds {
            let mut params =
                RankEnsemble::params_with_rng(Xoshiro256Plus::seed_from_u64(master.gen()))
                    .ensemble_size(self.ensemble_size);
            if let Some(n_threads) = self.n_threads {
                params = params.n_threads(n_threads);
            }

            let records = samples.records();
            info!(
                "round {}: ranking {} samples with {} features",
                round,
                records.nrows(),
                records.ncols()
            );
            let variance = Fit::<_, RankError>::fit(&params, &records)?.into_variance();

            samples.append_feature(variance.view())?;
            columns.push(variance);
        }

        let views = columns.iter().map(Array1::view).collect::<Vec<_>>();
        Ok(stack(Axis(1), &views).map_err(consensus_rank::Error::from)?)
    }

    /// Consensus k-means over `variances` for every cluster count of the sweep
    pub fn sweep(
        &self,
        variances: &Array2<f64>,
        labels: &LabelMap,
        targets: &Array1<usize>,
    ) -> Result<Vec<SweepResult>> {
        self.clusters
            .clone()
            .map(|n_clusters| {
                let params = ConsensusKMeans::params(n_clusters).n_runs(self.n_runs);
                let clustering: ConsensusClustering<f64> =
                    Fit::<_, ConsensusError>::fit(&params, variances)?;
                let entropy =
                    EntropyReport::evaluate(labels, targets, clustering.memberships(), n_clusters)?;

                Ok(SweepResult {
                    n_clusters,
                    outliers: clustering.outliers().clone(),
                    entropy,
                })
            })
            .collect()
    }

    /// Clusters the co-association of the variance splits of every column of `variances`
    pub fn split(
        &self,
        samples: &Samples<f64>,
        variances: &Array2<f64>,
        labels: &LabelMap,
        targets: &Array1<usize>,
    ) -> Result<SplitResult> {
        let mut coassociation = CoAssociation::new(variances.nrows());
        for feature in 0..variances.ncols() {
            let params = VarianceSplit::params()
                .n_groups(self.split_groups)
                .feature(feature);
            let partition = Fit::<_, SplitError>::fit(&params, variances)?;
            debug!(
                "feature {} split at {:?}",
                feature,
                partition.boundaries()
            );
            coassociation.accumulate(partition.memberships())?;
        }

        let meta = coassociation.to_records::<f64>();
        let memberships = ConsensusKMeans::params(self.split_groups)
            .check()?
            .partition(1, &meta)?;
        let entropy = EntropyReport::evaluate(labels, targets, &memberships, self.split_groups)?;

        let assignments = samples
            .iter()
            .zip(memberships.iter())
            .map(|(sample, &cluster)| (sample.label().to_string(), cluster))
            .collect();

        Ok(SplitResult {
            assignments,
            entropy,
        })
    }

    /// Runs all stages on `samples` and writes the report to `out`
    pub fn run<W: Write>(&self, mut samples: Samples<f64>, out: &mut W) -> Result<()> {
        self.validate()?;

        let labels = LabelMap::from_samples(&samples);
        let targets = labels.targets(&samples)?;
        info!(
            "{} samples with {} labels",
            samples.len(),
            labels.len()
        );

        let variances = self.augment(&mut samples)?;

        for result in self.sweep(&variances, &labels, &targets)? {
            writeln!(out, "{}", result)?;
        }

        let split = self.split(&samples, &variances, &labels, &targets)?;
        writeln!(out, "{}", split)?;

        Ok(())
    }
}
