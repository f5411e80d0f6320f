use std::fmt;

use consensus_rank::{Error, Float, Result};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2, Zip};

/// Per-cluster, per-feature outlier counts
///
/// A value is an outlier when it lies more than `sigma` population standard deviations away
/// from the mean of its feature within its cluster. Empty clusters have no outliers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlierReport {
    counts: Array2<usize>,
}

impl OutlierReport {
    /// Counts the outliers of `records` clustered by `memberships`
    pub fn new<F: Float>(
        records: &ArrayBase<impl Data<Elem = F>, Ix2>,
        memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
        n_clusters: usize,
        sigma: F,
    ) -> Result<Self> {
        if records.nrows() != memberships.len() {
            return Err(Error::ShapeMismatch(records.nrows(), memberships.len()));
        }
        if let Some(&cluster) = memberships.iter().find(|&&c| c >= n_clusters) {
            return Err(Error::Parameters(format!(
                "cluster index {} out of range for {} clusters",
                cluster, n_clusters
            )));
        }

        let n_features = records.ncols();
        let mut sizes = Array1::<usize>::zeros(n_clusters);
        let mut means = Array2::<F>::zeros((n_clusters, n_features));
        Zip::from(records.rows())
            .and(memberships)
            .for_each(|record, &c| {
                let mut mean = means.row_mut(c);
                mean += &record;
                sizes[c] += 1;
            });
        Zip::from(means.rows_mut())
            .and(&sizes)
            .for_each(|mut mean, &size| {
                if size > 0 {
                    mean /= F::cast(size);
                }
            });

        let mut std_devs = Array2::<F>::zeros((n_clusters, n_features));
        Zip::from(records.rows())
            .and(memberships)
            .for_each(|record, &c| {
                Zip::from(std_devs.row_mut(c))
                    .and(&record)
                    .and(means.row(c))
                    .for_each(|s, &x, &m| *s += (x - m) * (x - m));
            });
        Zip::from(std_devs.rows_mut())
            .and(&sizes)
            .for_each(|mut std_dev, &size| {
                if size > 0 {
                    std_dev.mapv_inplace(|s| (s / F::cast(size)).sqrt());
                }
            });

        let mut counts = Array2::zeros((n_clusters, n_features));
        Zip::from(records.rows())
            .and(memberships)
            .for_each(|record, &c| {
                Zip::from(counts.row_mut(c))
                    .and(&record)
                    .and(means.row(c))
                    .and(std_devs.row(c))
                    .for_each(|count, &x, &m, &s| {
                        if (x - m).abs() > sigma * s {
                            *count += 1;
                        }
                    });
            });

        Ok(OutlierReport { counts })
    }

    /// Outlier counts with shape `(n_clusters, n_features)`
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Outliers over all clusters and features
    pub fn total(&self) -> usize {
        self.counts.sum()
    }
}

impl fmt::Display for OutlierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (cluster, row) in self.counts.rows().into_iter().enumerate() {
            write!(f, "cluster {}:", cluster)?;
            for count in row {
                write!(f, " {}", count)?;
            }
            writeln!(f)?;
        }
        write!(f, "total {}", self.total())
    }
}
