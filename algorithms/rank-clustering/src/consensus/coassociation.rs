use consensus_rank::{Error, Float, Result};
use ndarray::{Array2, ArrayBase, Data, Ix1};

/// Co-association counts
///
/// Entry `(i, j)` counts the partitions in which samples `i` and `j` share a cluster. The matrix
/// is symmetric, its diagonal equals the number of accumulated partitions and no entry exceeds
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoAssociation {
    counts: Array2<usize>,
    n_partitions: usize,
}

impl CoAssociation {
    /// Empty co-association counts of `n_samples` samples
    pub fn new(n_samples: usize) -> Self {
        CoAssociation {
            counts: Array2::zeros((n_samples, n_samples)),
            n_partitions: 0,
        }
    }

    /// Accumulates every partition of `partitions`
    pub fn from_partitions<'a, D: 'a + Data<Elem = usize>>(
        n_samples: usize,
        partitions: impl IntoIterator<Item = &'a ArrayBase<D, Ix1>>,
    ) -> Result<Self> {
        let mut coassociation = CoAssociation::new(n_samples);
        for partition in partitions {
            coassociation.accumulate(partition)?;
        }
        Ok(coassociation)
    }

    /// Adds one partition, given as the cluster index of every sample
    pub fn accumulate(&mut self, partition: &ArrayBase<impl Data<Elem = usize>, Ix1>) -> Result<()> {
        if partition.len() != self.n_samples() {
            return Err(Error::ShapeMismatch(self.n_samples(), partition.len()));
        }

        for (i, &a) in partition.iter().enumerate() {
            let mut row = self.counts.row_mut(i);
            for (count, &b) in row.iter_mut().zip(partition.iter()) {
                if a == b {
                    *count += 1;
                }
            }
        }
        self.n_partitions += 1;

        Ok(())
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn n_samples(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of accumulated partitions
    pub fn n_partitions(&self) -> usize {
        self.n_partitions
    }

    /// The counts as records, one row of `n_samples` features per sample
    pub fn to_records<F: Float>(&self) -> Array2<F> {
        self.counts.mapv(F::cast)
    }
}
