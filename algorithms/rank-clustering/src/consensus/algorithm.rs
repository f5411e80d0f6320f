use consensus_rank::traits::{Fit, Predict};
use consensus_rank::{Float, ParamGuard};
use log::{debug, info};
use ndarray::{Array1, ArrayBase, Data, Ix2};
use rayon::prelude::*;

use crate::consensus::{
    CoAssociation, ConsensusError, ConsensusParams, ConsensusValidParams, OutlierReport,
};
use crate::k_means::{KMeans, KMeansError};

/// Consensus k-means
///
/// A single k-means run depends on its initial centroids. Consensus k-means runs k-means
/// `n_runs` times, the `i`-th run seeded with `i`, and counts for every pair of samples how
/// often the two ended up in the same cluster (the [co-association](CoAssociation) matrix). The
/// rows of that matrix are clustered once more with k-means, seeded with `final_seed`, which
/// gives the final, more stable assignment.
///
/// After the final assignment, every feature of the clustered records is checked for outliers
/// within its cluster, see [`OutlierReport`].
///
/// The runs are independent and execute as a parallel map, each producing its own membership
/// vector. The co-association counts are accumulated sequentially once all runs have finished.
///
/// ## Example
///
/// ```rust
/// use consensus_rank::prelude::*;
/// use rank_clustering::ConsensusKMeans;
/// use ndarray::array;
///
/// let records = array![[0., 0.], [0.2, 0.1], [0.1, 0.3], [9., 9.], [9.2, 9.1], [9.1, 8.9]];
/// let clustering = ConsensusKMeans::params(2)
///     .n_runs(10)
///     .fit(&records)
///     .unwrap();
///
/// let memberships = clustering.memberships();
/// assert_eq!(memberships[0], memberships[2]);
/// assert_ne!(memberships[0], memberships[3]);
/// assert_eq!(clustering.coassociation().n_partitions(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConsensusClustering<F: Float> {
    model: KMeans<F>,
    memberships: Array1<usize>,
    coassociation: CoAssociation,
    outliers: OutlierReport,
}

/// Marker for the consensus k-means builder
pub struct ConsensusKMeans;

impl ConsensusKMeans {
    pub fn params<F: Float>(n_clusters: usize) -> ConsensusParams<F> {
        ConsensusParams::new(n_clusters)
    }
}

impl<F: Float> ConsensusClustering<F> {
    /// The k-means model fitted on the co-association matrix
    pub fn model(&self) -> &KMeans<F> {
        &self.model
    }

    /// Final cluster index of every sample
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    pub fn coassociation(&self) -> &CoAssociation {
        &self.coassociation
    }

    pub fn outliers(&self) -> &OutlierReport {
        &self.outliers
    }

    pub fn n_clusters(&self) -> usize {
        self.outliers.counts().nrows()
    }
}

impl<F: Float> ConsensusValidParams<F> {
    /// Clusters `records` with a single k-means run seeded with `seed`
    pub fn partition<D: Data<Elem = F> + Sync>(
        &self,
        seed: u64,
        records: &ArrayBase<D, Ix2>,
    ) -> Result<Array1<usize>, KMeansError> {
        Ok(self.seeded_model(seed, records)?.predict(records))
    }

    fn seeded_model<D: Data<Elem = F> + Sync>(
        &self,
        seed: u64,
        records: &ArrayBase<D, Ix2>,
    ) -> Result<KMeans<F>, KMeansError> {
        let params = self.k_means(seed).check().map_err(KMeansError::from)?;
        Fit::<_, KMeansError>::fit(&params, records)
    }
}

impl<F: Float, D: Data<Elem = F> + Sync> Fit<ArrayBase<D, Ix2>, ConsensusError>
    for ConsensusValidParams<F>
{
    type Object = ConsensusClustering<F>;

    /// Given records with shape `(n_samples, n_features)`, runs the ensemble of k-means
    /// clusterings, clusters their co-association matrix and counts the outliers.
    fn fit(&self, records: &ArrayBase<D, Ix2>) -> Result<Self::Object, ConsensusError> {
        info!(
            "consensus k-means with {} clusters over {} runs on {} samples",
            self.n_clusters(),
            self.n_runs(),
            records.nrows()
        );

        let partitions = (1..=self.n_runs() as u64)
            .into_par_iter()
            .map(|seed| self.partition(seed, records))
            .collect::<Result<Vec<_>, _>>()?;

        let coassociation = CoAssociation::from_partitions(records.nrows(), &partitions)?;
        debug!(
            "accumulated {} partitions into the co-association matrix",
            coassociation.n_partitions()
        );

        let meta = coassociation.to_records::<F>();
        let model = self.seeded_model(self.final_seed(), &meta)?;
        let memberships = model.predict(&meta);

        let outliers = OutlierReport::new(records, &memberships, self.n_clusters(), self.sigma())?;
        info!("{} outliers at {} sigma", outliers.total(), self.sigma());

        Ok(ConsensusClustering {
            model,
            memberships,
            coassociation,
            outliers,
        })
    }
}
