use consensus_rank::traits::{Fit, Predict};
use consensus_rank::Float;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix2, Zip};
use ndarray_stats::DeviationExt;
use rand::{Rng, SeedableRng};
use rand_isaac::Isaac64Rng;

use super::seeding;
use crate::k_means::{KMeansError, KMeansParams, KMeansValidParams};

/// Squared euclidean k-means
///
/// Runs Lloyd iterations from k-means++ seeds, with the m_k-means update: the previous centroid
/// counts as one more member of its cluster, so a cluster that loses all observations keeps its
/// place instead of becoming empty.
///
/// A run has converged once the summed squared shift of all centroids drops below the tolerance.
/// Runs hitting the iteration cap are discarded, and the fit fails with
/// [`KMeansError::NotConverged`] when no run is left. Among converged runs the one of lowest
/// inertia is kept.
///
/// ## Example
///
/// ```rust
/// use consensus_rank::prelude::*;
/// use rank_clustering::KMeans;
/// use ndarray::array;
/// use rand::SeedableRng;
/// use rand_isaac::Isaac64Rng;
///
/// let observations = array![[0., 0.], [0.1, 0.], [10., 10.], [10., 10.1]];
/// let model = KMeans::params_with_rng(2, Isaac64Rng::seed_from_u64(1))
///     .fit(&observations)
///     .unwrap();
///
/// let memberships = model.predict(&observations);
/// assert_eq!(memberships[0], memberships[1]);
/// assert_eq!(memberships[2], memberships[3]);
/// assert_ne!(memberships[0], memberships[2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    cluster_sizes: Array1<usize>,
    inertia: F,
    n_iterations: u64,
}

impl<F: Float> KMeans<F> {
    /// Settings for `n_clusters` clusters, seeded with 1
    pub fn params(n_clusters: usize) -> KMeansParams<F, Isaac64Rng> {
        KMeansParams::new(n_clusters, Isaac64Rng::seed_from_u64(1))
    }

    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(n_clusters, rng)
    }

    /// Centroids with shape `(n_clusters, n_features)`
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Training observations assigned to every cluster
    pub fn cluster_sizes(&self) -> &Array1<usize> {
        &self.cluster_sizes
    }

    /// Mean squared distance of the training observations to their centroid
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Iterations the kept run needed to converge
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }
}

/// Outcome of one converged run
struct Descent<F> {
    centroids: Array2<F>,
    sq_dist_sum: F,
    n_iterations: u64,
}

impl<F: Float, R: Rng + Clone> KMeansValidParams<F, R> {
    /// Lloyd iterations from `centroids` until convergence or the iteration cap
    fn descend(&self, mut centroids: Array2<F>, observations: ArrayView2<F>) -> Option<Descent<F>> {
        let n_samples = observations.nrows();
        let mut memberships = Array1::zeros(n_samples);
        let mut sq_dists = Array1::zeros(n_samples);

        for n_iterations in 1..=self.max_n_iterations() {
            assign(
                centroids.view(),
                observations,
                &mut memberships,
                &mut sq_dists,
            );
            let moved = mean_update(&centroids, observations, &memberships);
            let shift = sq_shift(&centroids, &moved);
            centroids = moved;

            if shift < self.tolerance() {
                return Some(Descent {
                    centroids,
                    sq_dist_sum: sq_dists.sum(),
                    n_iterations,
                });
            }
        }

        None
    }
}

impl<F: Float, R: Rng + Clone, D: Data<Elem = F> + Sync> Fit<ArrayBase<D, Ix2>, KMeansError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    fn fit(&self, observations: &ArrayBase<D, Ix2>) -> Result<Self::Object, KMeansError> {
        let n_samples = observations.nrows();
        if n_samples < self.n_clusters() {
            return Err(KMeansError::TooManyClusters {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }

        let observations = observations.view();
        let mut rng = self.rng().clone();
        let mut best: Option<Descent<F>> = None;

        for run in 0..self.n_runs() {
            let seeds = seeding::plus_plus(self.n_clusters(), observations, &mut rng);
            let descent = match self.descend(seeds, observations) {
                Some(descent) => descent,
                None => {
                    debug!("k-means run {} hit the iteration cap", run);
                    continue;
                }
            };
            debug!(
                "k-means run {} converged after {} iterations with {} squared distance",
                run, descent.n_iterations, descent.sq_dist_sum
            );

            let lowest = best.as_ref().map_or(F::infinity(), |b| b.sq_dist_sum);
            if descent.sq_dist_sum < lowest {
                best = Some(descent);
            }
        }

        let best = best.ok_or(KMeansError::NotConverged)?;

        let mut memberships = Array1::zeros(n_samples);
        let mut sq_dists = Array1::zeros(n_samples);
        assign(
            best.centroids.view(),
            observations,
            &mut memberships,
            &mut sq_dists,
        );
        let mut cluster_sizes = Array1::zeros(self.n_clusters());
        for &cluster in &memberships {
            cluster_sizes[cluster] += 1;
        }

        let n_empty = cluster_sizes.iter().filter(|&&size| size == 0).count();
        if n_empty > 0 {
            warn!("{} of {} clusters are empty", n_empty, self.n_clusters());
        }

        Ok(KMeans {
            centroids: best.centroids,
            cluster_sizes,
            inertia: best.sq_dist_sum / F::cast(n_samples),
            n_iterations: best.n_iterations,
        })
    }
}

impl<F: Float, D: Data<Elem = F> + Sync> Predict<&ArrayBase<D, Ix2>, Array1<usize>> for KMeans<F> {
    /// Index of the closest centroid of every row
    fn predict(&self, observations: &ArrayBase<D, Ix2>) -> Array1<usize> {
        let mut memberships = Array1::zeros(observations.nrows());
        let mut sq_dists = Array1::zeros(observations.nrows());
        assign(
            self.centroids.view(),
            observations.view(),
            &mut memberships,
            &mut sq_dists,
        );
        memberships
    }
}

fn sq_dist<F: Float>(a: ArrayView1<F>, b: ArrayView1<F>) -> F {
    // only fails on rows without features
    a.sq_l2_dist(&b).unwrap_or_else(|_| F::zero())
}

/// Closest centroid of `observation` and its squared distance, ties go to the lowest index
fn nearest<F: Float>(centroids: ArrayView2<F>, observation: ArrayView1<F>) -> (usize, F) {
    centroids
        .rows()
        .into_iter()
        .enumerate()
        .fold((0, F::infinity()), |(closest, lowest), (index, centroid)| {
            let dist = sq_dist(centroid, observation);
            if dist < lowest {
                (index, dist)
            } else {
                (closest, lowest)
            }
        })
}

/// Stores the closest centroid of every observation and the squared distance to it
fn assign<F: Float>(
    centroids: ArrayView2<F>,
    observations: ArrayView2<F>,
    memberships: &mut Array1<usize>,
    sq_dists: &mut Array1<F>,
) {
    Zip::from(observations.rows())
        .and(memberships)
        .and(sq_dists)
        .par_for_each(|observation, membership, sq_dist| {
            let (closest, dist) = nearest(centroids, observation);
            *membership = closest;
            *sq_dist = dist;
        });
}

/// Squared distance of every observation to its closest centroid
pub(super) fn nearest_sq_dists<F: Float>(
    centroids: ArrayView2<F>,
    observations: ArrayView2<F>,
    sq_dists: &mut Array1<F>,
) {
    Zip::from(observations.rows())
        .and(sq_dists)
        .par_for_each(|observation, sq_dist| *sq_dist = nearest(centroids, observation).1);
}

/// m_k-means update step, the old centroid counts as one member of its cluster
fn mean_update<F: Float>(
    centroids: &Array2<F>,
    observations: ArrayView2<F>,
    memberships: &Array1<usize>,
) -> Array2<F> {
    let mut sums = Array2::zeros(centroids.dim());
    let mut sizes = vec![1usize; centroids.nrows()];
    for (observation, &cluster) in observations.rows().into_iter().zip(memberships) {
        let mut sum = sums.row_mut(cluster);
        sum += &observation;
        sizes[cluster] += 1;
    }
    sums += centroids;

    for (mut sum, &size) in sums.rows_mut().into_iter().zip(&sizes) {
        sum /= F::cast(size);
    }
    sums
}

fn sq_shift<F: Float>(before: &Array2<F>, after: &Array2<F>) -> F {
    Zip::from(before)
        .and(after)
        .fold(F::zero(), |acc, &a, &b| acc + (a - b) * (a - b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k_means::KMeansParamsError;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, concatenate, Array, Axis};
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<KMeans<f64>>();
    }

    #[test]
    fn nearest_squared_distances() {
        let centroids = array![[0.0, 1.0], [40.0, 10.0]];
        let observations = array![[3.0, 4.0], [1.0, 3.0], [25.0, 15.0]];
        let mut sq_dists = Array1::zeros(3);
        nearest_sq_dists(centroids.view(), observations.view(), &mut sq_dists);
        assert_abs_diff_eq!(sq_dists, array![18.0, 5.0, 250.0]);
    }

    #[test]
    fn assignment_matches_brute_force() {
        let centroids = array![[0., 0.], [1., 2.], [20., 0.], [0., 20.]];
        let observations = array![[1., 0.6], [20., 2.], [20., 0.], [7., 20.]];
        let mut memberships = Array1::zeros(4);
        let mut sq_dists = Array1::zeros(4);
        assign(
            centroids.view(),
            observations.view(),
            &mut memberships,
            &mut sq_dists,
        );
        assert_eq!(memberships, array![0, 2, 2, 3]);
        assert_abs_diff_eq!(sq_dists, array![1.36, 4., 0., 49.], epsilon = 1e-12);
    }

    #[test]
    fn every_centroid_is_closest_to_itself() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let centroids: Array2<f64> =
            Array::random_using((20, 5), Uniform::new(-100., 100.), &mut rng);
        let model = KMeans {
            centroids: centroids.clone(),
            cluster_sizes: Array1::zeros(20),
            inertia: 0.,
            n_iterations: 0,
        };
        assert_eq!(model.predict(&centroids), (0..20).collect::<Array1<_>>());
    }

    #[test]
    fn ties_go_to_the_first_centroid() {
        let centroids = array![[1., 0.], [-1., 0.]];
        let (index, dist) = nearest(centroids.view(), array![0., 5.].view());
        assert_eq!(index, 0);
        assert_abs_diff_eq!(dist, 26.);
    }

    #[test]
    fn update_counts_the_old_centroid() {
        let mut rng = Isaac64Rng::seed_from_u64(3);
        let first: Array2<f64> = Array::random_using((100, 4), Uniform::new(-100., 100.), &mut rng);
        let second: Array2<f64> =
            Array::random_using((100, 4), Uniform::new(-100., 100.), &mut rng);
        let observations = concatenate(Axis(0), &[first.view(), second.view()]).unwrap();
        let memberships = (0..200).map(|i| i / 100).collect::<Array1<usize>>();

        let centroids = mean_update(&Array2::zeros((2, 4)), observations.view(), &memberships);
        assert_abs_diff_eq!(
            centroids.row(0),
            first.sum_axis(Axis(0)) / 101.,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            centroids.row(1),
            second.sum_axis(Axis(0)) / 101.,
            epsilon = 1e-9
        );
    }

    #[test]
    fn abandoned_centroid_stays() {
        let observations = array![[1.0, 2.0]];
        let memberships = array![0usize];
        let centroids = mean_update(&Array2::ones((2, 2)), observations.view(), &memberships);
        assert_abs_diff_eq!(centroids, array![[1.0, 1.5], [1.0, 1.0]]);
    }

    #[test]
    fn separates_two_groups() {
        let observations = array![[0., 0.], [0.5, 0.], [0., 0.5], [9., 9.], [9.5, 9.], [9., 9.5]];
        let model = KMeans::params(2).fit(&observations).unwrap();
        let memberships = model.predict(&observations);

        assert_eq!(memberships[0], memberships[1]);
        assert_eq!(memberships[0], memberships[2]);
        assert_eq!(memberships[3], memberships[4]);
        assert_eq!(memberships[3], memberships[5]);
        assert_ne!(memberships[0], memberships[3]);
        assert_eq!(model.cluster_sizes().sum(), 6);
        assert!(model.n_iterations() >= 1);
    }

    #[test]
    fn more_runs_never_raise_inertia() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let observations: Array2<f64> =
            Array::random_using((100, 2), Uniform::new(0., 1.), &mut rng);

        let single = KMeans::params_with_rng(5, rng.clone())
            .fit(&observations)
            .unwrap();
        let many = KMeans::params_with_rng(5, rng)
            .n_runs(10)
            .fit(&observations)
            .unwrap();
        assert!(many.inertia() <= single.inertia() + 1e-12);
    }

    #[test]
    fn same_seed_same_model() {
        let mut rng = Isaac64Rng::seed_from_u64(7);
        let observations: Array2<f64> =
            Array::random_using((60, 3), Uniform::new(-1., 1.), &mut rng);

        let fit = |seed| {
            KMeans::params_with_rng(4, Isaac64Rng::seed_from_u64(seed))
                .fit(&observations)
                .unwrap()
        };
        assert_eq!(fit(1), fit(1));
    }

    #[test]
    fn iteration_cap_without_convergence() {
        let mut rng = Isaac64Rng::seed_from_u64(5);
        let observations: Array2<f64> =
            Array::random_using((50, 2), Uniform::new(0., 1.), &mut rng);
        let res = KMeans::params(4)
            .max_n_iterations(1)
            .tolerance(1e-300)
            .fit(&observations);
        assert!(matches!(res, Err(KMeansError::NotConverged)));
    }

    #[test]
    fn too_many_clusters() {
        let observations = array![[0., 0.], [1., 1.]];
        let res = KMeans::params(3).fit(&observations);
        assert!(matches!(
            res,
            Err(KMeansError::TooManyClusters {
                n_clusters: 3,
                n_samples: 2
            })
        ));
    }

    #[test]
    fn invalid_params_are_reported_by_fit() {
        let observations = array![[0., 0.], [1., 1.]];
        let res = KMeans::params(0).fit(&observations);
        assert!(matches!(
            res,
            Err(KMeansError::InvalidParams(KMeansParamsError::NClusters))
        ));
    }

    #[test]
    fn one_cluster_is_the_mean() {
        let observations = array![[0., 0.], [2., 0.], [0., 2.], [2., 2.]];
        let model = KMeans::params(1).fit(&observations).unwrap();
        assert_abs_diff_eq!(model.centroids().row(0), array![1., 1.], epsilon = 1e-2);
        assert_eq!(model.predict(&observations), Array1::<usize>::zeros(4));
    }

    #[test]
    fn duplicated_observations() {
        // fewer distinct rows than clusters
        let observations = array![[1., 1.], [1., 1.], [1., 1.], [5., 5.]];
        let model = KMeans::params(3).fit(&observations).unwrap();
        let memberships = model.predict(&observations);
        assert_eq!(memberships[0], memberships[1]);
        assert_eq!(memberships[1], memberships[2]);
        assert_ne!(memberships[0], memberships[3]);
        assert_eq!(model.cluster_sizes().sum(), 4);
    }
}
