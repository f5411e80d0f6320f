use consensus_rank::Float;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::algorithm::nearest_sq_dists;

/// k-means++ seeding
///
/// The first seed is an observation drawn uniformly. Every further seed is drawn with a
/// probability proportional to its squared distance to the closest seed picked so far. Once all
/// these distances vanish, as with duplicated rows, the draw is uniform again.
///
/// `observations` must hold at least one row.
pub(crate) fn plus_plus<F: Float>(
    n_clusters: usize,
    observations: ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let n_samples = observations.nrows();
    let mut picked = Vec::with_capacity(n_clusters);
    picked.push(rng.gen_range(0..n_samples));

    let mut sq_dists = Array1::zeros(n_samples);
    while picked.len() < n_clusters {
        let seeds = observations.select(Axis(0), &picked);
        nearest_sq_dists(seeds.view(), observations, &mut sq_dists);

        let next = match WeightedIndex::new(sq_dists.iter()) {
            Ok(weights) => weights.sample(rng),
            Err(_) => rng.gen_range(0..n_samples),
        };
        picked.push(next);
    }

    observations.select(Axis(0), &picked)
}
