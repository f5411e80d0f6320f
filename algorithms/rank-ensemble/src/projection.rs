use consensus_rank::linalg::mul_t;
use consensus_rank::Float;
use ndarray::{Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::{
    rand_distr::{Distribution, Normal, StandardNormal},
    RandomExt,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::error::{RankError, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Seed used in place of zero, which is never handed to the generator
const FALLBACK_SEED: u64 = 1;

/// Recipe for a Gaussian random projection
///
/// Only the shape and the seed are stored; the matrix itself is regenerated on demand by
/// [`sample`](ProjectionSpec::sample), which is a pure function of the three.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectionSpec {
    rows: usize,
    cols: usize,
    seed: u64,
}

impl ProjectionSpec {
    /// Projection from `cols` input dimensions to `rows` output dimensions
    pub fn new(rows: usize, cols: usize, seed: u64) -> Self {
        let seed = if seed == 0 { FALLBACK_SEED } else { seed };
        ProjectionSpec { rows, cols, seed }
    }

    /// Output dimension
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Input dimension
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws the projection matrix with shape `(rows, cols)`
    ///
    /// Entries are independent draws from `N(0, 2 / cols)`.
    pub fn sample<F: Float>(&self) -> Result<Array2<F>>
    where
        StandardNormal: Distribution<F>,
    {
        if self.cols == 0 {
            return Err(RankError::EmptyProjection);
        }

        let std_dev = (F::cast(2.) / F::cast(self.cols)).sqrt();
        let gaussian = Normal::new(F::zero(), std_dev)?;
        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);

        Ok(Array::random_using(
            (self.rows, self.cols),
            gaussian,
            &mut rng,
        ))
    }

    /// Projects every record, returning a matrix with shape `(n_samples, rows)`
    pub fn project<F: Float>(&self, records: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array2<F>>
    where
        StandardNormal: Distribution<F>,
    {
        let projection = self.sample()?;
        Ok(mul_t(&projection, records)?)
    }
}
