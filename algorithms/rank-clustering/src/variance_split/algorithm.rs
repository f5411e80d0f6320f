use std::cmp::Ordering;

use consensus_rank::traits::Fit;
use consensus_rank::Float;
use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix2};

use crate::variance_split::{SplitError, VarianceSplitParams, VarianceSplitValidParams};

/// Population variance of `values`, zero when empty
pub fn population_variance<F: Float>(values: &[F]) -> F {
    if values.is_empty() {
        return F::zero();
    }

    let n = F::cast(values.len());
    let mean = values.iter().copied().sum::<F>() / n;
    values
        .iter()
        .map(|&x| (x - mean) * (x - mean))
        .sum::<F>()
        / n
}

/// Best split of ascending `sorted` values
///
/// Every index `i` in `1..len - 1` splits the values into `[..i]` and `[i..]`. Returns the
/// greatest variance reduction `var(all) - (var(left) + var(right))` and its index, the first one
/// on ties. Starts from `(0, 0)`, so a slice where no split reduces the variance, or one with
/// fewer than three values, returns index 0.
pub fn best_split<F: Float>(sorted: &[F]) -> (F, usize) {
    let variance = population_variance(sorted);

    let (mut max, mut index) = (F::zero(), 0);
    for i in 1..sorted.len().saturating_sub(1) {
        let (left, right) = sorted.split_at(i);
        let reduction = variance - (population_variance(left) + population_variance(right));
        if reduction > max {
            max = reduction;
            index = i;
        }
    }

    (max, index)
}

/// Contiguous run of the sorted values together with its best split
#[derive(Clone, Copy, Debug)]
struct Segment<F> {
    start: usize,
    end: usize,
    reduction: F,
    split: usize,
}

impl<F: Float> Segment<F> {
    fn new(sorted: &[F], start: usize, end: usize) -> Self {
        let (reduction, split) = best_split(&sorted[start..end]);
        Segment {
            start,
            end,
            reduction,
            split,
        }
    }

    fn is_splittable(&self) -> bool {
        self.split > 0
    }
}

/// Partition of the samples by one feature
///
/// Groups are numbered by increasing feature value.
#[derive(Clone, Debug, PartialEq)]
pub struct VariancePartition<F> {
    memberships: Array1<usize>,
    boundaries: Vec<F>,
    reductions: Vec<F>,
}

impl<F: Float> VariancePartition<F> {
    /// Group index of every sample
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    pub fn into_memberships(self) -> Array1<usize> {
        self.memberships
    }

    /// Number of non-empty groups
    pub fn n_groups(&self) -> usize {
        if self.memberships.is_empty() {
            0
        } else {
            self.boundaries.len() + 1
        }
    }

    /// Smallest value of every group but the first, ascending
    pub fn boundaries(&self) -> &[F] {
        &self.boundaries
    }

    /// Variance reduction of every split, in the order the splits were made
    pub fn reductions(&self) -> &[F] {
        &self.reductions
    }
}

/// Recursive variance split
///
/// Sorts the samples by one feature and cuts the sorted sequence where the sum of the population
/// variances of both sides drops the most below the variance of the whole. The cut is repeated
/// on the piece with the greatest achievable reduction, the later piece on ties, until there are
/// `n_groups` pieces or no piece can be reduced any further.
///
/// ## Example
///
/// ```rust
/// use consensus_rank::prelude::*;
/// use rank_clustering::VarianceSplit;
/// use ndarray::array;
///
/// let records = array![[9.], [1.], [5.], [1.], [9.], [5.], [1.], [5.], [9.]];
/// let partition = VarianceSplit::params().fit(&records).unwrap();
///
/// assert_eq!(partition.n_groups(), 3);
/// assert_eq!(partition.memberships(), &array![2, 0, 1, 0, 2, 1, 0, 1, 2]);
/// ```
pub struct VarianceSplit;

impl VarianceSplit {
    pub fn params() -> VarianceSplitParams {
        VarianceSplitParams::new()
    }
}

impl<F: Float, D: Data<Elem = F>> Fit<ArrayBase<D, Ix2>, SplitError> for VarianceSplitValidParams {
    type Object = VariancePartition<F>;

    fn fit(&self, records: &ArrayBase<D, Ix2>) -> Result<Self::Object, SplitError> {
        if self.feature() >= records.ncols() {
            return Err(SplitError::FeatureIndex {
                feature: self.feature(),
                n_features: records.ncols(),
            });
        }

        let column = records.column(self.feature());
        if column.iter().any(|x| x.is_nan()) {
            return Err(SplitError::NaN(self.feature()));
        }

        // stable argsort, equal values keep the sample order
        let mut order = (0..column.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            column[a]
                .partial_cmp(&column[b])
                .unwrap_or(Ordering::Equal)
        });
        let sorted = order.iter().map(|&i| column[i]).collect::<Vec<_>>();

        let mut segments = vec![Segment::new(&sorted, 0, sorted.len())];
        let mut reductions = Vec::new();
        while segments.len() < self.n_groups() {
            let mut best: Option<usize> = None;
            for (i, segment) in segments.iter().enumerate() {
                if !segment.is_splittable() {
                    continue;
                }
                match best {
                    Some(b) if segment.reduction < segments[b].reduction => {}
                    _ => best = Some(i),
                }
            }

            let i = match best {
                Some(i) => i,
                None => {
                    debug!(
                        "feature {} cannot be split beyond {} groups",
                        self.feature(),
                        segments.len()
                    );
                    break;
                }
            };

            let segment = segments[i];
            let mid = segment.start + segment.split;
            reductions.push(segment.reduction);
            segments[i] = Segment::new(&sorted, segment.start, mid);
            segments.insert(i + 1, Segment::new(&sorted, mid, segment.end));
        }

        let mut memberships = Array1::zeros(sorted.len());
        for (group, segment) in segments.iter().enumerate() {
            for &sample in &order[segment.start..segment.end] {
                memberships[sample] = group;
            }
        }
        let boundaries = segments
            .iter()
            .skip(1)
            .map(|segment| sorted[segment.start])
            .collect();

        Ok(VariancePartition {
            memberships,
            boundaries,
            reductions,
        })
    }
}
