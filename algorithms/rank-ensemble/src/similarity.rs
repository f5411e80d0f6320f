//! Similarity graphs and PageRank
//!
//! Two projected views of the same records define a complete directed graph: the weight of the
//! edge from sample `i` of the second view to sample `j` of the first view is the magnitude of
//! their cosine similarity. PageRank over that graph assigns every sample a centrality score.
use consensus_rank::linalg::{dot, l2_norm};
use consensus_rank::{Error, Float, ParamGuard};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

use crate::error::{RankError, RankParamsError, Result};

/// Weights of the similarity graph between the rows of `y` (sources) and `x` (targets)
///
/// Returns a matrix with shape `(y.nrows(), x.nrows())` whose entry `(i, j)` is
/// `|y_i · x_j| / (|y_i| |x_j|)`. A zero norm on either side gives a weight of zero.
pub fn similarity_graph<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Result<Array2<F>> {
    if x.ncols() != y.ncols() {
        return Err(Error::ShapeMismatch(x.ncols(), y.ncols()).into());
    }

    let x_norms = x.rows().into_iter().map(|r| l2_norm(&r)).collect::<Vec<_>>();
    let mut weights = Array2::zeros((y.nrows(), x.nrows()));
    for (i, y_row) in y.rows().into_iter().enumerate() {
        let y_norm = l2_norm(&y_row);
        for (j, x_row) in x.rows().into_iter().enumerate() {
            let norm = y_norm * x_norms[j];
            if norm > F::zero() {
                weights[(i, j)] = (dot(&y_row, &x_row) / norm).abs();
            }
        }
    }

    Ok(weights)
}

/// PageRank hyperparameters
///
/// The ranking follows the classic power iteration. Every node starts with rank `1/n`, outgoing
/// weights are normalized per node, the rank of nodes without outgoing weight (dangling nodes)
/// is spread evenly over all nodes, and a share `1 - damping` teleports uniformly. The
/// iteration stops once the L1 change between two iterates drops to `tolerance`.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRankValidParams {
    pub(crate) damping: f64,
    pub(crate) tolerance: f64,
    pub(crate) max_iterations: usize,
}

/// Builder for [`PageRankValidParams`]
#[derive(Clone, Debug, PartialEq)]
pub struct PageRankParams(PageRankValidParams);

/// Marker for the PageRank builder
pub struct PageRank;

impl PageRank {
    /// Defaults are `damping = 1.0`, `tolerance = 1e-9` and `max_iterations = 10_000`
    pub fn params() -> PageRankParams {
        PageRankParams(PageRankValidParams {
            damping: 1.0,
            tolerance: 1e-9,
            max_iterations: 10_000,
        })
    }
}

impl PageRankParams {
    pub fn damping(mut self, damping: f64) -> Self {
        self.0.damping = damping;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }
}

impl ParamGuard for PageRankParams {
    type Checked = PageRankValidParams;
    type Error = RankParamsError;

    fn check_ref(&self) -> std::result::Result<&Self::Checked, Self::Error> {
        self.0.validate()?;
        Ok(&self.0)
    }

    fn check(self) -> std::result::Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl PageRankValidParams {
    pub(crate) fn validate(&self) -> std::result::Result<(), RankParamsError> {
        if !(0.0..=1.0).contains(&self.damping) {
            Err(RankParamsError::Damping(self.damping))
        } else if self.tolerance <= 0.0 {
            Err(RankParamsError::Tolerance)
        } else if self.max_iterations == 0 {
            Err(RankParamsError::MaxIterations)
        } else {
            Ok(())
        }
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Ranks the nodes of a weighted graph
    ///
    /// `weights` has one row per source node and one column per target node. Node ids are
    /// shared between sources and targets, so the graph has `max(nrows, ncols)` nodes and the
    /// returned vector has that length.
    pub fn rank<F: Float>(&self, weights: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        let n_nodes = weights.nrows().max(weights.ncols());
        if n_nodes == 0 {
            return Ok(Array1::zeros(0));
        }

        // row-stochastic transition matrix, dangling rows stay zero
        let mut transitions = Array2::zeros((n_nodes, n_nodes));
        let mut dangling = vec![true; n_nodes];
        for (i, row) in weights.rows().into_iter().enumerate() {
            let outbound = row.sum();
            if outbound > F::zero() {
                dangling[i] = false;
                transitions
                    .row_mut(i)
                    .slice_mut(ndarray::s![..row.len()])
                    .assign(&(&row / outbound));
            }
        }

        let n_dangling = dangling.iter().filter(|&&d| d).count();
        if n_dangling > 0 {
            warn!("{} of {} nodes have no outgoing weight", n_dangling, n_nodes);
        }

        let damping = F::cast(self.damping);
        let inverse = F::one() / F::cast(n_nodes);
        let teleport = (F::one() - damping) * inverse;
        let tolerance = F::cast(self.tolerance);

        let mut rank = Array1::from_elem(n_nodes, inverse);
        let mut delta = F::infinity();
        for iteration in 0..self.max_iterations {
            let leak = rank
                .iter()
                .zip(&dangling)
                .filter_map(|(&r, &d)| if d { Some(r) } else { None })
                .sum::<F>();

            let mut next = transitions.t().dot(&rank) * damping;
            next += teleport + damping * leak * inverse;

            delta = (&next - &rank).mapv(|d| d.abs()).sum();
            rank = next;
            if delta <= tolerance {
                debug!("PageRank converged after {} iterations", iteration + 1);
                return Ok(rank);
            }
        }

        Err(RankError::NotConverged {
            iterations: self.max_iterations,
            delta: delta.to_f64().unwrap_or(f64::NAN),
        })
    }

    /// Rank scores of the rows of `y` in the similarity graph between `y` and `x`
    ///
    /// The result has one score per row of `y`.
    pub fn similarity_rank<F: Float>(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        y: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Array1<F>> {
        let weights = similarity_graph(x, y)?;
        let mut rank = self.rank(&weights)?;
        rank.slice_collapse(ndarray::s![..y.nrows()]);
        Ok(rank)
    }
}
