//! Common metrics for clustering
//!
//! A clustering is compared against ground truth through two contingency tables, one counting
//! for every label how its samples spread over the clusters and one counting for every cluster
//! how its members spread over the labels. The Shannon entropy of each row tells how pure that
//! label (or cluster) is: zero for a perfect match, `ln(m)` for an even spread over `m` columns.
use std::fmt;

use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1};

use crate::dataset::{Float, LabelMap};
use crate::error::{Error, Result};

/// Co-occurrence counts of two discrete assignments over the same samples
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContingencyTable {
    counts: Array2<usize>,
}

impl ContingencyTable {
    /// Counts `(rows[i], cols[i])` pairs into a table with shape `(n_rows, n_cols)`
    pub fn new(
        rows: &ArrayBase<impl Data<Elem = usize>, Ix1>,
        cols: &ArrayBase<impl Data<Elem = usize>, Ix1>,
        n_rows: usize,
        n_cols: usize,
    ) -> Result<Self> {
        if rows.len() != cols.len() {
            return Err(Error::ShapeMismatch(rows.len(), cols.len()));
        }

        let mut counts = Array2::zeros((n_rows, n_cols));
        for (&r, &c) in rows.iter().zip(cols.iter()) {
            if r >= n_rows || c >= n_cols {
                return Err(Error::Parameters(format!(
                    "assignment ({}, {}) outside of a {}x{} table",
                    r, c, n_rows, n_cols
                )));
            }
            counts[(r, c)] += 1;
        }

        Ok(ContingencyTable { counts })
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    /// Table with rows and columns swapped
    pub fn transposed(&self) -> Self {
        ContingencyTable {
            counts: self.counts.t().to_owned(),
        }
    }

    pub fn row_sums(&self) -> Array1<usize> {
        self.counts.sum_axis(Axis(1))
    }

    /// Shannon entropy of every row's normalized distribution
    pub fn row_entropies<F: Float>(&self) -> Array1<F> {
        self.counts
            .rows()
            .into_iter()
            .map(|row| row_entropy(row))
            .collect()
    }
}

/// Shannon entropy `-Σ p ln p` of a row of counts, with `p = count / row total`
///
/// Zero counts do not contribute, an empty row has entropy zero.
pub fn row_entropy<F: Float>(row: ArrayView1<usize>) -> F {
    let total = row.sum();
    if total == 0 {
        return F::zero();
    }

    let total = F::cast(total);
    let sum = row
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = F::cast(count) / total;
            p * p.ln()
        })
        .sum::<F>();
    // a pure row sums to 0.0, negating it would print as -0.000000
    F::zero() - sum
}

/// Entropy of the uniform distribution over `n` outcomes
pub fn max_entropy<F: Float>(n: usize) -> F {
    if n == 0 {
        return F::zero();
    }
    F::cast(n).ln()
}

/// Entropy of a clustering in both contingency directions
#[derive(Clone, Debug, PartialEq)]
pub struct EntropyReport<F> {
    label_names: Vec<String>,
    table: ContingencyTable,
    label_entropy: Array1<F>,
    cluster_entropy: Array1<F>,
    max_entropy: F,
}

impl<F: Float> EntropyReport<F> {
    /// Evaluates `memberships` (cluster ids in `0..n_clusters`) against integer `targets`
    /// obtained from `labels`
    pub fn evaluate(
        labels: &LabelMap,
        targets: &ArrayBase<impl Data<Elem = usize>, Ix1>,
        memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
        n_clusters: usize,
    ) -> Result<Self> {
        let table = ContingencyTable::new(targets, memberships, labels.len(), n_clusters)?;
        let label_entropy = table.row_entropies();
        let cluster_entropy = table.transposed().row_entropies();

        Ok(EntropyReport {
            label_names: (0..labels.len())
                .map(|id| labels.name(id).unwrap_or_default().to_string())
                .collect(),
            table,
            label_entropy,
            cluster_entropy,
            max_entropy: max_entropy(n_clusters),
        })
    }

    /// Label to cluster counts, shape `(n_labels, n_clusters)`
    pub fn table(&self) -> &ContingencyTable {
        &self.table
    }

    /// Row entropies of the label to cluster table
    pub fn label_entropy(&self) -> &Array1<F> {
        &self.label_entropy
    }

    /// Row entropies of the cluster to label table
    pub fn cluster_entropy(&self) -> &Array1<F> {
        &self.cluster_entropy
    }

    /// Entropy of a uniform distribution over the clusters
    pub fn max_entropy(&self) -> F {
        self.max_entropy
    }
}

impl<F: Float> fmt::Display for EntropyReport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "max entropy {:.6} over {} clusters",
            self.max_entropy,
            self.table.counts().ncols()
        )?;
        for (i, (name, entropy)) in self.label_names.iter().zip(&self.label_entropy).enumerate() {
            writeln!(f, "label->cluster {} {:<16} {:.6}", i, name, entropy)?;
        }
        for (i, entropy) in self.cluster_entropy.iter().enumerate() {
            writeln!(f, "cluster->label {} {:.6}", i, entropy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn three_labels() -> LabelMap {
        LabelMap::from_labels(vec!["a", "b", "c"])
    }

    #[test]
    fn perfect_clustering_has_zero_entropy() {
        let targets = array![0, 0, 1, 1, 2, 2];
        // any bijection between labels and clusters
        let memberships = array![2, 2, 0, 0, 1, 1];
        let report =
            EntropyReport::<f64>::evaluate(&three_labels(), &targets, &memberships, 3).unwrap();

        assert_abs_diff_eq!(report.label_entropy(), &Array1::<f64>::zeros(3));
        assert_abs_diff_eq!(report.cluster_entropy(), &Array1::<f64>::zeros(3));
        assert_abs_diff_eq!(report.max_entropy(), 3f64.ln());
    }

    #[test]
    fn single_cluster_reaches_row_maximum() {
        let targets = array![0, 0, 1, 1, 2, 2];
        let memberships = array![0, 0, 0, 0, 0, 0];
        let report =
            EntropyReport::<f64>::evaluate(&three_labels(), &targets, &memberships, 2).unwrap();

        // the only used cluster mixes all three labels evenly
        assert_abs_diff_eq!(report.cluster_entropy()[0], max_entropy::<f64>(3), epsilon = 1e-12);
        assert_abs_diff_eq!(report.cluster_entropy()[1], 0.);
        // every label sits in a single cluster
        assert_abs_diff_eq!(report.label_entropy(), &Array1::<f64>::zeros(3));
    }

    #[test]
    fn row_sums_are_label_counts() {
        let targets = array![0, 1, 1, 2, 2, 2];
        let memberships = array![1, 0, 1, 0, 0, 1];
        let table = ContingencyTable::new(&targets, &memberships, 3, 2).unwrap();

        assert_eq!(table.counts(), &array![[0, 1], [1, 1], [2, 1]]);
        assert_eq!(table.row_sums(), array![1, 2, 3]);
        assert_eq!(table.transposed().row_sums(), array![3, 3]);
    }

    #[test]
    fn row_entropy_ignores_zeros() {
        let h: f64 = row_entropy(array![0usize, 5, 0, 5].view());
        assert_abs_diff_eq!(h, 2f64.ln(), epsilon = 1e-12);
        let h: f64 = row_entropy(array![0usize, 0].view());
        assert_abs_diff_eq!(h, 0.);
    }

    #[test]
    fn pure_rows_have_positive_zero_entropy() {
        let h: f64 = row_entropy(array![0usize, 7, 0].view());
        assert_eq!(h, 0.);
        assert!(h.is_sign_positive());

        let report =
            EntropyReport::<f64>::evaluate(&three_labels(), &array![0, 1, 2], &array![0, 1, 2], 3)
                .unwrap();
        assert!(report
            .label_entropy()
            .iter()
            .chain(report.cluster_entropy().iter())
            .all(|h| h.is_sign_positive()));
        assert!(!report.to_string().contains("-0.000000"));
    }

    #[test]
    fn out_of_range_assignment() {
        let res = ContingencyTable::new(&array![0, 3], &array![0, 0], 3, 1);
        assert!(matches!(res, Err(Error::Parameters(_))));
        let res = ContingencyTable::new(&array![0, 1], &array![0], 3, 1);
        assert!(matches!(res, Err(Error::ShapeMismatch(2, 1))));
    }

    #[test]
    fn report_display() {
        let report =
            EntropyReport::<f64>::evaluate(&three_labels(), &array![0, 1, 2], &array![0, 1, 2], 3)
                .unwrap();
        let text = report.to_string();
        assert!(text.starts_with("max entropy"));
        assert_eq!(text.lines().count(), 7);
    }
}
