//! Dense linear algebra primitives
//!
//! Matrices are plain row-major `Array2`s. The products walk the rows in a fixed order with a
//! sequential accumulator and never depend on the thread count.
use ndarray::{Array2, ArrayBase, Data, Ix1, Ix2, Zip};

use crate::error::{Error, Result};
use crate::Float;

/// Builds a matrix with `rows` rows of `cols` entries from row-major `data`
///
/// Fails with a shape error unless `data.len() == cols * rows`.
pub fn dense_matrix<F>(cols: usize, rows: usize, data: Vec<F>) -> Result<Array2<F>> {
    Ok(Array2::from_shape_vec((rows, cols), data)?)
}

/// Sum of the elementwise products of `x` and `y`
///
/// Panics if `x` and `y` differ in length.
pub fn dot<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    y: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    Zip::from(x)
        .and(y)
        .fold(F::zero(), |acc, &a, &b| acc + a * b)
}

/// Euclidean norm of `x`
pub fn l2_norm<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> F {
    dot(x, x).sqrt()
}

/// Multiplies `b` with the transpose of `a`
///
/// Both matrices must have the same number of columns. The result has one row per row of `b`
/// and one column per row of `a`; entry `(i, j)` is the dot product of row `i` of `b` with
/// row `j` of `a`. With `a` a projection matrix of shape `(n_out, n_in)` and `b` a record
/// matrix of shape `(n_samples, n_in)` this projects every record to `n_out` dimensions.
pub fn mul_t<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix2>,
    b: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Result<Array2<F>> {
    if a.ncols() != b.ncols() {
        return Err(Error::ShapeMismatch(a.ncols(), b.ncols()));
    }

    let mut data = Vec::with_capacity(a.nrows() * b.nrows());
    for row_b in b.rows() {
        for row_a in a.rows() {
            data.push(dot(&row_a, &row_b));
        }
    }

    dense_matrix(a.nrows(), b.nrows(), data)
}
