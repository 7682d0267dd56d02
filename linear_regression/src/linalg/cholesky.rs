use ndarray::{Array2, ArrayView2};
use regression_core::{RegressionErr, Result};

use super::PIVOT_TOLERANCE;

/// Solves `a · βᵀ = rhsᵀ` for every row of `rhs` through a Cholesky factorization
/// `a = L Lᵀ`.
///
/// # Arguments
/// * `a` - A symmetric `n x n` matrix, only its lower triangle is read.
/// * `rhs` - A `k x n` matrix, one right hand side per row.
///
/// # Returns
/// The `k x n` solutions or `NotPositiveDefinite` if the factorization breaks down.
pub fn cholesky_solve(a: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();

    if a.ncols() != n {
        return Err(RegressionErr::SizeMismatch {
            what: "cholesky matrix columns",
            got: a.ncols(),
            expected: n,
        });
    }

    if rhs.ncols() != n {
        return Err(RegressionErr::SizeMismatch {
            what: "cholesky right hand side",
            got: rhs.ncols(),
            expected: n,
        });
    }

    let l = factorize(a)?;
    let mut out = rhs.to_owned();

    for mut row in out.rows_mut() {
        // L z = b
        for i in 0..n {
            let s: f64 = (0..i).map(|j| l[[i, j]] * row[j]).sum();
            row[i] = (row[i] - s) / l[[i, i]];
        }

        // Lᵀ β = z
        for i in (0..n).rev() {
            let s: f64 = (i + 1..n).map(|j| l[[j, i]] * row[j]).sum();
            row[i] = (row[i] - s) / l[[i, i]];
        }
    }

    Ok(out)
}

fn factorize(a: ArrayView2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let d = a[[j, j]] - (0..j).map(|k| l[[j, k]].powi(2)).sum::<f64>();

        // `d / a[[j, j]]` is the squared sine between column `j` and the span of
        // the previous ones, so the check doesn't depend on the column scales.
        if d <= PIVOT_TOLERANCE * a[[j, j]].max(0.0) {
            return Err(RegressionErr::NotPositiveDefinite { column: j });
        }

        let ljj = d.sqrt();
        l[[j, j]] = ljj;

        for i in j + 1..n {
            let s: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            l[[i, j]] = (a[[i, j]] - s) / ljj;
        }
    }

    Ok(l)
}
