use ndarray::{Array1, Array2, ArrayView2, s};
use regression_core::{RegressionErr, Result};

use super::PIVOT_TOLERANCE;

/// Reduces `a` to upper triangular form in place with Householder reflections,
/// applying the same reflections to `b` so it ends up holding `Qᵀb`.
///
/// Both matrices must have the same number of rows.
pub fn householder_qr(a: &mut Array2<f64>, b: &mut Array2<f64>) -> Result<()> {
    let (m, n) = a.dim();

    if b.nrows() != m {
        return Err(RegressionErr::SizeMismatch {
            what: "householder right hand side rows",
            got: b.nrows(),
            expected: m,
        });
    }

    for j in 0..n.min(m) {
        let col = a.slice(s![j.., j]);
        let norm = col.dot(&col).sqrt();

        if norm == 0.0 {
            continue;
        }

        let alpha = if a[[j, j]] > 0.0 { -norm } else { norm };
        let mut v: Array1<f64> = col.to_owned();
        v[0] -= alpha;

        let vv = v.dot(&v);
        if vv == 0.0 {
            continue;
        }

        for mut c in a.slice_mut(s![j.., j + 1..]).columns_mut() {
            let f = 2.0 * v.dot(&c) / vv;
            c.scaled_add(-f, &v);
        }

        for mut c in b.slice_mut(s![j.., ..]).columns_mut() {
            let f = 2.0 * v.dot(&c) / vv;
            c.scaled_add(-f, &v);
        }

        a[[j, j]] = alpha;
        a.slice_mut(s![j + 1.., j]).fill(0.0);
    }

    Ok(())
}

/// Solves `r · βᵀ = rhsᵀ` for every row of `rhs`, `r` being upper triangular.
///
/// # Returns
/// The `k x n` solutions or `SingularMatrix` on a (numerically) zero pivot.
pub fn back_substitute(r: ArrayView2<f64>, rhs: ArrayView2<f64>) -> Result<Array2<f64>> {
    let n = r.nrows();

    if r.ncols() != n || rhs.ncols() != n {
        return Err(RegressionErr::SizeMismatch {
            what: "triangular system",
            got: rhs.ncols(),
            expected: n,
        });
    }

    // The norm of a column of `r` is the norm of the matching column of `X`.
    for (column, col) in r.columns().into_iter().enumerate() {
        let norm = col.slice(s![..=column]).dot(&col.slice(s![..=column])).sqrt();

        if r[[column, column]].abs() <= PIVOT_TOLERANCE * norm {
            return Err(RegressionErr::SingularMatrix { column });
        }
    }

    let mut out = rhs.to_owned();

    for mut row in out.rows_mut() {
        for i in (0..n).rev() {
            let s: f64 = (i + 1..n).map(|j| r[[i, j]] * row[j]).sum();
            row[i] = (row[i] - s) / r[[i, i]];
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn qr_preserves_column_norms_and_triangulates() {
        let mut a = array![[3.0, 1.0], [4.0, 2.0], [0.0, 2.0]];
        let mut b = array![[1.0], [2.0], [3.0]];

        householder_qr(&mut a, &mut b).unwrap();

        assert!((a[[0, 0]].abs() - 5.0).abs() < 1e-12);
        assert_eq!(a[[1, 0]], 0.0);
        assert_eq!(a[[2, 0]], 0.0);
        assert!(a[[2, 1]].abs() < 1e-12);

        // Orthogonal transforms keep the norm of b.
        let norm: f64 = b.iter().map(|v| v * v).sum();
        assert!((norm - 14.0).abs() < 1e-12);
    }

    #[test]
    fn qr_then_back_substitution_solves_least_squares() {
        // y = 2 + 3x, exactly.
        let mut a = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let mut b = array![[2.0], [5.0], [8.0], [11.0]];

        householder_qr(&mut a, &mut b).unwrap();

        let r = a.slice(s![..2, ..]);
        let qty = b.slice(s![..2, ..]).t().to_owned();
        let beta = back_substitute(r, qty.view()).unwrap();

        assert!((beta[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((beta[[0, 1]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_pivot_is_singular() {
        let r = array![[1.0, 2.0], [0.0, 0.0]];
        let rhs = array![[1.0, 1.0]];

        assert!(matches!(
            back_substitute(r.view(), rhs.view()),
            Err(RegressionErr::SingularMatrix { column: 1 })
        ));
    }

    #[test]
    fn pivots_are_judged_per_column() {
        // The second column is 1e10 times larger but not parallel to the first.
        let r = array![[1.0, 3e10], [0.0, 4e10]];
        let rhs = array![[1.0 + 3e10, 4e10]];

        let beta = back_substitute(r.view(), rhs.view()).unwrap();
        assert!((beta[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((beta[[0, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let mut a = Array2::<f64>::zeros((3, 2));
        let mut b = Array2::<f64>::zeros((2, 1));
        assert!(householder_qr(&mut a, &mut b).is_err());
    }
}
