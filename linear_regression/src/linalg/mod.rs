//! Dense kernels backing both training methods.

mod cholesky;
mod householder;

use ndarray::{Array2, ArrayView2, Axis, concatenate, s};
use regression_core::{RegressionErr, Result};

pub use cholesky::cholesky_solve;
pub use householder::{back_substitute, householder_qr};

/// A pivot below this fraction of its own column's magnitude is treated as zero.
pub(crate) const PIVOT_TOLERANCE: f64 = 1e-10;

/// Returns `x` with a leading column of ones when `intercept` is set.
pub fn augment(x: ArrayView2<f64>, intercept: bool) -> Array2<f64> {
    if !intercept {
        return x.to_owned();
    }

    let mut xa = Array2::ones((x.nrows(), x.ncols() + 1));
    xa.slice_mut(s![.., 1..]).assign(&x);
    xa
}

/// Stacks `top` over `bottom`.
pub fn vstack(top: ArrayView2<f64>, bottom: ArrayView2<f64>) -> Result<Array2<f64>> {
    concatenate(Axis(0), &[top, bottom]).map_err(|_| RegressionErr::SizeMismatch {
        what: "stacked columns",
        got: bottom.ncols(),
        expected: top.ncols(),
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn augment_prepends_ones() {
        let x = array![[2.0, 3.0], [4.0, 5.0]];
        assert_eq!(augment(x.view(), true), array![[1.0, 2.0, 3.0], [1.0, 4.0, 5.0]]);
        assert_eq!(augment(x.view(), false), x);
    }

    #[test]
    fn vstack_checks_columns() {
        let a = array![[1.0, 2.0]];
        let b = array![[3.0, 4.0], [5.0, 6.0]];
        assert_eq!(
            vstack(a.view(), b.view()).unwrap(),
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]
        );
        assert!(vstack(a.view(), array![[1.0]].view()).is_err());
    }
}
