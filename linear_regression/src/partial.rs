use log::trace;
use ndarray::{Array2, ArrayView2, linalg::general_mat_mul, s};
use regression_core::{Dataset, InputId, PartialResultId, RegressionErr, Result};

use crate::{
    Model,
    linalg::{augment, back_substitute, cholesky_solve, householder_qr, vstack},
};

/// The computation method used to train a linear regression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Normal equations, solved with a Cholesky factorization.
    #[default]
    NormEq,
    /// QR decomposition through Householder reflections.
    Qr,
}

impl Method {
    /// A short human readable name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Method::NormEq => "normal equations",
            Method::Qr => "qr",
        }
    }
}

/// The sufficient statistics of the observations seen so far.
///
/// For normal equations these are `XᵀX` and `YᵀX`, for QR the triangular factor
/// `R` and `(QᵀY)ᵀ`; `X` carrying a leading column of ones when the intercept is
/// on. Both matrices have as many columns as there are betas to solve for.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialModel {
    method: Method,
    intercept: bool,
    features: usize,
    rows: usize,
    lhs: Array2<f64>,
    rhs: Array2<f64>,
}

impl PartialModel {
    /// Creates a new `PartialModel` that hasn't seen any observation.
    ///
    /// # Arguments
    /// * `method` - The computation method.
    /// * `features` - The number of features per observation.
    /// * `responses` - The number of dependent variables per observation.
    /// * `intercept` - Whether to fit an intercept term.
    pub fn empty(method: Method, features: usize, responses: usize, intercept: bool) -> Self {
        let betas = features + usize::from(intercept);

        Self {
            method,
            intercept,
            features,
            rows: 0,
            lhs: Array2::zeros((betas, betas)),
            rhs: Array2::zeros((responses, betas)),
        }
    }

    /// Rebuilds a `PartialModel` from its raw statistics, as received from another node.
    ///
    /// # Arguments
    /// * `method` - The computation method that produced the statistics.
    /// * `intercept` - Whether the statistics include the intercept column.
    /// * `rows` - The number of observations accumulated.
    /// * `lhs` - `XᵀX` or `R`, `b x b`.
    /// * `rhs` - `YᵀX` or `(QᵀY)ᵀ`, `k x b`.
    pub fn from_parts(
        method: Method,
        intercept: bool,
        rows: usize,
        lhs: Array2<f64>,
        rhs: Array2<f64>,
    ) -> Result<Self> {
        let betas = lhs.nrows();

        if betas <= usize::from(intercept) {
            return Err(RegressionErr::EmptyInput { what: "features" });
        }

        if lhs.ncols() != betas {
            return Err(RegressionErr::SizeMismatch {
                what: "partial model lhs columns",
                got: lhs.ncols(),
                expected: betas,
            });
        }

        if rhs.ncols() != betas {
            return Err(RegressionErr::SizeMismatch {
                what: "partial model rhs columns",
                got: rhs.ncols(),
                expected: betas,
            });
        }

        if rhs.nrows() == 0 {
            return Err(RegressionErr::EmptyInput {
                what: "dependent variables",
            });
        }

        Ok(Self {
            method,
            intercept,
            features: betas - usize::from(intercept),
            rows,
            lhs,
            rhs,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn intercept(&self) -> bool {
        self.intercept
    }

    pub fn features(&self) -> usize {
        self.features
    }

    pub fn responses(&self) -> usize {
        self.rhs.nrows()
    }

    /// The number of observations accumulated so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of betas per response solved for, intercept included if fitted.
    pub fn betas(&self) -> usize {
        self.lhs.nrows()
    }

    /// The left hand side statistic, `XᵀX` or `R`.
    pub fn lhs(&self) -> ArrayView2<'_, f64> {
        self.lhs.view()
    }

    /// The right hand side statistic, `YᵀX` or `(QᵀY)ᵀ`.
    pub fn rhs(&self) -> ArrayView2<'_, f64> {
        self.rhs.view()
    }

    /// Adds a block of observations.
    pub fn accumulate(&mut self, block: &Dataset) -> Result<()> {
        self.check_block(block)?;

        let xa = augment(block.input(InputId::DATA)?, self.intercept);
        let y = block.input(InputId::DEPENDENT_VARIABLES)?;

        match self.method {
            Method::NormEq => {
                general_mat_mul(1.0, &xa.t(), &xa, 1.0, &mut self.lhs);
                general_mat_mul(1.0, &y.t(), &xa, 1.0, &mut self.rhs);
            }
            Method::Qr => {
                let mut a = vstack(self.lhs.view(), xa.view())?;
                let mut b = vstack(self.rhs.t(), y)?;
                self.reduce(&mut a, &mut b)?;
            }
        }

        self.rows += block.rows();
        trace!(method = self.method.name(), rows = self.rows; "accumulated block");
        Ok(())
    }

    /// Merges the statistics of `other` into this partial model.
    pub fn merge(&mut self, other: &PartialModel) -> Result<()> {
        if self.method != other.method {
            return Err(RegressionErr::MethodMismatch {
                got: other.method.name(),
                expected: self.method.name(),
            });
        }

        if self.intercept != other.intercept {
            return Err(RegressionErr::InterceptMismatch);
        }

        if self.features != other.features {
            return Err(RegressionErr::SizeMismatch {
                what: "partial model features",
                got: other.features,
                expected: self.features,
            });
        }

        if self.responses() != other.responses() {
            return Err(RegressionErr::SizeMismatch {
                what: "partial model responses",
                got: other.responses(),
                expected: self.responses(),
            });
        }

        match self.method {
            Method::NormEq => {
                self.lhs += &other.lhs;
                self.rhs += &other.rhs;
            }
            Method::Qr => {
                let mut a = vstack(self.lhs.view(), other.lhs.view())?;
                let mut b = vstack(self.rhs.t(), other.rhs.t())?;
                self.reduce(&mut a, &mut b)?;
            }
        }

        self.rows += other.rows;
        Ok(())
    }

    /// Solves for the betas using the statistics accumulated so far.
    pub fn finalize(&self) -> Result<Model> {
        if self.rows == 0 {
            return Err(RegressionErr::EmptyInput {
                what: "partial model",
            });
        }

        let solved = match self.method {
            Method::NormEq => cholesky_solve(self.lhs.view(), self.rhs.view())?,
            Method::Qr => back_substitute(self.lhs.view(), self.rhs.view())?,
        };

        let mut betas = Array2::zeros((self.responses(), self.features + 1));
        let offset = usize::from(!self.intercept);
        betas.slice_mut(s![.., offset..]).assign(&solved);

        Ok(Model::new(betas, self.intercept))
    }

    /// Triangulates the stacked statistics and keeps the top `b` rows.
    fn reduce(&mut self, a: &mut Array2<f64>, b: &mut Array2<f64>) -> Result<()> {
        householder_qr(a, b)?;

        let betas = self.betas();
        self.lhs.assign(&a.slice(s![..betas, ..]));
        self.rhs.assign(&b.slice(s![..betas, ..]).t());
        Ok(())
    }

    fn check_block(&self, block: &Dataset) -> Result<()> {
        if block.features() != self.features {
            return Err(RegressionErr::SizeMismatch {
                what: "block features",
                got: block.features(),
                expected: self.features,
            });
        }

        if block.responses() != self.responses() {
            return Err(RegressionErr::SizeMismatch {
                what: "block dependent variables",
                got: block.responses(),
                expected: self.responses(),
            });
        }

        Ok(())
    }
}

/// The partial result of linear regression training, one slot per `PartialResultId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResult {
    slots: [Option<PartialModel>; PartialResultId::COUNT],
}

impl PartialResult {
    /// Creates a new `PartialResult` with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the partial model stored under `id`.
    pub fn get(&self, id: PartialResultId) -> Result<&PartialModel> {
        self.slots[id.index()?]
            .as_ref()
            .ok_or(RegressionErr::MissingSlot {
                kind: "partial result",
                value: id.value(),
            })
    }

    /// Returns the partial model stored under `id` mutably, if any.
    pub fn get_mut(&mut self, id: PartialResultId) -> Result<Option<&mut PartialModel>> {
        Ok(self.slots[id.index()?].as_mut())
    }

    /// Stores `model` under `id`, returning the partial model it replaced.
    pub fn set(&mut self, id: PartialResultId, model: PartialModel) -> Result<Option<PartialModel>> {
        Ok(self.slots[id.index()?].replace(model))
    }

    /// Removes and returns the partial model stored under `id`.
    pub fn take(&mut self, id: PartialResultId) -> Result<Option<PartialModel>> {
        Ok(self.slots[id.index()?].take())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn block(x: Array2<f64>, y: Array2<f64>) -> Dataset {
        Dataset::new(x, y).unwrap()
    }

    #[test]
    fn norm_eq_accumulates_cross_products() {
        let mut pm = PartialModel::empty(Method::NormEq, 1, 1, true);
        pm.accumulate(&block(array![[1.0], [2.0]], array![[3.0], [5.0]]))
            .unwrap();

        assert_eq!(pm.rows(), 2);
        assert_eq!(pm.lhs(), array![[2.0, 3.0], [3.0, 5.0]]);
        assert_eq!(pm.rhs(), array![[8.0, 13.0]]);
    }

    #[test]
    fn block_shape_must_match() {
        let mut pm = PartialModel::empty(Method::Qr, 2, 1, false);
        let err = pm
            .accumulate(&block(array![[1.0]], array![[1.0]]))
            .unwrap_err();

        assert!(matches!(
            err,
            RegressionErr::SizeMismatch {
                what: "block features",
                got: 1,
                expected: 2
            }
        ));
        assert_eq!(pm.rows(), 0);
    }

    #[test]
    fn merge_rejects_incompatible_models() {
        let mut a = PartialModel::empty(Method::NormEq, 2, 1, true);

        let b = PartialModel::empty(Method::Qr, 2, 1, true);
        assert!(matches!(
            a.merge(&b),
            Err(RegressionErr::MethodMismatch { .. })
        ));

        let c = PartialModel::empty(Method::NormEq, 2, 1, false);
        assert!(matches!(a.merge(&c), Err(RegressionErr::InterceptMismatch)));

        let d = PartialModel::empty(Method::NormEq, 2, 3, true);
        assert!(matches!(
            a.merge(&d),
            Err(RegressionErr::SizeMismatch { .. })
        ));
    }

    #[test]
    fn finalizing_an_empty_model_fails() {
        let pm = PartialModel::empty(Method::NormEq, 2, 1, true);
        assert!(matches!(
            pm.finalize(),
            Err(RegressionErr::EmptyInput { .. })
        ));
    }

    #[test]
    fn from_parts_validates_shapes() {
        let lhs = Array2::<f64>::eye(3);
        assert!(PartialModel::from_parts(Method::Qr, true, 4, lhs.clone(), Array2::zeros((2, 3))).is_ok());
        assert!(PartialModel::from_parts(Method::Qr, true, 4, lhs.clone(), Array2::zeros((2, 2))).is_err());
        assert!(PartialModel::from_parts(Method::Qr, true, 4, Array2::zeros((3, 2)), Array2::zeros((2, 3))).is_err());
        assert!(PartialModel::from_parts(Method::Qr, true, 4, Array2::eye(1), Array2::zeros((1, 1))).is_err());
    }

    #[test]
    fn partial_result_slots() {
        let mut pr = PartialResult::new();
        assert!(matches!(
            pr.get(PartialResultId::MODEL),
            Err(RegressionErr::MissingSlot { value: 0, .. })
        ));

        let pm = PartialModel::empty(Method::NormEq, 1, 1, true);
        assert!(pr.set(PartialResultId::MODEL, pm.clone()).unwrap().is_none());
        assert_eq!(pr.get(PartialResultId::MODEL).unwrap(), &pm);

        assert!(matches!(
            pr.set(PartialResultId::new(3), pm),
            Err(RegressionErr::UnknownId { value: 3, .. })
        ));
        assert!(pr.take(PartialResultId::MODEL).unwrap().is_some());
        assert!(pr.get(PartialResultId::MODEL).is_err());
    }
}
