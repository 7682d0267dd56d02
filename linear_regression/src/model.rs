use ndarray::{Array2, ArrayView2, Axis, linalg::general_mat_mul, s};
use regression_core::{RegressionErr, Result, ResultId};
use serde::{Deserialize, Serialize};

/// A trained linear regression model.
///
/// `betas` holds one row per dependent variable; column `0` is the intercept
/// (zero when it wasn't fitted) and column `j` the coefficient of feature `j - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    betas: Array2<f64>,
    intercept: bool,
}

impl Model {
    /// Creates a new `Model`.
    ///
    /// # Arguments
    /// * `betas` - The `k x (p + 1)` coefficients.
    /// * `intercept` - Whether the intercept column was fitted.
    pub fn new(betas: Array2<f64>, intercept: bool) -> Self {
        Self { betas, intercept }
    }

    pub fn betas(&self) -> ArrayView2<'_, f64> {
        self.betas.view()
    }

    pub fn intercept(&self) -> bool {
        self.intercept
    }

    pub fn features(&self) -> usize {
        self.betas.ncols().saturating_sub(1)
    }

    pub fn responses(&self) -> usize {
        self.betas.nrows()
    }

    /// Predicts the dependent variables for every row of `x`.
    ///
    /// # Returns
    /// The `n x k` predictions or a `SizeMismatch` if `x` doesn't have one column per feature.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.features() {
            return Err(RegressionErr::SizeMismatch {
                what: "prediction features",
                got: x.ncols(),
                expected: self.features(),
            });
        }

        let coefs = self.betas.slice(s![.., 1..]);
        let intercepts = self.betas.column(0).insert_axis(Axis(0));

        let mut y = Array2::zeros((x.nrows(), self.responses()));
        general_mat_mul(1.0, &x, &coefs.t(), 0.0, &mut y);
        y += &intercepts;
        Ok(y)
    }
}

/// The final result of linear regression training, one slot per `ResultId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingResult {
    slots: [Option<Model>; ResultId::COUNT],
}

impl TrainingResult {
    /// Creates a new `TrainingResult` with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model stored under `id`.
    pub fn get(&self, id: ResultId) -> Result<&Model> {
        self.slots[id.index()?]
            .as_ref()
            .ok_or(RegressionErr::MissingSlot {
                kind: "result",
                value: id.value(),
            })
    }

    /// Stores `model` under `id`.
    pub fn set(&mut self, id: ResultId, model: Model) -> Result<()> {
        self.slots[id.index()?] = Some(model);
        Ok(())
    }

    /// Consumes the result returning the trained model.
    pub fn into_model(mut self) -> Result<Model> {
        self.slots[ResultId::MODEL.index()?]
            .take()
            .ok_or(RegressionErr::MissingSlot {
                kind: "result",
                value: ResultId::MODEL.value(),
            })
    }
}
