use log::debug;
use regression_core::{Dataset, PartialResultId, RegressionErr, Result, ResultId};

use super::Trainer;
use crate::{Parameter, PartialModel, PartialResult, TrainingResult};

/// Trains a linear regression as data arrives, one block at a time.
///
/// Each `compute` call folds a block into the partial model stored under
/// `PartialResultId::MODEL`; `finalize_compute` solves for the betas.
#[derive(Debug, Clone, Default)]
pub struct OnlineTrainer {
    parameter: Parameter,
    partial: PartialResult,
}

impl OnlineTrainer {
    /// Creates a new `OnlineTrainer`.
    pub fn new(parameter: Parameter) -> Self {
        Self {
            parameter,
            partial: PartialResult::new(),
        }
    }

    pub fn parameter(&self) -> Parameter {
        self.parameter
    }

    /// Updates the partial model with a new block of observations.
    pub fn compute(&mut self, block: &Dataset) -> Result<()> {
        let Parameter { method, intercept } = self.parameter;

        match self.partial.get_mut(PartialResultId::MODEL)? {
            Some(model) => model.accumulate(block)?,
            None => {
                let mut model =
                    PartialModel::empty(method, block.features(), block.responses(), intercept);
                model.accumulate(block)?;
                self.partial.set(PartialResultId::MODEL, model)?;
            }
        }

        debug!(rows = block.rows(); "online block computed");
        Ok(())
    }

    /// The partial result accumulated so far.
    pub fn partial_result(&self) -> &PartialResult {
        &self.partial
    }

    /// Consumes the trainer returning its partial result.
    pub fn into_partial_result(self) -> PartialResult {
        self.partial
    }

    /// Solves for the model using every block computed so far.
    ///
    /// # Returns
    /// The training result or `EmptyInput` if no block was computed.
    pub fn finalize_compute(&self) -> Result<TrainingResult> {
        let partial = self
            .partial
            .get(PartialResultId::MODEL)
            .map_err(|_| RegressionErr::EmptyInput {
                what: "online training input",
            })?;

        let model = partial.finalize()?;
        debug!(rows = partial.rows(), responses = model.responses(); "online training finalized");

        let mut result = TrainingResult::new();
        result.set(ResultId::MODEL, model)?;
        Ok(result)
    }
}

impl Trainer for OnlineTrainer {
    fn compute(&mut self, block: &Dataset) -> Result<()> {
        self.compute(block)
    }

    fn partial_result(&self) -> &PartialResult {
        self.partial_result()
    }

    fn take_partial_result(&mut self) -> PartialResult {
        std::mem::take(&mut self.partial)
    }
}
