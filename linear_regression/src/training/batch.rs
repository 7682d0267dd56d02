use log::info;
use regression_core::{Dataset, Result};

use super::OnlineTrainer;
use crate::{Parameter, TrainingResult};

/// Trains a linear regression on a dataset available all at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchTrainer {
    parameter: Parameter,
}

impl BatchTrainer {
    /// Creates a new `BatchTrainer`.
    pub fn new(parameter: Parameter) -> Self {
        Self { parameter }
    }

    /// Trains a model on the whole `dataset`.
    pub fn compute(&self, dataset: &Dataset) -> Result<TrainingResult> {
        info!(
            method = self.parameter.method.name(),
            rows = dataset.rows(),
            features = dataset.features();
            "batch training"
        );

        let mut online = OnlineTrainer::new(self.parameter);
        online.compute(dataset)?;
        online.finalize_compute()
    }
}
