use log::{debug, info};
use rayon::prelude::*;
use regression_core::{
    Dataset, MasterInputId, PartialResultId, RegressionErr, Result, ResultId,
};

use super::{OnlineTrainer, Trainer};
use crate::{Parameter, PartialModel, PartialResult, TrainingResult};

/// First distributed step: accumulates the partial model of the data local to a node.
///
/// A local node never solves for the betas, it ships its partial result to the
/// master instead.
#[derive(Debug, Clone, Default)]
pub struct DistributedStep1Local {
    online: OnlineTrainer,
}

impl DistributedStep1Local {
    /// Creates a new `DistributedStep1Local`.
    pub fn new(parameter: Parameter) -> Self {
        Self {
            online: OnlineTrainer::new(parameter),
        }
    }

    /// Folds a block of local observations into the partial result.
    pub fn compute(&mut self, block: &Dataset) -> Result<()> {
        self.online.compute(block)
    }

    pub fn partial_result(&self) -> &PartialResult {
        self.online.partial_result()
    }

    pub fn into_partial_result(self) -> PartialResult {
        self.online.into_partial_result()
    }
}

impl Trainer for DistributedStep1Local {
    fn compute(&mut self, block: &Dataset) -> Result<()> {
        self.compute(block)
    }

    fn partial_result(&self) -> &PartialResult {
        self.partial_result()
    }

    fn take_partial_result(&mut self) -> PartialResult {
        self.online.take_partial_result()
    }
}

/// Second distributed step: merges the partial results of the local nodes and
/// solves for the final model.
#[derive(Debug, Clone, Default)]
pub struct DistributedStep2Master {
    parameter: Parameter,
    inputs: Vec<PartialResult>,
    partial: PartialResult,
}

impl DistributedStep2Master {
    /// Creates a new `DistributedStep2Master`.
    pub fn new(parameter: Parameter) -> Self {
        Self {
            parameter,
            inputs: Vec::new(),
            partial: PartialResult::new(),
        }
    }

    /// Adds a local partial result to the collection under `id`.
    pub fn add_input(&mut self, id: MasterInputId, partial: PartialResult) -> Result<()> {
        id.index()?;
        self.inputs.push(partial);
        Ok(())
    }

    /// The number of partial results waiting to be merged.
    pub fn pending(&self) -> usize {
        self.inputs.len()
    }

    /// Merges every pending partial result into the master partial result and
    /// clears the collection.
    ///
    /// Nothing changes if any pending partial result can't be merged: the
    /// collection is kept and the master partial result stays as it was.
    pub fn compute(&mut self) -> Result<()> {
        let mut merged = self.partial.get(PartialResultId::MODEL).ok().cloned();

        if self.inputs.is_empty() && merged.is_none() {
            return Err(RegressionErr::EmptyInput {
                what: "master partial models",
            });
        }

        for input in &self.inputs {
            let local = input.get(PartialResultId::MODEL)?;
            check_parameter(&self.parameter, local)?;

            match merged.as_mut() {
                Some(model) => model.merge(local)?,
                None => merged = Some(local.clone()),
            }
        }

        if let Some(model) = merged {
            self.partial.set(PartialResultId::MODEL, model)?;
        }

        debug!(merged = self.inputs.len(); "master step computed");
        self.inputs.clear();
        Ok(())
    }

    pub fn partial_result(&self) -> &PartialResult {
        &self.partial
    }

    /// Solves for the model using every partial result merged so far.
    pub fn finalize_compute(&self) -> Result<TrainingResult> {
        let partial = self
            .partial
            .get(PartialResultId::MODEL)
            .map_err(|_| RegressionErr::EmptyInput {
                what: "master partial models",
            })?;

        let model = partial.finalize()?;
        info!(rows = partial.rows(), responses = model.responses(); "distributed training finalized");

        let mut result = TrainingResult::new();
        result.set(ResultId::MODEL, model)?;
        Ok(result)
    }
}

fn check_parameter(parameter: &Parameter, local: &PartialModel) -> Result<()> {
    if local.method() != parameter.method {
        return Err(RegressionErr::MethodMismatch {
            got: local.method().name(),
            expected: parameter.method.name(),
        });
    }

    if local.intercept() != parameter.intercept {
        return Err(RegressionErr::InterceptMismatch);
    }

    Ok(())
}

/// Runs the first step on every shard in the compute pool and merges the
/// results on the calling thread.
///
/// # Arguments
/// * `shards` - The local datasets, one per simulated node.
/// * `parameter` - The training parameters.
///
/// # Returns
/// The training result or the first error raised by any step.
pub fn train_parallel(shards: &[Dataset], parameter: Parameter) -> Result<TrainingResult> {
    if shards.is_empty() {
        return Err(RegressionErr::EmptyInput { what: "shards" });
    }

    let partials = shards
        .par_iter()
        .map(|shard| {
            let mut local = DistributedStep1Local::new(parameter);
            local.compute(shard)?;
            Ok(local.into_partial_result())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut master = DistributedStep2Master::new(parameter);

    for partial in partials {
        master.add_input(MasterInputId::PARTIAL_MODELS, partial)?;
    }

    master.compute()?;
    master.finalize_compute()
}
