use comms::specs::worker::WorkerSpec;
use linear_regression::{Method, training::TrainerBuilder};
use log::debug;

use crate::{Worker, dataset, error::Result};

pub struct WorkerBuilder;

impl WorkerBuilder {
    /// Builds a `Worker` from a `WorkerSpec`, loading its dataset.
    ///
    /// # Args
    /// * `spec` - Bootstrap specification received from the orchestrator.
    ///
    /// # Returns
    /// A fully initialized `Worker` instance.
    ///
    /// # Errors
    /// Returns `WorkerErr` if the dataset can't be loaded.
    pub async fn build(spec: &WorkerSpec) -> Result<Worker> {
        let dataset = dataset::load(&spec.dataset).await?;
        let trainer = TrainerBuilder::new().build(&spec.training);

        debug!(
            worker_id = spec.worker_id,
            rows = dataset.rows(),
            features = dataset.features(),
            responses = dataset.responses(),
            method = Method::from(spec.training.method).name();
            "worker built"
        );

        Ok(Worker::new(
            spec.worker_id,
            spec.block_size,
            dataset,
            trainer,
        ))
    }
}
