pub mod configs;
pub mod error;
mod session;

use linear_regression::Model;
use log::info;
use tokio::runtime::Runtime;

use configs::{Adapter, TrainingConfig};
use session::Session;

pub use error::OrchestratorError;

/// Runs a distributed training job to completion on a dedicated runtime.
///
/// # Errors
/// Returns an `OrchestratorError` if the config is invalid, a worker can't be
/// reached or fails, or the merged model can't be solved.
pub fn train(training: &TrainingConfig) -> Result<Model, OrchestratorError> {
    let runtime = Runtime::new()?;
    runtime.block_on(train_async(training))
}

/// Runs a distributed training job on the current runtime.
///
/// # Errors
/// See [`train`].
pub async fn train_async(training: &TrainingConfig) -> Result<Model, OrchestratorError> {
    info!("adapting configs");
    let workers = Adapter::new().adapt_configs(training)?;

    info!("connecting to {} worker(s)", workers.len());
    let session = Session::start(workers).await?;
    session.wait().await
}
