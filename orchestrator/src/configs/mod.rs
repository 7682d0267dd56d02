mod adapter;
mod training;

use std::{fs::File, io::BufReader, path::Path};

pub use adapter::Adapter;
pub use training::{DatasetConfig, MethodConfig, TrainingConfig, WorkerConfig};

use crate::error::OrchestratorError;

/// Reads a JSON `TrainingConfig` from `path`.
///
/// # Errors
/// `OrchestratorError::Io` if the file can't be opened and
/// `OrchestratorError::InvalidConfig` if it isn't a valid config.
pub fn load(path: &Path) -> Result<TrainingConfig, OrchestratorError> {
    let file = File::open(path)?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| OrchestratorError::InvalidConfig(format!("{}: {e}", path.display())))
}
