use std::{num::NonZeroUsize, path::PathBuf};

use serde::{Deserialize, Serialize};

use super::training::TrainingSpec;

/// Where a worker finds its local observations.
///
/// Every row holds `x_size` features followed by `y_size` dependent variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSpec {
    /// The rows travel inside the spec.
    Inline {
        data: Vec<f64>,
        x_size: usize,
        y_size: usize,
    },
    /// A file on the worker's disk holding raw native-endian `f64` rows.
    Local {
        path: PathBuf,
        x_size: usize,
        y_size: usize,
    },
}

/// Wire-level bootstrap specification for a worker instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSpec {
    /// Worker identifier assigned by the orchestrator.
    pub worker_id: usize,
    /// Training configuration.
    pub training: TrainingSpec,
    /// The worker's local dataset.
    pub dataset: DatasetSpec,
    /// Rows per block fed to the local trainer, the whole dataset if absent.
    pub block_size: Option<NonZeroUsize>,
}
