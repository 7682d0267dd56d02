use std::{num::NonZeroUsize, path::PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodConfig {
    #[default]
    NormEq,
    Qr,
}

/// A worker's dataset, rows of `x_size` features followed by `y_size` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetConfig {
    /// A file of raw native-endian `f64`s on the worker's disk.
    Local {
        path: PathBuf,
        x_size: usize,
        y_size: usize,
    },
    Inline {
        data: Vec<f64>,
        x_size: usize,
        y_size: usize,
    },
}

impl DatasetConfig {
    pub fn sizes(&self) -> (usize, usize) {
        match *self {
            Self::Local { x_size, y_size, .. } | Self::Inline { x_size, y_size, .. } => {
                (x_size, y_size)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub addr: String,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub workers: Vec<WorkerConfig>,
    #[serde(default)]
    pub method: MethodConfig,
    #[serde(default = "default_intercept")]
    pub intercept: bool,
    #[serde(default)]
    pub block_size: Option<NonZeroUsize>,
}

fn default_intercept() -> bool {
    true
}
