use std::net::{SocketAddr, ToSocketAddrs};

use comms::specs::{
    training::{MethodSpec, TrainingSpec},
    worker::{DatasetSpec, WorkerSpec},
};

use super::{DatasetConfig, MethodConfig, TrainingConfig};
use crate::error::OrchestratorError;

/// Validates user configs and turns them into the specs sent to the workers.
#[derive(Default)]
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Validates `training` and builds one spec per worker.
    ///
    /// # Returns
    /// The resolved address and spec of every worker, in config order.
    ///
    /// # Errors
    /// `OrchestratorError::InvalidConfig` for inconsistent configs and
    /// `OrchestratorError::ConnectionFailed` for addresses that can't be resolved.
    pub fn adapt_configs(
        &self,
        training: &TrainingConfig,
    ) -> Result<Vec<(SocketAddr, WorkerSpec)>, OrchestratorError> {
        self.validate_training(training)?;

        let spec = self.adapt_training(training);

        training
            .workers
            .iter()
            .enumerate()
            .map(|(i, worker)| {
                let addr = self.resolve_addr(i, &worker.addr)?;

                let spec = WorkerSpec {
                    worker_id: i,
                    training: spec,
                    dataset: self.adapt_dataset(&worker.dataset),
                    block_size: training.block_size,
                };

                Ok((addr, spec))
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate_training(&self, training: &TrainingConfig) -> Result<(), OrchestratorError> {
        let Some(first) = training.workers.first() else {
            return Err(OrchestratorError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        };

        let (x_size, y_size) = first.dataset.sizes();

        if x_size == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "x_size must be greater than 0".into(),
            ));
        }

        if y_size == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "y_size must be greater than 0".into(),
            ));
        }

        for (i, worker) in training.workers.iter().enumerate() {
            // Partial models only merge when every worker sees the same columns.
            if worker.dataset.sizes() != (x_size, y_size) {
                let (got_x, got_y) = worker.dataset.sizes();
                return Err(OrchestratorError::InvalidConfig(format!(
                    "worker[{i}]: dataset has x_size {got_x} and y_size {got_y}, \
                     expected {x_size} and {y_size}"
                )));
            }

            if let DatasetConfig::Inline { data, .. } = &worker.dataset {
                let row_size = x_size + y_size;

                if data.is_empty() {
                    return Err(OrchestratorError::InvalidConfig(format!(
                        "worker[{i}]: dataset must have at least one sample"
                    )));
                }

                if data.len() % row_size != 0 {
                    return Err(OrchestratorError::InvalidConfig(format!(
                        "worker[{i}]: dataset length ({}) is not divisible by x_size + y_size ({row_size})",
                        data.len()
                    )));
                }
            }
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Adaptation
    // -------------------------------------------------------------------------

    fn resolve_addr(&self, i: usize, addr: &str) -> Result<SocketAddr, OrchestratorError> {
        addr.to_socket_addrs()
            .map_err(|e| OrchestratorError::ConnectionFailed {
                addr: format!("worker[{i}] {addr}"),
                source: e,
            })?
            .next()
            .ok_or_else(|| {
                OrchestratorError::InvalidConfig(format!("worker[{i}]: could not resolve {addr}"))
            })
    }

    fn adapt_training(&self, training: &TrainingConfig) -> TrainingSpec {
        let method = match training.method {
            MethodConfig::NormEq => MethodSpec::NormEq,
            MethodConfig::Qr => MethodSpec::Qr,
        };

        TrainingSpec {
            method,
            intercept: training.intercept,
        }
    }

    fn adapt_dataset(&self, dataset: &DatasetConfig) -> DatasetSpec {
        match dataset.clone() {
            DatasetConfig::Local {
                path,
                x_size,
                y_size,
            } => DatasetSpec::Local {
                path,
                x_size,
                y_size,
            },
            DatasetConfig::Inline {
                data,
                x_size,
                y_size,
            } => DatasetSpec::Inline {
                data,
                x_size,
                y_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::configs::WorkerConfig;

    fn inline(data: Vec<f64>, x_size: usize, y_size: usize) -> DatasetConfig {
        DatasetConfig::Inline {
            data,
            x_size,
            y_size,
        }
    }

    fn config(datasets: Vec<DatasetConfig>) -> TrainingConfig {
        TrainingConfig {
            workers: datasets
                .into_iter()
                .enumerate()
                .map(|(i, dataset)| WorkerConfig {
                    addr: format!("127.0.0.1:{}", 50000 + i),
                    dataset,
                })
                .collect(),
            method: MethodConfig::Qr,
            intercept: false,
            block_size: NonZeroUsize::new(2),
        }
    }

    #[test]
    fn builds_one_spec_per_worker() {
        let training = config(vec![
            inline(vec![1.0, 2.0, 3.0, 4.0], 1, 1),
            DatasetConfig::Local {
                path: "/data/shard-1.bin".into(),
                x_size: 1,
                y_size: 1,
            },
        ]);

        let workers = Adapter::new().adapt_configs(&training).unwrap();
        assert_eq!(workers.len(), 2);

        let (addr, spec) = &workers[1];
        assert_eq!(addr.port(), 50001);
        assert_eq!(spec.worker_id, 1);
        assert_eq!(spec.training.method, MethodSpec::Qr);
        assert!(!spec.training.intercept);
        assert_eq!(spec.block_size, NonZeroUsize::new(2));
        assert!(matches!(spec.dataset, DatasetSpec::Local { x_size: 1, .. }));
    }

    #[test]
    fn rejects_inconsistent_configs() {
        let adapter = Adapter::new();

        let cases = [
            config(vec![]),
            config(vec![inline(vec![1.0, 2.0], 0, 2)]),
            config(vec![inline(vec![1.0, 2.0], 2, 0)]),
            config(vec![inline(vec![], 1, 1)]),
            config(vec![inline(vec![1.0, 2.0, 3.0], 1, 1)]),
            config(vec![
                inline(vec![1.0, 2.0], 1, 1),
                inline(vec![1.0, 2.0, 3.0], 2, 1),
            ]),
        ];

        for training in cases {
            assert!(
                matches!(
                    adapter.adapt_configs(&training),
                    Err(OrchestratorError::InvalidConfig(_))
                ),
                "accepted {training:?}"
            );
        }
    }

    #[test]
    fn configs_parse_from_json_with_defaults() {
        let json = r#"{
            "workers": [
                { "addr": "worker-0:50000", "dataset": { "inline": { "data": [1.0, 2.0], "x_size": 1, "y_size": 1 } } }
            ]
        }"#;

        let training: TrainingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(training.method, MethodConfig::NormEq);
        assert!(training.intercept);
        assert_eq!(training.block_size, None);
        assert_eq!(training.workers[0].dataset.sizes(), (1, 1));
    }
}
