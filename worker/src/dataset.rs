//! Resolution of the dataset a worker trains on.

use comms::specs::worker::DatasetSpec;
use log::debug;
use regression_core::Dataset;

use crate::error::{Result, WorkerErr};

const VALUE_SIZE: usize = size_of::<f64>();

/// Loads the dataset described by `spec`.
///
/// Local files hold the rows back to back as native-endian `f64`s.
///
/// # Errors
/// `WorkerErr::Io` if the file can't be read, `WorkerErr::Dataset` if its length isn't a
/// whole number of values and `WorkerErr::Training` if the values don't form a valid dataset.
pub async fn load(spec: &DatasetSpec) -> Result<Dataset> {
    match spec {
        DatasetSpec::Inline {
            data,
            x_size,
            y_size,
        } => Ok(Dataset::from_flat(data, *x_size, *y_size)?),
        DatasetSpec::Local {
            path,
            x_size,
            y_size,
        } => {
            let bytes = tokio::fs::read(path).await?;

            if bytes.len() % VALUE_SIZE != 0 {
                return Err(WorkerErr::Dataset {
                    path: path.display().to_string(),
                    msg: format!("{} bytes is not a multiple of {VALUE_SIZE}", bytes.len()),
                });
            }

            let data: Vec<f64> = bytemuck::pod_collect_to_vec(&bytes);
            debug!(values = data.len(); "read local dataset {}", path.display());

            Ok(Dataset::from_flat(&data, *x_size, *y_size)?)
        }
    }
}
