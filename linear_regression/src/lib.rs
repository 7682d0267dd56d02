//! Linear regression training: normal equations and QR methods, in batch,
//! online and distributed modes.

mod linalg;
mod model;
mod parameter;
mod partial;
pub mod runtime;
pub mod training;
pub mod wire;

pub use model::{Model, TrainingResult};
pub use parameter::Parameter;
pub use partial::{Method, PartialModel, PartialResult};
pub use regression_core::{
    Dataset, InputId, MasterInputId, PartialResultId, RegressionErr, Result, ResultId,
};
