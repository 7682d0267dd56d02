mod data;
mod error;
mod ids;

pub use data::Dataset;
pub use error::{RegressionErr, Result};
pub use ids::{InputId, MasterInputId, PartialResultId, ResultId};
