mod batch;
mod builder;
mod distributed;
mod online;

use regression_core::{Dataset, Result};

use crate::PartialResult;

pub use batch::BatchTrainer;
pub use builder::TrainerBuilder;
pub use distributed::{DistributedStep1Local, DistributedStep2Master, train_parallel};
pub use online::OnlineTrainer;

/// A training computation that consumes blocks of observations and exposes the
/// partial result accumulated so far.
///
/// This is the boundary the worker node drives: it neither knows the method
/// nor how the statistics are laid out.
pub trait Trainer: Send {
    /// Folds a block of observations into the partial result.
    ///
    /// # Errors
    /// `SizeMismatch` if the block shape differs from the previous ones.
    fn compute(&mut self, block: &Dataset) -> Result<()>;

    /// The partial result accumulated so far.
    fn partial_result(&self) -> &PartialResult;

    /// Takes the partial result out of the trainer, leaving it empty.
    fn take_partial_result(&mut self) -> PartialResult;
}
