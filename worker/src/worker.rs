use std::{io, num::NonZeroUsize};

use comms::{
    OnoReceiver, OnoSender,
    msg::{Command, Msg, Payload},
};
use linear_regression::{PartialResult, PartialResultId, training::Trainer, wire};
use log::{debug, info, warn};
use regression_core::Dataset;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::oneshot,
};

use crate::error::{Result, WorkerErr};

/// Runs the local step of distributed training over one dataset.
pub struct Worker {
    worker_id: usize,
    block_size: Option<NonZeroUsize>,
    dataset: Dataset,
    trainer: Box<dyn Trainer>,
}

impl Worker {
    /// Creates a new `Worker`.
    ///
    /// # Args
    /// * `worker_id` - Identifier used for observability.
    /// * `block_size` - Rows fed to the trainer at a time, the whole dataset if `None`.
    /// * `dataset` - The local observations.
    /// * `trainer` - The local step trainer.
    ///
    /// # Returns
    /// A new worker instance.
    pub fn new(
        worker_id: usize,
        block_size: Option<NonZeroUsize>,
        dataset: Dataset,
        trainer: Box<dyn Trainer>,
    ) -> Self {
        Self {
            worker_id,
            block_size,
            dataset,
            trainer,
        }
    }

    /// Trains over the local dataset and ships the partial result to the orchestrator.
    ///
    /// Training failures are reported to the orchestrator with an `Err` message
    /// before being returned.
    ///
    /// # Args
    /// * `rx` - Receiving end of the orchestrator channel.
    /// * `tx` - Sending end of the orchestrator channel.
    ///
    /// # Returns
    /// Returns `Ok(())` once the orchestrator disconnects.
    ///
    /// # Errors
    /// Returns `WorkerErr` on I/O failures, training failures or protocol violations.
    pub async fn run<R, W>(self, rx: &mut OnoReceiver<R>, tx: &mut OnoSender<W>) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let worker_id = self.worker_id;

        let partial = match self.train().await {
            Ok(partial) => partial,
            Err(e) => {
                warn!(worker_id = worker_id; "training failed: {e}");
                tx.send(&Msg::Err(e.to_string().into())).await?;
                return Err(e);
            }
        };

        let model = partial.get(PartialResultId::MODEL)?;
        let (spec, values) = wire::encode(PartialResultId::MODEL, model);
        debug!(worker_id = worker_id, rows = spec.rows; "sending partial result");

        tx.send(&Msg::Control(Command::PartialResult(spec))).await?;
        tx.send(&Msg::Data(Payload::Values(&values))).await?;

        wait_disconnect(rx).await?;
        info!(worker_id = worker_id; "orchestrator disconnected");
        Ok(())
    }

    /// Feeds every block of the dataset to the trainer on the compute pool.
    async fn train(self) -> Result<PartialResult> {
        let Self {
            worker_id,
            block_size,
            dataset,
            mut trainer,
        } = self;

        let size = block_size.map_or(dataset.rows(), NonZeroUsize::get);
        let (done_tx, done_rx) = oneshot::channel();

        rayon::spawn(move || {
            let result = compute_blocks(trainer.as_mut(), &dataset, size);
            debug!(worker_id = worker_id, rows = dataset.rows(); "local step done");
            let _ = done_tx.send(result);
        });

        done_rx
            .await
            .map_err(|_| io::Error::other("the compute pool dropped the training task"))?
    }
}

fn compute_blocks(
    trainer: &mut dyn Trainer,
    dataset: &Dataset,
    size: usize,
) -> Result<PartialResult> {
    for block in dataset.blocks(size) {
        trainer.compute(&block)?;
    }

    Ok(trainer.take_partial_result())
}

async fn wait_disconnect<R>(rx: &mut OnoReceiver<R>) -> Result<()>
where
    R: AsyncRead + Unpin + Send,
{
    let mut rx_buf: Vec<u64> = Vec::new();

    match rx.recv_into(&mut rx_buf).await? {
        Msg::Control(Command::Disconnect) => Ok(()),
        Msg::Err(e) => Err(WorkerErr::Orchestrator(e.into_owned())),
        msg => Err(WorkerErr::UnexpectedMessage {
            expected: "disconnect",
            got: msg.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    /// Counts the blocks it gets from a thread of the compute pool.
    struct PoolCounter {
        pooled_blocks: Arc<AtomicUsize>,
        partial: PartialResult,
    }

    impl Trainer for PoolCounter {
        fn compute(&mut self, _block: &Dataset) -> regression_core::Result<()> {
            if rayon::current_thread_index().is_some() {
                self.pooled_blocks.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }

        fn partial_result(&self) -> &PartialResult {
            &self.partial
        }

        fn take_partial_result(&mut self) -> PartialResult {
            std::mem::take(&mut self.partial)
        }
    }

    #[tokio::test]
    async fn blocks_are_computed_on_the_compute_pool() {
        let pooled_blocks = Arc::new(AtomicUsize::new(0));
        let trainer = PoolCounter {
            pooled_blocks: Arc::clone(&pooled_blocks),
            partial: PartialResult::new(),
        };

        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let dataset = Dataset::from_flat(&data, 1, 1).unwrap();
        let worker = Worker::new(0, NonZeroUsize::new(2), dataset, Box::new(trainer));

        worker.train().await.unwrap();
        assert_eq!(pooled_blocks.load(Ordering::SeqCst), 3);
    }
}
