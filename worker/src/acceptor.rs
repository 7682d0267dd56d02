use comms::{
    OnoReceiver,
    msg::{Command, Msg},
    specs::worker::WorkerSpec,
};
use log::{info, warn};
use tokio::io::AsyncRead;

use crate::error::{Result, WorkerErr};

/// Worker bootstrap acceptor.
pub struct WorkerAcceptor;

impl WorkerAcceptor {
    /// Waits for the `CreateWorker(WorkerSpec)` that starts a training job.
    ///
    /// # Args
    /// * `rx` - Receiving end of the orchestrator channel.
    ///
    /// # Returns
    /// `Ok(Some(spec))` on `CreateWorker`, `Ok(None)` if the orchestrator
    /// disconnects before sending one.
    ///
    /// # Errors
    /// Returns `WorkerErr::Io` if receiving fails and `WorkerErr::Orchestrator`
    /// if the orchestrator reports an error instead.
    pub async fn handshake<R>(rx: &mut OnoReceiver<R>) -> Result<Option<WorkerSpec>>
    where
        R: AsyncRead + Unpin + Send,
    {
        info!("waiting for CreateWorker spec");
        let mut rx_buf: Vec<u64> = Vec::new();

        loop {
            match rx.recv_into(&mut rx_buf).await? {
                Msg::Control(Command::CreateWorker(spec)) => return Ok(Some(spec)),
                Msg::Control(Command::Disconnect) => {
                    info!("received Disconnect before bootstrap");
                    return Ok(None);
                }
                Msg::Err(e) => return Err(WorkerErr::Orchestrator(e.into_owned())),
                msg => warn!("expected CreateWorker, got {}", msg.kind()),
            }
        }
    }
}
