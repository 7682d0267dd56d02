//! The worker node: runs the local step of distributed linear regression
//! training for an orchestrator.

pub mod acceptor;
pub mod builder;
pub mod dataset;
pub mod error;
pub mod worker;

use comms::{OnoReceiver, OnoSender, msg::Msg};
use log::{info, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
};

pub use acceptor::WorkerAcceptor;
pub use builder::WorkerBuilder;
pub use error::{Result, WorkerErr};
pub use worker::Worker;

/// Serves one orchestrator connection: handshake, local training and reply.
///
/// # Args
/// * `rx` - Receiving end of the orchestrator channel.
/// * `tx` - Sending end of the orchestrator channel.
///
/// # Errors
/// Returns `WorkerErr` on I/O failures, training failures or protocol violations.
pub async fn serve_connection<R, W>(mut rx: OnoReceiver<R>, mut tx: OnoSender<W>) -> Result<()>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let Some(spec) = WorkerAcceptor::handshake(&mut rx).await? else {
        return Ok(());
    };

    let worker = match WorkerBuilder::build(&spec).await {
        Ok(worker) => worker,
        Err(e) => {
            tx.send(&Msg::Err(e.to_string().into())).await?;
            return Err(e);
        }
    };

    worker.run(&mut rx, &mut tx).await?;
    tx.shutdown().await?;
    Ok(())
}

/// Accepts orchestrator connections one after the other until the listener fails.
///
/// A failed job is logged and doesn't stop the worker.
///
/// # Errors
/// Returns `WorkerErr::Io` if accepting a connection fails.
pub async fn serve(listener: TcpListener) -> Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("orchestrator connected from {addr}");

        let (rx, tx) = stream.into_split();
        let (rx, tx) = comms::channel(rx, tx);

        match serve_connection(rx, tx).await {
            Ok(()) => info!("job from {addr} finished"),
            Err(e) => warn!("job from {addr} failed: {e}"),
        }
    }
}
