use std::net::SocketAddr;

use comms::{
    OnoReceiver, OnoSender,
    msg::{Command, Msg, Payload},
    specs::worker::WorkerSpec,
};
use futures::future;
use linear_regression::{
    MasterInputId, Model, Parameter, PartialModel, PartialResult, PartialResultId,
    training::{DistributedStep2Master, TrainerBuilder},
    wire,
};
use log::{debug, info};
use tokio::net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};

use crate::error::OrchestratorError;

type NetRx = OnoReceiver<OwnedReadHalf>;
type NetTx = OnoSender<OwnedWriteHalf>;
type Result<T> = std::result::Result<T, OrchestratorError>;

/// The orchestrator's end of a worker connection.
struct WorkerChannel {
    worker_id: usize,
    rx: NetRx,
    tx: NetTx,
}

/// A distributed training job whose workers are computing their local step.
pub struct Session {
    parameter: Parameter,
    workers: Vec<WorkerChannel>,
}

impl Session {
    /// Connects to every worker and sends it its specification.
    ///
    /// # Arguments
    /// * `workers` - The network address and specification of every worker node.
    ///
    /// # Returns
    /// A new `Session` instance.
    ///
    /// # Errors
    /// `OrchestratorError::ConnectionFailed` if a worker can't be reached.
    pub async fn start(workers: Vec<(SocketAddr, WorkerSpec)>) -> Result<Self> {
        let Some((_, first)) = workers.first() else {
            return Err(OrchestratorError::InvalidConfig(
                "at least one worker is required".into(),
            ));
        };

        let parameter = TrainerBuilder::new().resolve_parameter(&first.training);
        let workers = Self::create_workers(workers).await?;

        Ok(Self { parameter, workers })
    }

    /// Waits for every partial model, merges them and solves for the betas.
    ///
    /// # Returns
    /// The trained model.
    ///
    /// # Errors
    /// `OrchestratorError::WorkerError` if a worker fails or breaks the protocol
    /// and `OrchestratorError::Training` if the merged model can't be solved.
    pub async fn wait(self) -> Result<Model> {
        let Self { parameter, workers } = self;

        let partials = future::try_join_all(workers.into_iter().map(Self::collect)).await?;
        info!(workers = partials.len(); "received every partial model");

        let mut master = DistributedStep2Master::new(parameter);

        for partial in partials {
            let mut input = PartialResult::new();
            input.set(PartialResultId::MODEL, partial)?;
            master.add_input(MasterInputId::PARTIAL_MODELS, input)?;
        }

        master.compute()?;
        let model = master.finalize_compute()?.into_model()?;

        info!(
            features = model.features(),
            responses = model.responses();
            "model trained"
        );
        Ok(model)
    }

    /// Receives a worker's partial model and releases the worker.
    async fn collect(worker: WorkerChannel) -> Result<PartialModel> {
        let WorkerChannel {
            worker_id,
            mut rx,
            mut tx,
        } = worker;

        let mut rx_buf: Vec<u64> = Vec::new();

        let spec = match rx.recv_into(&mut rx_buf).await? {
            Msg::Control(Command::PartialResult(spec)) => spec,
            msg => return Err(Self::unexpected(worker_id, "partial_result", msg)),
        };

        let partial = match rx.recv_into(&mut rx_buf).await? {
            Msg::Data(Payload::Values(values)) => wire::decode(&spec, values)?,
            msg => return Err(Self::unexpected(worker_id, "values", msg)),
        };

        debug!(worker_id = worker_id, rows = partial.rows(); "received partial model");

        tx.send(&Msg::Control(Command::Disconnect)).await?;
        Ok(partial)
    }

    fn unexpected(worker_id: usize, expected: &str, msg: Msg<'_>) -> OrchestratorError {
        let msg = match msg {
            Msg::Err(e) => e.into_owned(),
            msg => format!("expected {expected}, got {}", msg.kind()),
        };

        OrchestratorError::WorkerError { worker_id, msg }
    }

    /// Tries to reach the workers and create them using their specifications.
    ///
    /// # Arguments
    /// * `workers` - The network address and specification of every worker node.
    ///
    /// # Returns
    /// The communication channels or an error if failed to do so.
    async fn create_workers(workers: Vec<(SocketAddr, WorkerSpec)>) -> Result<Vec<WorkerChannel>> {
        let mut channels = Vec::with_capacity(workers.len());

        for (addr, spec) in workers {
            let worker_id = spec.worker_id;
            let (rx, mut tx) = Self::open_channel(addr).await?;

            tx.send(&Msg::Control(Command::CreateWorker(spec))).await?;
            debug!(worker_id = worker_id; "worker created at {addr}");

            channels.push(WorkerChannel { worker_id, rx, tx });
        }

        Ok(channels)
    }

    /// Creates a communication channel with some entity through it's network address.
    ///
    /// # Arguments
    /// * `addr` - The network address of some node.
    ///
    /// # Returns
    /// A communication channel or an error if failed to do so.
    async fn open_channel(addr: SocketAddr) -> Result<(NetRx, NetTx)> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| OrchestratorError::ConnectionFailed {
                addr: addr.to_string(),
                source,
            })?;

        let (rx, tx) = stream.into_split();
        Ok(comms::channel(rx, tx))
    }
}
