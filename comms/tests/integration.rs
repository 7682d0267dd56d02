use std::num::NonZeroUsize;

use comms::{
    msg::{Command, Msg, Payload},
    specs::{
        training::{MethodSpec, TrainingSpec},
        worker::{DatasetSpec, WorkerSpec},
    },
};
use tokio::io::{self, AsyncWriteExt};

const SIZE: usize = 128;

#[tokio::test]
async fn send_recv_control() {
    let spec = WorkerSpec {
        worker_id: 3,
        training: TrainingSpec {
            method: MethodSpec::Qr,
            intercept: true,
        },
        dataset: DatasetSpec::Inline {
            data: vec![0.0, 1.0, 1.0, 3.0],
            x_size: 1,
            y_size: 1,
        },
        block_size: NonZeroUsize::new(16),
    };
    let msg = Msg::Control(Command::CreateWorker(spec));

    let (one, two) = io::duplex(SIZE);
    let (_, tx) = io::split(one);
    let (rx, _) = io::split(two);
    let (_, mut tx) = comms::channel(io::empty(), tx);
    let (mut rx, _) = comms::channel(rx, io::sink());

    let send = tx.send(&msg);
    let mut buf: Vec<u64> = Vec::new();
    let recv = rx.recv_into::<Msg, _>(&mut buf);

    let (sent, received) = tokio::join!(send, recv);
    sent.unwrap();
    assert_eq!(received.unwrap(), msg);
}

#[tokio::test]
async fn send_recv_values_larger_than_the_pipe() {
    let values: Vec<f64> = (0..1000).map(|i| i as f64 * 0.5).collect();
    let msg = Msg::Data(Payload::Values(&values));

    let (one, two) = io::duplex(SIZE);
    let (_, mut tx) = comms::channel(io::empty(), one);
    let (mut rx, _) = comms::channel(two, io::sink());

    let mut buf: Vec<f64> = Vec::new();
    let (sent, received) = tokio::join!(tx.send(&msg), rx.recv_into::<Msg, _>(&mut buf));
    sent.unwrap();

    let Msg::Data(Payload::Values(got)) = received.unwrap() else {
        panic!("expected values");
    };
    assert_eq!(got, values.as_slice());
}

#[tokio::test]
async fn send_recv_sequence_reuses_the_buffer() {
    let (one, two) = io::duplex(SIZE);
    let (_, mut tx) = comms::channel(io::empty(), one);
    let (mut rx, _) = comms::channel(two, io::sink());

    let sender = async move {
        tx.send(&Msg::Err("boom".into())).await?;
        tx.send(&Msg::Control(Command::Disconnect)).await
    };

    let receiver = async move {
        let mut buf: Vec<u64> = Vec::new();
        let first = match rx.recv_into::<Msg, _>(&mut buf).await? {
            Msg::Err(e) => e.into_owned(),
            other => panic!("unexpected {other:?}"),
        };
        let second: Msg = rx.recv_into(&mut buf).await?;
        assert_eq!(second, Msg::Control(Command::Disconnect));
        std::io::Result::Ok(first)
    };

    let (sent, received) = tokio::join!(sender, receiver);
    sent.unwrap();
    assert_eq!(received.unwrap(), "boom");
}

#[tokio::test]
async fn oversized_frames_are_rejected_before_allocating() {
    let (mut one, two) = io::duplex(SIZE);
    let (mut rx, _) = comms::channel(two, io::sink());

    // A 1 GiB length header with no body behind it.
    one.write_all(&(1u64 << 30).to_be_bytes()).await.unwrap();

    let mut buf: Vec<u64> = Vec::new();
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(buf.capacity() < 1 << 20);
}
