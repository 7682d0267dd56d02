use std::{env, io, num::NonZeroUsize};

use linear_regression::runtime::{self, RuntimeConfig};
use log::info;
use tokio::{net::TcpListener, signal};

const DEFAULT_HOST: &str = "127.0.0.1";

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let threads = match env::var("THREADS") {
        Ok(threads) => Some(
            threads
                .parse::<NonZeroUsize>()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        ),
        Err(_) => None,
    };
    runtime::init(RuntimeConfig { threads }).map_err(io::Error::other)?;

    let addr = format!(
        "{}:{}",
        env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("PORT").map_err(io::Error::other)?,
    );

    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    tokio::select! {
        ret = worker::serve(listener) => ret?,
        _ = signal::ctrl_c() => info!("received SIGINT, shutting down"),
    }

    Ok(())
}
