//! Signal handling for graceful shutdown

use std::io;
use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Resolve with the first SIGTERM or SIGINT received
pub async fn shutdown_signal() -> io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    let received = signals.next().await;
    handle.close();

    match received {
        Some(signal) => {
            info!("Received signal: {}", signal);
            Ok(signal)
        }
        None => Err(io::Error::new(io::ErrorKind::Other, "signal stream closed")),
    }
}
