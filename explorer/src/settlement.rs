use std::future::Future;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Per-driver queue of finished backend calls.
///
/// Calls run as spawned tasks; their outcomes are applied later, one at a
/// time, by the driver that owns this queue. Dropping the driver drops the
/// receiver, so outcomes that arrive afterwards go nowhere.
pub(crate) struct Settlements<T> {
    tx: UnboundedSender<T>,
    rx: UnboundedReceiver<T>,
}

impl<T: Send + 'static> Settlements<T> {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Runs `call` on the tokio runtime and queues its outcome.
    pub(crate) fn schedule<F>(&self, call: F) -> JoinHandle<()>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = call.await;
            if tx.send(outcome).is_err() {
                log::debug!("Driver dropped before settlement, discarding");
            }
        })
    }

    /// Waits for the next outcome. Pends forever when nothing is in flight.
    pub(crate) async fn next(&mut self) -> T {
        match self.rx.recv().await {
            Some(outcome) => outcome,
            // unreachable while `self.tx` is alive
            None => std::future::pending().await,
        }
    }
}
