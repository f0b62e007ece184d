//! Stop signal shared by the listener and whoever decides to stop it.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// One-shot stop signal for the relay listener.
///
/// `main` arms it on OS signals; tests fire it by hand.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `RelayServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Returns how many listeners were told to stop.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Fire the signal once `cause` resolves, e.g. on Ctrl+C.
    pub fn trigger_on<F>(&self, cause: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.clone();
        tokio::spawn(async move {
            cause.await;
            let stopped = shutdown.trigger();
            tracing::debug!(listeners = stopped, "Shutdown triggered");
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
