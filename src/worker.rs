use std::sync::Arc;

use flume::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::BackendSet;
use crate::queue::Dispatch;
use crate::router::Router;

/// Which lane a worker drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Chunked,
    Normal,
}

/// Drains one dispatch lane, routing and sending each datagram.
pub struct Worker {
    id: usize,
    lane: Lane,
    rx: Receiver<Dispatch>,
    backends: Arc<BackendSet>,
    router: Arc<Router>,
}

impl Worker {
    pub fn new(
        id: usize,
        lane: Lane,
        rx: Receiver<Dispatch>,
        backends: Arc<BackendSet>,
        router: Arc<Router>,
    ) -> Self {
        Self {
            id,
            lane,
            rx,
            backends,
            router,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        debug!(worker = self.id, lane = ?self.lane, "Worker started.");

        loop {
            let dispatch = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                res = self.rx.recv_async() => match res {
                    Ok(d) => d,
                    // Every sender is gone and the lane is empty.
                    Err(_) => break,
                },
            };
            self.forward(dispatch).await;
        }

        debug!(worker = self.id, lane = ?self.lane, "Worker stopped.");
    }

    /// Sends one datagram to its backend. The packet goes back to the pool when
    /// this returns, whether or not the send succeeded.
    pub async fn forward(&self, dispatch: Dispatch) {
        let Dispatch { packet, flow_id } = dispatch;
        let backend = self.router.pick(&self.backends, flow_id.as_ref());
        if let Err(e) = backend.send(packet.as_slice()).await {
            warn!(
                backend = %backend.addr(),
                len = packet.len(),
                "Forward failed, dropping datagram: {}",
                e
            );
        }
    }
}
