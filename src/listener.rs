use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::classify::classify;
use crate::pool::BufferPool;
use crate::queue::DispatchQueues;

/// Owns the receive loop: read, classify, enqueue.
pub struct Listener {
    socket: UdpSocket,
    pool: Arc<BufferPool>,
    queues: DispatchQueues,
}

impl Listener {
    pub fn new(socket: UdpSocket, pool: Arc<BufferPool>, queues: DispatchQueues) -> Self {
        Self { socket, pool, queues }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        debug!("Listener started.");

        loop {
            // Dropped on every early exit below, which hands the buffer back to the pool.
            let mut packet = self.pool.acquire();

            let received = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                res = self.socket.recv_from(packet.buf_mut()) => res,
            };

            let (n, peer) = match received {
                Ok(r) => r,
                Err(e) => {
                    warn!("UDP recv error: {}", e);
                    continue;
                }
            };

            if n == packet.capacity() {
                trace!("Datagram from {} filled the {} byte buffer, possibly truncated", peer, n);
            }
            packet.set_len(n);
            let class = classify(packet.as_slice());

            // Blocks while the lane is full. This is the only backpressure.
            let enqueued = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                res = self.queues.enqueue(packet, class) => res,
            };
            if let Err(e) = enqueued {
                warn!("Listener stopping: {}", e);
                break;
            }
        }

        debug!("Listener stopped.");
    }
}
