//! The two dispatch lanes between the listener and the workers.

use flume::{Receiver, Sender};

use crate::classify::{FlowId, PacketClass};
use crate::error::{ForwardError, ForwardResult};
use crate::pool::Packet;

/// A classified datagram waiting for a worker.
#[derive(Debug)]
pub struct Dispatch {
    pub packet: Packet,
    pub flow_id: Option<FlowId>,
}

/// Bounded chunked and normal queues. Senders block when full.
#[derive(Clone)]
pub struct DispatchQueues {
    chunked_tx: Sender<Dispatch>,
    chunked_rx: Receiver<Dispatch>,
    normal_tx: Sender<Dispatch>,
    normal_rx: Receiver<Dispatch>,
}

impl DispatchQueues {
    pub fn new(chunked_capacity: usize, normal_capacity: usize) -> Self {
        let (chunked_tx, chunked_rx) = flume::bounded(chunked_capacity);
        let (normal_tx, normal_rx) = flume::bounded(normal_capacity);
        Self {
            chunked_tx,
            chunked_rx,
            normal_tx,
            normal_rx,
        }
    }

    /// Queues a packet on the lane its class selects, waiting for room if the lane is full.
    pub async fn enqueue(&self, packet: Packet, class: PacketClass) -> ForwardResult<()> {
        let (tx, flow_id) = match class {
            PacketClass::Chunked(flow_id) => (&self.chunked_tx, flow_id),
            PacketClass::Normal => (&self.normal_tx, None),
        };
        tx.send_async(Dispatch { packet, flow_id })
            .await
            .map_err(|_| ForwardError::QueueClosed)
    }

    pub fn chunked_receiver(&self) -> Receiver<Dispatch> {
        self.chunked_rx.clone()
    }

    pub fn normal_receiver(&self) -> Receiver<Dispatch> {
        self.normal_rx.clone()
    }

    /// Datagrams currently pending as (chunked, normal).
    pub fn depths(&self) -> (usize, usize) {
        (self.chunked_tx.len(), self.normal_tx.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::BufferPool;
    use std::time::Duration;

    fn packet(pool: &std::sync::Arc<BufferPool>, data: &[u8]) -> Packet {
        let mut pkt = pool.acquire();
        pkt.buf_mut()[..data.len()].copy_from_slice(data);
        pkt.set_len(data.len());
        pkt
    }

    #[tokio::test]
    async fn test_enqueue_selects_lane() {
        let pool = BufferPool::new(32, 8);
        let queues = DispatchQueues::new(4, 4);

        queues
            .enqueue(packet(&pool, b"chunk"), PacketClass::Chunked(Some([1; 8])))
            .await
            .unwrap();
        queues.enqueue(packet(&pool, b"plain"), PacketClass::Normal).await.unwrap();
        assert_eq!(queues.depths(), (1, 1));

        let d = queues.chunked_receiver().recv_async().await.unwrap();
        assert_eq!(d.packet.as_slice(), b"chunk");
        assert_eq!(d.flow_id, Some([1; 8]));

        let d = queues.normal_receiver().recv_async().await.unwrap();
        assert_eq!(d.packet.as_slice(), b"plain");
        assert_eq!(d.flow_id, None);
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let pool = BufferPool::new(8, 8);
        let queues = DispatchQueues::new(8, 8);
        for i in 0..5u8 {
            queues.enqueue(packet(&pool, &[i]), PacketClass::Chunked(None)).await.unwrap();
        }
        let rx = queues.chunked_receiver();
        for i in 0..5u8 {
            assert_eq!(rx.recv_async().await.unwrap().packet.as_slice(), &[i]);
        }
    }

    #[tokio::test]
    async fn test_full_lane_blocks() {
        let pool = BufferPool::new(8, 8);
        let queues = DispatchQueues::new(1, 1);
        queues.enqueue(packet(&pool, b"a"), PacketClass::Normal).await.unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            queues.enqueue(packet(&pool, b"b"), PacketClass::Normal),
        )
        .await;
        assert!(blocked.is_err(), "enqueue on a full lane should wait");

        // The other lane is independent.
        queues.enqueue(packet(&pool, b"c"), PacketClass::Chunked(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_queue_releases_packets() {
        let pool = BufferPool::new(8, 8);
        let queues = DispatchQueues::new(4, 4);
        queues.enqueue(packet(&pool, b"x"), PacketClass::Normal).await.unwrap();
        assert_eq!(pool.idle(), 0);
        drop(queues);
        assert_eq!(pool.idle(), 1);
    }
}
