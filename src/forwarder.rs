//! Top-level context: owns the pool, the dispatch lanes, the backends and the
//! router, and runs the listener and workers on a `JoinSet`.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::backend::BackendSet;
use crate::config::ForwarderConfig;
use crate::listener::Listener;
use crate::pool::BufferPool;
use crate::queue::DispatchQueues;
use crate::router::Router;
use crate::worker::{Lane, Worker};

pub struct Forwarder {
    config: ForwarderConfig,
    pool: Arc<BufferPool>,
    queues: DispatchQueues,
    backends: Arc<BackendSet>,
    router: Arc<Router>,
}

impl Forwarder {
    pub fn new(config: ForwarderConfig, backends: BackendSet) -> Self {
        let pool = BufferPool::new(config.max_datagram_size, config.max_idle_buffers);
        let queues = DispatchQueues::new(config.chunked_queue_capacity, config.normal_queue_capacity);
        let router = match config.rng_seed {
            Some(seed) => Router::with_seed(seed),
            None => Router::new(),
        };
        Self {
            config,
            pool,
            queues,
            backends: Arc::new(backends),
            router: Arc::new(router),
        }
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    pub fn backends(&self) -> &Arc<BackendSet> {
        &self.backends
    }

    /// Starts the listener on `socket`, one chunked worker and the normal workers.
    pub fn spawn(self, socket: UdpSocket) -> std::io::Result<ForwarderHandle> {
        let local_addr = socket.local_addr()?;
        let shutdown = CancellationToken::new();
        let mut tasks = JoinSet::new();

        // A single chunked worker keeps chunked datagrams in receive order.
        let chunked = Worker::new(
            0,
            Lane::Chunked,
            self.queues.chunked_receiver(),
            Arc::clone(&self.backends),
            Arc::clone(&self.router),
        );
        tasks.spawn(chunked.run(shutdown.child_token()));

        for id in 0..self.config.normal_workers.max(1) {
            let worker = Worker::new(
                id,
                Lane::Normal,
                self.queues.normal_receiver(),
                Arc::clone(&self.backends),
                Arc::clone(&self.router),
            );
            tasks.spawn(worker.run(shutdown.child_token()));
        }

        let listener = Listener::new(socket, Arc::clone(&self.pool), self.queues.clone());
        tasks.spawn(listener.run(shutdown.child_token()));

        info!(
            "listen {} and forward to {:?} ({} normal workers)",
            local_addr,
            self.backends.addrs(),
            self.config.normal_workers.max(1)
        );

        Ok(ForwarderHandle {
            local_addr,
            shutdown,
            tasks,
            pool: self.pool,
        })
    }
}

/// Running forwarder tasks.
pub struct ForwarderHandle {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    tasks: JoinSet<()>,
    pool: Arc<BufferPool>,
}

impl ForwarderHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Token that stops every task when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancels all tasks and waits for them to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        self.wait().await;
    }

    /// Waits until every task has finished.
    pub async fn wait(mut self) {
        while let Some(res) = self.tasks.join_next().await {
            if let Err(e) = res {
                error!("Forwarder task failed: {}", e);
            }
        }
    }
}
