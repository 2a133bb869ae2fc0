use clap::Parser;

use crate::constants::{
    CHUNKED_QUEUE_CAPACITY, DEFAULT_FORWARD_ADDRS, DEFAULT_LOCAL_ADDR, LISTEN_RECV_BUFFER_SIZE,
    MAX_DATAGRAM_SIZE, MAX_IDLE_BUFFERS, NORMAL_QUEUE_CAPACITY, NORMAL_WORKERS,
};

/// Operating parameters of the forwarder. `Default` gives the compiled-in values.
#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    /// Buffer size, and the largest datagram forwarded untruncated.
    pub max_datagram_size: usize,
    pub chunked_queue_capacity: usize,
    pub normal_queue_capacity: usize,
    pub normal_workers: usize,
    pub max_idle_buffers: usize,
    /// Fixed seed for random routing. Wall clock when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            max_datagram_size: MAX_DATAGRAM_SIZE,
            chunked_queue_capacity: CHUNKED_QUEUE_CAPACITY,
            normal_queue_capacity: NORMAL_QUEUE_CAPACITY,
            normal_workers: NORMAL_WORKERS,
            max_idle_buffers: MAX_IDLE_BUFFERS,
            rng_seed: None,
        }
    }
}

/// UDP load balancer with sticky routing for chunked flows
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Local address to listen on.
    #[arg(long, default_value = DEFAULT_LOCAL_ADDR)]
    pub local: String,

    /// Comma separated backend addresses.
    #[arg(long, default_value = DEFAULT_FORWARD_ADDRS)]
    pub forward: String,

    /// Kernel receive buffer for the listening socket, in bytes.
    #[arg(long, default_value_t = LISTEN_RECV_BUFFER_SIZE)]
    pub recv_buffer: usize,
}
