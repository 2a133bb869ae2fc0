//! udplb - a UDP datagram load balancer.
//!
//! Chunked datagrams (magic `0x1e 0x0f` followed by an 8 byte flow id) stick to
//! one backend per flow; everything else is spread at random.

pub mod backend;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod forwarder;
pub mod listener;
pub mod pool;
pub mod queue;
pub mod router;
pub mod socket;
pub mod worker;

pub use backend::{Backend, BackendSet};
pub use config::ForwarderConfig;
pub use error::{ForwardError, ForwardResult};
pub use forwarder::{Forwarder, ForwarderHandle};
pub use pool::{BufferPool, Packet};
