/// Largest datagram forwarded verbatim. Anything longer is truncated by the kernel on read.
/// Kept below the usual 1500 byte path MTU minus IP/UDP headers.
pub const MAX_DATAGRAM_SIZE: usize = 1420;

/// Queue depth for marker-bearing (chunked) datagrams.
pub const CHUNKED_QUEUE_CAPACITY: usize = 1024;

/// Queue depth for everything else.
pub const NORMAL_QUEUE_CAPACITY: usize = 10240;

/// Number of tasks draining the normal queue.
pub const NORMAL_WORKERS: usize = 10;

/// Idle buffers kept by the pool. Buffers released beyond this are freed.
/// Sized above the sum of both queue depths so a full backlog recycles cleanly.
pub const MAX_IDLE_BUFFERS: usize = 16384;

/// Kernel receive buffer requested for the listening socket (50MB).
pub const LISTEN_RECV_BUFFER_SIZE: usize = 50 * 1024 * 1024;

/// First two bytes of a chunked datagram.
pub const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

/// Length of the flow identifier that follows the magic.
pub const FLOW_ID_LEN: usize = 8;

/// Minimum datagram length that carries a full flow identifier.
pub const CHUNK_HEADER_LEN: usize = CHUNK_MAGIC.len() + FLOW_ID_LEN;

pub const DEFAULT_LOCAL_ADDR: &str = "0.0.0.0:12201";

pub const DEFAULT_FORWARD_ADDRS: &str = "127.0.0.1:5000,127.0.0.1:6000";
