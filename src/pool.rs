//! Reusable datagram buffers.
//!
//! A [`Packet`] borrows its buffer from a [`BufferPool`] and hands it back on
//! drop, so every path out of the receive/forward pipeline (sent, send error,
//! read error, queue torn down) recycles the buffer exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use crossbeam_queue::ArrayQueue;

/// Lock-free cache of fixed-size datagram buffers.
///
/// Allocation is unbounded; only the number of idle buffers kept around is capped.
pub struct BufferPool {
    idle: ArrayQueue<BytesMut>,
    buffer_size: usize,
    allocated: AtomicUsize,
}

impl BufferPool {
    pub fn new(buffer_size: usize, max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            idle: ArrayQueue::new(max_idle.max(1)),
            buffer_size,
            allocated: AtomicUsize::new(0),
        })
    }

    /// Takes an idle buffer, or allocates a fresh zeroed one.
    pub fn acquire(self: &Arc<Self>) -> Packet {
        let buf = match self.idle.pop() {
            Some(buf) => buf,
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                BytesMut::zeroed(self.buffer_size)
            }
        };
        Packet {
            buf,
            len: 0,
            pool: Arc::clone(self),
        }
    }

    fn release(&self, buf: BytesMut) {
        if buf.len() != self.buffer_size {
            return;
        }
        // Full cache: let the buffer go.
        let _ = self.idle.push(buf);
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Buffers currently waiting in the cache.
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Buffers allocated since the pool was created.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}

/// A pooled buffer and the length of the datagram it holds.
pub struct Packet {
    buf: BytesMut,
    len: usize,
    pool: Arc<BufferPool>,
}

impl Packet {
    /// The whole buffer, for reading a datagram into.
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    /// Records how many bytes of the buffer hold the datagram.
    ///
    /// # Panics
    /// Panics if `len` exceeds the buffer capacity.
    pub fn set_len(&mut self, len: usize) {
        assert!(len <= self.buf.len(), "packet length {} exceeds buffer {}", len, self.buf.len());
        self.len = len;
    }

    /// The datagram bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Drop for Packet {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(buf);
    }
}

impl std::fmt::Debug for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packet")
            .field("len", &self.len)
            .field("capacity", &self.buf.len())
            .finish()
    }
}
