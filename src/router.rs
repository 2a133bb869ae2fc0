//! Backend selection.
//!
//! Datagrams with a flow id go to `id[7] % N`. Everything else is spread
//! uniformly at random. The modulo scheme remaps most flows if N changes,
//! which is fine while the backend set is fixed for the process lifetime.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::{Backend, BackendSet};
use crate::classify::FlowId;

pub struct Router {
    rng: Mutex<StdRng>,
}

impl Router {
    /// Seeds the random generator from the wall clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Index of the backend for a datagram, given `n > 0` backends.
    pub fn pick_index(&self, n: usize, flow_id: Option<&FlowId>) -> usize {
        debug_assert!(n > 0);
        match flow_id.and_then(|id| id.last()) {
            Some(&last) => last as usize % n,
            None => self.rng.lock().gen_range(0..n),
        }
    }

    pub fn pick<'a>(&self, backends: &'a BackendSet, flow_id: Option<&FlowId>) -> &'a Backend {
        &backends[self.pick_index(backends.len(), flow_id)]
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
