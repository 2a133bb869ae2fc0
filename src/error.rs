//! Forwarder error types.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while setting up or running the forwarder.
///
/// Everything except `QueueClosed` is a startup error. Runtime receive and
/// send failures are logged and never surface as values.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The address string could not be resolved.
    #[error("failed to resolve '{address}': {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution succeeded but produced no socket address.
    #[error("'{address}' did not resolve to any socket address")]
    Unresolved { address: String },

    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to backend {address}: {source}")]
    Connect {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The backend list was empty.
    #[error("empty forward backend list")]
    NoBackends,

    /// The dispatch queue has no remaining workers.
    #[error("dispatch queue closed")]
    QueueClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ForwardResult<T> = Result<T, ForwardError>;
