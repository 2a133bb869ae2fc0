//! Connected backend sockets.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ops::Index;

use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::error::{ForwardError, ForwardResult};
use crate::socket::resolve_addr;

/// A backend destination and its connected outbound socket.
#[derive(Debug)]
pub struct Backend {
    addr: SocketAddr,
    socket: UdpSocket,
}

impl Backend {
    /// Binds an ephemeral socket of the same family as `addr` and connects it.
    pub async fn connect(addr: SocketAddr) -> ForwardResult<Self> {
        let bind_addr: SocketAddr = match addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| ForwardError::Bind { address: bind_addr, source })?;
        socket
            .connect(addr)
            .await
            .map_err(|source| ForwardError::Connect { address: addr, source })?;
        debug!(backend = %addr, "backend socket connected");
        Ok(Self { addr, socket })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Sends one datagram verbatim.
    pub async fn send(&self, datagram: &[u8]) -> std::io::Result<usize> {
        self.socket.send(datagram).await
    }
}

/// Ordered, immutable set of backends. Never empty.
#[derive(Debug)]
pub struct BackendSet {
    backends: Vec<Backend>,
}

impl BackendSet {
    pub fn new(backends: Vec<Backend>) -> ForwardResult<Self> {
        if backends.is_empty() {
            return Err(ForwardError::NoBackends);
        }
        Ok(Self { backends })
    }

    /// Resolves and connects every address in order. The first failure aborts.
    pub async fn connect<S: AsRef<str>>(addrs: &[S]) -> ForwardResult<Self> {
        let mut backends = Vec::with_capacity(addrs.len());
        for addr in addrs {
            let resolved = resolve_addr(addr.as_ref()).await?;
            backends.push(Backend::connect(resolved).await?);
        }
        let set = Self::new(backends)?;
        info!(backends = ?set.addrs(), "backend set ready");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Backend> {
        self.backends.get(index)
    }

    pub fn addrs(&self) -> Vec<SocketAddr> {
        self.backends.iter().map(Backend::addr).collect()
    }
}

impl Index<usize> for BackendSet {
    type Output = Backend;

    fn index(&self, index: usize) -> &Backend {
        &self.backends[index]
    }
}

/// Splits a comma separated backend list, trimming entries and skipping empty ones.
pub fn parse_backend_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
