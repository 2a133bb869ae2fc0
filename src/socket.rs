//! Listening socket setup.

use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{lookup_host, UdpSocket};
use tracing::{info, warn};

use crate::error::{ForwardError, ForwardResult};

/// Resolves `host:port` to its first socket address.
pub async fn resolve_addr(address: &str) -> ForwardResult<SocketAddr> {
    let mut addrs = lookup_host(address).await.map_err(|source| ForwardError::Resolve {
        address: address.to_string(),
        source,
    })?;
    addrs.next().ok_or_else(|| ForwardError::Unresolved {
        address: address.to_string(),
    })
}

/// Binds the listening socket with an enlarged kernel receive buffer.
///
/// Failing to grow the receive buffer is not fatal; the kernel may clamp it
/// (see `net.core.rmem_max`).
pub fn bind_listener(addr: SocketAddr, recv_buffer_size: usize) -> ForwardResult<UdpSocket> {
    let bind_err = |source: std::io::Error| ForwardError::Bind { address: addr, source };

    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
        .map_err(bind_err)?;
    if let Err(e) = socket.set_recv_buffer_size(recv_buffer_size) {
        warn!("Failed to set receive buffer to {} bytes: {}", recv_buffer_size, e);
    }
    socket.bind(&addr.into()).map_err(bind_err)?;
    socket.set_nonblocking(true).map_err(bind_err)?;

    let socket = UdpSocket::from_std(socket.into()).map_err(bind_err)?;
    let local = socket.local_addr().map_err(bind_err)?;
    info!(
        address = %local,
        recv_buffer = socket2::SockRef::from(&socket).recv_buffer_size().unwrap_or(0),
        "listening socket bound"
    );
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_literal() {
        let addr = resolve_addr("127.0.0.1:12201").await.unwrap();
        assert_eq!(addr, "127.0.0.1:12201".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_missing_port() {
        assert!(matches!(
            resolve_addr("127.0.0.1").await,
            Err(ForwardError::Resolve { .. })
        ));
    }

    #[tokio::test]
    async fn test_bind_listener_receives() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap(), 1024 * 1024).unwrap();
        let addr = listener.local_addr().unwrap();

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(b"hello", addr).await.unwrap();

        let mut buf = [0u8; 16];
        let (n, from) = listener.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(from, client.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_bind_listener_conflict() {
        let first = bind_listener("127.0.0.1:0".parse().unwrap(), 4096).unwrap();
        let taken = first.local_addr().unwrap();
        assert!(matches!(
            bind_listener(taken, 4096),
            Err(ForwardError::Bind { .. })
        ));
    }
}
