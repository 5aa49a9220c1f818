// Listener module
// Resolves listen addresses and binds TCP listeners

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServerError;

/// Resolve `addr` to a socket address
///
/// Accepts `host:port`, bare `:port` (all interfaces) and resolvable host names.
pub async fn resolve_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };

    if let Ok(parsed) = full.parse::<SocketAddr>() {
        return Ok(parsed);
    }

    let invalid = |reason: String| ServerError::InvalidAddress {
        addr: addr.to_string(),
        reason,
    };
    let found = tokio::net::lookup_host(&full)
        .await
        .map_err(|e| invalid(e.to_string()))?
        .next();
    found.ok_or_else(|| invalid("no addresses found".to_string()))
}

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// # Arguments
///
/// * `addr` - The socket address to bind to
pub fn bind_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Allows rebinding a port still in TIME_WAIT after a restart
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_forms() {
        assert_eq!(
            resolve_addr(":16000").await.unwrap(),
            "0.0.0.0:16000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve_addr("127.0.0.1:8080").await.unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            resolve_addr("not an address").await,
            Err(ServerError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_host_name() {
        let addr = resolve_addr("localhost:8080").await.unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
