use anyhow::{Context as _, Result};
use socket2::{Domain, Socket, Type};
use std::net::SocketAddr;

/// Creates the non-blocking underlay socket, bound to `addr` and pinned to
/// the physical interface.
pub fn udp(addr: SocketAddr, interface: &str) -> Result<mio::net::UdpSocket> {
    let domain = match addr {
        SocketAddr::V4(_) => Domain::IPV4,
        SocketAddr::V6(_) => Domain::IPV6,
    };

    let socket = Socket::new(domain, Type::DGRAM, None).context("Failed to create UDP socket")?;

    // Note: for AF_INET sockets IPV6_V6ONLY is not a valid flag.
    if addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    socket.set_nonblocking(true)?;
    socket
        .bind(&addr.into())
        .with_context(|| format!("Failed to bind UDP socket to {addr}"))?;
    socket
        .bind_device(Some(interface.as_bytes()))
        .with_context(|| format!("Failed to bind UDP socket to interface '{interface}'"))?;

    Ok(mio::net::UdpSocket::from_std(socket.into()))
}
