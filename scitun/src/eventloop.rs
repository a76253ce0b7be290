//! The single-threaded readiness loop multiplexing the TUN device and the
//! underlay socket.
//!
//! Readiness is edge-triggered, so each event drains its descriptor until
//! `WouldBlock`. There is no buffering between the two sides: a packet that
//! cannot be translated or written immediately is dropped with a diagnostic
//! and the loop moves on.

use crate::translate;
use anyhow::{Context as _, Result};
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use scion_packet::{Ipv6Packet, ScionPacket};
use sciond_client::{DaemonClient, PathCache};
use std::io;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::os::fd::AsRawFd as _;
use std::sync::atomic::{AtomicBool, Ordering};
use tun::Tun;

const TUN_TOKEN: Token = Token(0);
const UDP_TOKEN: Token = Token(1);

const TUN_BUF_SIZE: usize = 2028;
const UDP_BUF_SIZE: usize = 2048;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub struct Eventloop {
    poll: Poll,
    tun: Tun,
    socket: mio::net::UdpSocket,
    cache: PathCache<DaemonClient>,
    host_ip: IpAddr,
    host_port: u16,
    tun_ip: Ipv6Addr,
}

impl Eventloop {
    pub fn new(
        tun: Tun,
        mut socket: mio::net::UdpSocket,
        cache: PathCache<DaemonClient>,
        host_ip: IpAddr,
        host_port: u16,
        tun_ip: Ipv6Addr,
    ) -> Result<Self> {
        let poll = Poll::new().context("Failed to create poll instance")?;

        let tun_fd = tun.as_raw_fd();
        poll.registry()
            .register(&mut SourceFd(&tun_fd), TUN_TOKEN, Interest::READABLE)
            .context("Failed to register TUN device")?;
        poll.registry()
            .register(&mut socket, UDP_TOKEN, Interest::READABLE)
            .context("Failed to register UDP socket")?;

        Ok(Self {
            poll,
            tun,
            socket,
            cache,
            host_ip,
            host_port,
            tun_ip,
        })
    }

    /// Runs until SIGINT. One packet is processed to completion before the
    /// next readiness event is looked at.
    pub fn run(&mut self) -> Result<()> {
        let handler = on_sigint as extern "C" fn(libc::c_int);
        // Safety: The handler only touches an atomic.
        unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };

        let mut events = Events::with_capacity(16);

        loop {
            match self.poll.poll(&mut events, None) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    if INTERRUPTED.load(Ordering::SeqCst) {
                        tracing::info!("Exiting");

                        return Ok(());
                    }

                    continue;
                }
                Err(e) => return Err(e).context("Failed to poll for readiness"),
            }

            for event in events.iter() {
                match event.token() {
                    TUN_TOKEN => self.tun_readable(),
                    UDP_TOKEN => self.udp_readable(),
                    Token(token) => unreachable!("unknown token {token}"),
                }
            }
        }
    }

    fn tun_readable(&mut self) {
        let mut buf = [0u8; TUN_BUF_SIZE];

        loop {
            let frame = match self.tun.read(&mut buf) {
                Ok(frame) => frame,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    tracing::warn!("Failed to read from TUN device: {e}");
                    return;
                }
            };

            if frame.truncated() {
                tracing::warn!("Packet truncated by the kernel, processing anyway");
            }

            if frame.ethertype != tun::ETH_P_IPV6 {
                tracing::debug!(
                    "Dropping non-IPv6 tunnel frame (ethertype {:#06x})",
                    frame.ethertype
                );
                continue;
            }

            let pkt = match Ipv6Packet::new(frame.packet.to_vec()) {
                Ok(pkt) => pkt,
                Err(e) => {
                    tracing::debug!("Dropping malformed tunnel packet: {e:#}");
                    continue;
                }
            };

            self.handle_egress(pkt);
        }
    }

    fn handle_egress(&mut self, pkt: Ipv6Packet) {
        let dst = pkt.destination();

        let translated =
            translate::translate_egress(&pkt, self.host_ip, self.host_port, &mut self.cache);
        let (scion, next_hop) = match translated {
            Ok(translated) => translated,
            Err(e) => {
                tracing::debug!(%dst, "Dropping egress packet: {e}");
                return;
            }
        };

        let datagram = match scion.serialize() {
            Ok(datagram) => datagram,
            Err(e) => {
                tracing::debug!(%dst, "Dropping egress packet: {e}");
                return;
            }
        };

        match self.socket.send_to(&datagram, next_hop) {
            Ok(len) => tracing::trace!(%next_hop, %len, "Sent SCION packet"),
            // A full socket buffer is a drop, there is no queue.
            Err(e) => tracing::debug!(%next_hop, "Failed to send SCION packet: {e}"),
        }
    }

    fn udp_readable(&mut self) {
        let mut buf = [0u8; UDP_BUF_SIZE];

        loop {
            let (len, from) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    tracing::warn!("Failed to receive from UDP socket: {e}");
                    return;
                }
            };

            let pkt = match ScionPacket::parse(&buf[..len]) {
                Ok(pkt) => pkt,
                Err(e) => {
                    tracing::debug!(%from, "Dropping datagram: {e}");
                    continue;
                }
            };

            self.handle_ingress(pkt, from);
        }
    }

    fn handle_ingress(&mut self, pkt: ScionPacket, from: SocketAddr) {
        let ip = match translate::translate_ingress(&pkt, self.tun_ip) {
            Ok(ip) => ip,
            Err(e) => {
                tracing::debug!(%from, "Dropping ingress packet: {e}");
                return;
            }
        };

        match self.tun.write(tun::ETH_P_IPV6, ip.packet()) {
            Ok(len) => tracing::trace!(src = %ip.source(), %len, "Wrote packet to TUN device"),
            // A short or blocked write is a drop as well.
            Err(e) => tracing::debug!("Failed to write to TUN device: {e}"),
        }
    }
}
