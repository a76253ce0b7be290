//! Wire codecs for the translator: the SCION header, SCMP echo messages and
//! a thin owned wrapper around native IPv6 packets.
//!
//! IPv6, UDP, TCP and ICMPv6 parsing is delegated to [`etherparse`]; SCION and
//! SCMP are hand-rolled big-endian codecs. Checksum discipline lives in
//! [`Ipv6Packet::update_checksum`]: the kernel does not fix L4 checksums on
//! tunnel writes, so every packet injected into the TUN device carries
//! freshly computed ones.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod make;

mod ipv6;
mod scion;
pub mod scmp;

pub use etherparse::*;
pub use ipv6::Ipv6Packet;
pub use scion::{
    EncodeError, HostAddr, ParseError, ScionPacket, NEXT_HEADER_SCMP, NEXT_HEADER_TCP,
    NEXT_HEADER_UDP,
};
pub use scmp::ScmpMessage;
