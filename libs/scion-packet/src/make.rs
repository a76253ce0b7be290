//! Factory module for making all kinds of packets.

use crate::Ipv6Packet;
use anyhow::{Context as _, Result};
use etherparse::{IpNumber, Ipv6FlowLabel, Ipv6Header, PacketBuilder};
use std::net::Ipv6Addr;

/// Builds an IPv6 packet around an already serialized L4 payload.
///
/// Checksums are left untouched; call [`Ipv6Packet::update_checksum`] before
/// handing the packet to the kernel.
pub fn ipv6_packet(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    next_header: IpNumber,
    l4: &[u8],
) -> Result<Ipv6Packet> {
    let payload_length = u16::try_from(l4.len()).context("L4 payload too large")?;

    let header = Ipv6Header {
        traffic_class: 0,
        flow_label: Ipv6FlowLabel::ZERO,
        payload_length,
        next_header,
        hop_limit: 64,
        source: src.octets(),
        destination: dst.octets(),
    };

    let mut buf = Vec::with_capacity(Ipv6Header::LEN + l4.len());
    header.write(&mut buf)?;
    buf.extend_from_slice(l4);

    Ipv6Packet::new(buf)
}

pub fn udp_packet(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    sport: u16,
    dport: u16,
    payload: &[u8],
) -> Result<Ipv6Packet> {
    let builder = PacketBuilder::ipv6(src.octets(), dst.octets(), 64).udp(sport, dport);

    let mut buf = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut buf, payload)?;

    Ipv6Packet::new(buf)
}

pub fn tcp_packet(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    sport: u16,
    dport: u16,
    payload: &[u8],
) -> Result<Ipv6Packet> {
    let builder = PacketBuilder::ipv6(src.octets(), dst.octets(), 64).tcp(sport, dport, 0, 128);

    let mut buf = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut buf, payload)?;

    Ipv6Packet::new(buf)
}

pub fn icmpv6_echo_request(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    id: u16,
    seq: u16,
    payload: &[u8],
) -> Result<Ipv6Packet> {
    let builder = PacketBuilder::ipv6(src.octets(), dst.octets(), 64).icmpv6_echo_request(id, seq);

    let mut buf = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut buf, payload)?;

    Ipv6Packet::new(buf)
}

pub fn icmpv6_echo_reply(
    src: Ipv6Addr,
    dst: Ipv6Addr,
    id: u16,
    seq: u16,
    payload: &[u8],
) -> Result<Ipv6Packet> {
    let builder = PacketBuilder::ipv6(src.octets(), dst.octets(), 64).icmpv6_echo_reply(id, seq);

    let mut buf = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut buf, payload)?;

    Ipv6Packet::new(buf)
}
