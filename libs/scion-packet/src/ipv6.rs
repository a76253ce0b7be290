use anyhow::{Context as _, Result};
use etherparse::{
    Icmpv6Slice, IpNumber, Ipv6Header, Ipv6HeaderSlice, Ipv6Slice, TcpSlice, UdpSlice,
};
use std::net::Ipv6Addr;

// Checksum field offsets within the respective L4 header.
const UDP_CHECKSUM_OFFSET: usize = 6;
const TCP_CHECKSUM_OFFSET: usize = 16;
const ICMPV6_CHECKSUM_OFFSET: usize = 2;

/// An owned, validated IPv6 packet.
///
/// Extension headers are not interpreted; a packet whose next header is not
/// directly TCP, UDP or ICMPv6 simply answers `None` for all L4 accessors and
/// gets dropped by the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv6Packet {
    buf: Vec<u8>,
}

impl Ipv6Packet {
    pub fn new(buf: Vec<u8>) -> Result<Self> {
        Ipv6Slice::from_slice(&buf).context("Invalid IPv6 packet")?;

        Ok(Self { buf })
    }

    fn header(&self) -> Ipv6HeaderSlice<'_> {
        Ipv6HeaderSlice::from_slice(&self.buf).expect("validated in `new`")
    }

    pub fn to_header(&self) -> Ipv6Header {
        self.header().to_header()
    }

    pub fn source(&self) -> Ipv6Addr {
        self.header().source_addr()
    }

    pub fn destination(&self) -> Ipv6Addr {
        self.header().destination_addr()
    }

    pub fn next_header(&self) -> IpNumber {
        self.header().next_header()
    }

    pub fn payload(&self) -> &[u8] {
        let len = usize::from(self.header().payload_length());

        &self.buf[Ipv6Header::LEN..Ipv6Header::LEN + len]
    }

    pub fn as_udp(&self) -> Option<UdpSlice<'_>> {
        if self.next_header() != IpNumber::UDP {
            return None;
        }

        UdpSlice::from_slice(self.payload()).ok()
    }

    pub fn as_tcp(&self) -> Option<TcpSlice<'_>> {
        if self.next_header() != IpNumber::TCP {
            return None;
        }

        TcpSlice::from_slice(self.payload()).ok()
    }

    pub fn as_icmpv6(&self) -> Option<Icmpv6Slice<'_>> {
        if self.next_header() != IpNumber::IPV6_ICMP {
            return None;
        }

        Icmpv6Slice::from_slice(self.payload()).ok()
    }

    /// Recomputes the L4 checksum against the packet's current addresses.
    #[inline]
    pub fn update_checksum(&mut self) {
        // Note: IPv6 itself doesn't have a checksum.
        self.set_udp_checksum();
        self.set_tcp_checksum();
        self.set_icmpv6_checksum();
    }

    fn set_udp_checksum(&mut self) {
        let Some(udp) = self.as_udp() else {
            return;
        };

        let checksum = udp
            .to_header()
            .calc_checksum_ipv6(&self.header().to_header(), udp.payload())
            .expect("payload length was validated on construction");

        self.write_l4(UDP_CHECKSUM_OFFSET, checksum);
    }

    fn set_tcp_checksum(&mut self) {
        let Some(tcp) = self.as_tcp() else {
            return;
        };

        let checksum = tcp
            .to_header()
            .calc_checksum_ipv6(&self.header().to_header(), tcp.payload())
            .expect("payload length was validated on construction");

        self.write_l4(TCP_CHECKSUM_OFFSET, checksum);
    }

    fn set_icmpv6_checksum(&mut self) {
        let Some(icmp) = self.as_icmpv6() else {
            return;
        };

        let checksum = icmp
            .icmp_type()
            .calc_checksum(
                self.source().octets(),
                self.destination().octets(),
                icmp.payload(),
            )
            .expect("payload came from a valid packet");

        self.write_l4(ICMPV6_CHECKSUM_OFFSET, checksum);
    }

    fn write_l4(&mut self, offset: usize, value: u16) {
        let start = Ipv6Header::LEN + offset;

        self.buf[start..start + 2].copy_from_slice(&value.to_be_bytes());
    }

    pub fn packet(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
