use scion_addr::IsdAsn;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const NEXT_HEADER_TCP: u8 = 6;
pub const NEXT_HEADER_UDP: u8 = 17;
pub const NEXT_HEADER_SCMP: u8 = 202;

const PATH_TYPE_EMPTY: u8 = 0;
const PATH_TYPE_SCION: u8 = 1;

// Common header (12 bytes) plus both ISD-AS pairs (16 bytes).
const FIXED_HEADER_LEN: usize = 28;

/// A SCION host address, 4 or 16 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAddr {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl HostAddr {
    pub fn ip(&self) -> IpAddr {
        match self {
            HostAddr::V4(ip) => IpAddr::V4(*ip),
            HostAddr::V6(ip) => IpAddr::V6(*ip),
        }
    }

    fn wire_len(&self) -> usize {
        match self {
            HostAddr::V4(_) => 4,
            HostAddr::V6(_) => 16,
        }
    }

    // Address lengths are encoded in 4-byte units minus one.
    fn len_bits(&self) -> u8 {
        match self {
            HostAddr::V4(_) => 0,
            HostAddr::V6(_) => 3,
        }
    }
}

impl From<IpAddr> for HostAddr {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => HostAddr::V4(ip),
            IpAddr::V6(ip) => HostAddr::V6(ip),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("SCION packet too short: {0} bytes")]
    Truncated(usize),
    #[error("unsupported SCION version: {0}")]
    Version(u8),
    #[error("unsupported host address length: {0} bytes")]
    HostAddrLen(usize),
    #[error("inconsistent SCION header length: {0} bytes")]
    HeaderLen(usize),
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("path length {0} is not a multiple of 4")]
    PathAlignment(usize),
    #[error("SCION header of {0} bytes exceeds the wire format")]
    HeaderTooLong(usize),
    #[error("payload of {0} bytes exceeds the wire format")]
    PayloadTooLong(usize),
}

/// A SCION packet: fixed header, host addresses, an opaque path and the L4
/// payload.
///
/// The path is carried verbatim; the translator never interprets it. Host
/// types other than 0 (IP) can be parsed but are rejected during translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScionPacket {
    pub dst_ia: IsdAsn,
    pub src_ia: IsdAsn,
    pub dst_type: u8,
    pub src_type: u8,
    pub dst_host: HostAddr,
    pub src_host: HostAddr,
    pub next_header: u8,
    pub traffic_class: u8,
    pub flow_id: u32,
    pub path: Vec<u8>,
    pub payload: Vec<u8>,
}

impl ScionPacket {
    pub fn parse(buf: &[u8]) -> Result<Self, ParseError> {
        if buf.len() < FIXED_HEADER_LEN {
            return Err(ParseError::Truncated(buf.len()));
        }

        let w0 = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let version = (w0 >> 28) as u8;
        if version != 0 {
            return Err(ParseError::Version(version));
        }
        let traffic_class = (w0 >> 20) as u8;
        let flow_id = w0 & 0xf_ffff;

        let next_header = buf[4];
        let header_len = usize::from(buf[5]) * 4;
        let payload_len = usize::from(u16::from_be_bytes([buf[6], buf[7]]));

        let types = buf[9];
        let dst_type = (types >> 6) & 0x3;
        let dst_len = host_len((types >> 4) & 0x3)?;
        let src_type = (types >> 2) & 0x3;
        let src_len = host_len(types & 0x3)?;

        let dst_ia = IsdAsn::new(
            u16::from_be_bytes([buf[12], buf[13]]),
            read_u48(&buf[14..20]),
        );
        let src_ia = IsdAsn::new(
            u16::from_be_bytes([buf[20], buf[21]]),
            read_u48(&buf[22..28]),
        );

        let addr_end = FIXED_HEADER_LEN + dst_len + src_len;
        if header_len < addr_end {
            return Err(ParseError::HeaderLen(header_len));
        }
        if buf.len() < header_len + payload_len {
            return Err(ParseError::Truncated(buf.len()));
        }

        let dst_host = read_host(&buf[FIXED_HEADER_LEN..FIXED_HEADER_LEN + dst_len]);
        let src_host = read_host(&buf[FIXED_HEADER_LEN + dst_len..addr_end]);

        Ok(Self {
            dst_ia,
            src_ia,
            dst_type,
            src_type,
            dst_host,
            src_host,
            next_header,
            traffic_class,
            flow_id,
            path: buf[addr_end..header_len].to_vec(),
            payload: buf[header_len..header_len + payload_len].to_vec(),
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        if self.path.len() % 4 != 0 {
            return Err(EncodeError::PathAlignment(self.path.len()));
        }

        let header_len =
            FIXED_HEADER_LEN + self.dst_host.wire_len() + self.src_host.wire_len() + self.path.len();
        if header_len / 4 > usize::from(u8::MAX) {
            return Err(EncodeError::HeaderTooLong(header_len));
        }

        let payload_len = u16::try_from(self.payload.len())
            .map_err(|_| EncodeError::PayloadTooLong(self.payload.len()))?;

        let path_type = if self.path.is_empty() {
            PATH_TYPE_EMPTY
        } else {
            PATH_TYPE_SCION
        };

        let mut buf = Vec::with_capacity(header_len + self.payload.len());

        let w0 = (u32::from(self.traffic_class) << 20) | (self.flow_id & 0xf_ffff);
        buf.extend_from_slice(&w0.to_be_bytes());
        buf.push(self.next_header);
        buf.push((header_len / 4) as u8);
        buf.extend_from_slice(&payload_len.to_be_bytes());
        buf.push(path_type);
        buf.push(
            (self.dst_type & 0x3) << 6
                | self.dst_host.len_bits() << 4
                | (self.src_type & 0x3) << 2
                | self.src_host.len_bits(),
        );
        buf.extend_from_slice(&[0, 0]); // Reserved.

        buf.extend_from_slice(&self.dst_ia.isd().to_be_bytes());
        write_u48(&mut buf, self.dst_ia.asn());
        buf.extend_from_slice(&self.src_ia.isd().to_be_bytes());
        write_u48(&mut buf, self.src_ia.asn());

        write_host(&mut buf, self.dst_host);
        write_host(&mut buf, self.src_host);

        buf.extend_from_slice(&self.path);
        buf.extend_from_slice(&self.payload);

        Ok(buf)
    }
}

fn host_len(len_bits: u8) -> Result<usize, ParseError> {
    match usize::from(len_bits + 1) * 4 {
        len @ (4 | 16) => Ok(len),
        len => Err(ParseError::HostAddrLen(len)),
    }
}

fn read_host(bytes: &[u8]) -> HostAddr {
    match *bytes {
        [a, b, c, d] => HostAddr::V4(Ipv4Addr::new(a, b, c, d)),
        _ => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            HostAddr::V6(Ipv6Addr::from(octets))
        }
    }
}

fn write_host(buf: &mut Vec<u8>, host: HostAddr) {
    match host {
        HostAddr::V4(ip) => buf.extend_from_slice(&ip.octets()),
        HostAddr::V6(ip) => buf.extend_from_slice(&ip.octets()),
    }
}

fn read_u48(bytes: &[u8]) -> u64 {
    let mut value = 0u64;
    for byte in bytes {
        value = (value << 8) | u64::from(*byte);
    }
    value
}

fn write_u48(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes()[2..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn udp_packet() -> ScionPacket {
        ScionPacket {
            dst_ia: IsdAsn::new(1, 0xff00_0000_0110),
            src_ia: IsdAsn::new(1, 0xff00_0000_0111),
            dst_type: 0,
            src_type: 0,
            dst_host: HostAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            src_host: HostAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
            next_header: NEXT_HEADER_UDP,
            traffic_class: 0,
            flow_id: 1,
            path: Vec::new(),
            payload: b"hi".to_vec(),
        }
    }

    #[test]
    fn serializes_empty_path_packet() {
        let wire = udp_packet().serialize().unwrap();

        assert_eq!(
            wire,
            hex!(
                "00000001 11090002 00000000"
                "0001ff0000000110 0001ff0000000111"
                "0a000002 0a000001"
                "6869"
            )
        );
    }

    #[test]
    fn parse_inverts_serialize() {
        let packet = udp_packet();

        assert_eq!(ScionPacket::parse(&packet.serialize().unwrap()).unwrap(), packet);
    }

    #[test]
    fn round_trips_with_path_and_v6_host() {
        let packet = ScionPacket {
            dst_host: HostAddr::V6("fc00:1001:1000::1".parse().unwrap()),
            path: hex!("0102030405060708").to_vec(),
            ..udp_packet()
        };

        let wire = packet.serialize().unwrap();

        // 28 bytes fixed + 16 + 4 host + 8 path.
        assert_eq!(wire[5], 14);
        assert_eq!(wire[8], 1); // SCION path type.
        assert_eq!(ScionPacket::parse(&wire).unwrap(), packet);
    }

    #[test]
    fn rejects_bad_version() {
        let mut wire = udp_packet().serialize().unwrap();
        wire[0] |= 0x10;

        assert_eq!(ScionPacket::parse(&wire), Err(ParseError::Version(1)));
    }

    #[test]
    fn rejects_truncated_packet() {
        let wire = udp_packet().serialize().unwrap();

        assert_eq!(
            ScionPacket::parse(&wire[..wire.len() - 1]),
            Err(ParseError::Truncated(wire.len() - 1))
        );
        assert_eq!(ScionPacket::parse(&[0; 8]), Err(ParseError::Truncated(8)));
    }

    #[test]
    fn rejects_unsupported_host_length() {
        let mut wire = udp_packet().serialize().unwrap();
        wire[9] = 0x10; // 8-byte destination host.

        assert_eq!(ScionPacket::parse(&wire), Err(ParseError::HostAddrLen(8)));
    }

    #[test]
    fn rejects_unaligned_path() {
        let packet = ScionPacket {
            path: vec![1, 2, 3],
            ..udp_packet()
        };

        assert_eq!(packet.serialize(), Err(EncodeError::PathAlignment(3)));
    }
}
