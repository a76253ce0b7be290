//! The packet rewriter between native IPv6 and SCION.
//!
//! Both directions are pure apart from the path-cache lookup on egress. All
//! failure modes surface as [`TranslateError`]; the event loop turns them
//! into per-packet drops.

use scion_addr::{IsdAsn, MappedHost};
use scion_packet::{
    make, scmp, HostAddr, Icmpv6Header, Icmpv6Slice, Icmpv6Type, IpNumber, Ipv6Packet,
    ScionPacket, ScmpMessage, NEXT_HEADER_SCMP, NEXT_HEADER_TCP, NEXT_HEADER_UDP,
};
use sciond_client::{PathCache, RpcError, Sciond};
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    NotMapped(#[from] scion_addr::NotMapped),
    #[error("source address outside the SCION-mapped prefix: {0}")]
    SourceNotMapped(Ipv6Addr),
    #[error("no path to {0}")]
    NoPath(IsdAsn),
    #[error("path to {0} names no first-hop router")]
    MissingNextHop(IsdAsn),
    #[error("unsupported L4 protocol: {0}")]
    UnsupportedProtocol(u8),
    #[error("unsupported ICMPv6 type: {0:?}")]
    UnsupportedIcmpv6Type(Icmpv6Type),
    #[error(transparent)]
    UnsupportedScmp(#[from] scmp::Error),
    #[error("unsupported host address type: {0}")]
    UnsupportedHostType(u8),
    #[error("destination {0} is not the tunnel address")]
    WrongDestination(Ipv6Addr),
    #[error("next hop {next_hop} does not match the address family of the underlay socket on {underlay}")]
    AddressFamilyMismatch {
        next_hop: SocketAddr,
        underlay: IpAddr,
    },
    #[error(transparent)]
    Encode(#[from] scion_addr::EncodeError),
    #[error("daemon lookup failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("malformed packet: {0:#}")]
    Malformed(anyhow::Error),
}

/// Rewrites one IPv6 packet leaving through the tunnel into a SCION packet
/// and the underlay address to send it to.
///
/// An empty path means the destination sits in the local AS; the packet then
/// goes straight to the destination host on the well-known underlay port.
pub fn translate_egress<D: Sciond>(
    pkt: &Ipv6Packet,
    host_ip: IpAddr,
    host_port: u16,
    cache: &mut PathCache<D>,
) -> Result<(ScionPacket, SocketAddr), TranslateError> {
    let dst = pkt.destination();

    let unmapped = scion_addr::unmap(dst)?;
    let dst_ia = unmapped.isd_asn();
    let dst_host = match unmapped.host {
        MappedHost::V4(ip) => HostAddr::V4(ip),
        MappedHost::Interface(_) => HostAddr::V6(dst),
    };

    let entry = cache
        .lookup(dst_ia)?
        .ok_or(TranslateError::NoPath(dst_ia))?
        .clone();

    let (next_header, payload) = match pkt.next_header() {
        IpNumber::TCP => (NEXT_HEADER_TCP, pkt.payload().to_vec()),
        IpNumber::UDP => (NEXT_HEADER_UDP, pkt.payload().to_vec()),
        IpNumber::IPV6_ICMP => {
            let icmp = pkt
                .as_icmpv6()
                .ok_or_else(|| TranslateError::Malformed(anyhow::anyhow!("invalid ICMPv6 payload")))?;

            (NEXT_HEADER_SCMP, icmp_to_scmp(&icmp)?.serialize())
        }
        other => return Err(TranslateError::UnsupportedProtocol(other.0)),
    };

    let next_hop = if entry.raw.is_empty() {
        SocketAddr::new(dst_host.ip(), host_port)
    } else {
        entry
            .next_hop
            .ok_or(TranslateError::MissingNextHop(dst_ia))?
    };

    // The underlay socket is bound to the host address; a next hop of the
    // other family could never be reached through it.
    if next_hop.is_ipv4() != host_ip.is_ipv4() {
        return Err(TranslateError::AddressFamilyMismatch {
            next_hop,
            underlay: host_ip,
        });
    }

    let scion = ScionPacket {
        dst_ia,
        src_ia: cache.local_ia(),
        dst_type: 0,
        src_type: 0,
        dst_host,
        src_host: HostAddr::from(host_ip),
        next_header,
        traffic_class: 0,
        flow_id: 1,
        path: entry.raw,
        payload,
    };

    Ok((scion, next_hop))
}

/// Rewrites one SCION packet received on the underlay into a native IPv6
/// packet addressed to the tunnel.
pub fn translate_ingress(
    pkt: &ScionPacket,
    tun_ip: Ipv6Addr,
) -> Result<Ipv6Packet, TranslateError> {
    if pkt.dst_type != 0 {
        return Err(TranslateError::UnsupportedHostType(pkt.dst_type));
    }

    let dst = match pkt.dst_host {
        HostAddr::V4(ip) => scion_addr::map_v4(pkt.dst_ia.isd(), pkt.dst_ia.asn(), ip)?,
        HostAddr::V6(ip) => ip,
    };

    if dst != tun_ip {
        return Err(TranslateError::WrongDestination(dst));
    }

    if pkt.src_type != 0 {
        return Err(TranslateError::UnsupportedHostType(pkt.src_type));
    }

    let src = match pkt.src_host {
        HostAddr::V4(ip) => scion_addr::map_v4(pkt.src_ia.isd(), pkt.src_ia.asn(), ip)?,
        HostAddr::V6(ip) => {
            if !scion_addr::is_mapped(&ip) {
                return Err(TranslateError::SourceNotMapped(ip));
            }

            ip
        }
    };

    let (next_header, l4) = match pkt.next_header {
        NEXT_HEADER_TCP => (IpNumber::TCP, pkt.payload.clone()),
        NEXT_HEADER_UDP => (IpNumber::UDP, pkt.payload.clone()),
        NEXT_HEADER_SCMP => {
            let message = ScmpMessage::parse(&pkt.payload)?;

            (IpNumber::IPV6_ICMP, scmp_to_icmp(&message))
        }
        other => return Err(TranslateError::UnsupportedProtocol(other)),
    };

    let mut ip =
        make::ipv6_packet(src, dst, next_header, &l4).map_err(TranslateError::Malformed)?;
    // The addresses are new, the kernel will not fix the checksums for us.
    ip.update_checksum();

    Ok(ip)
}

/// Maps an ICMPv6 echo onto the equivalent SCMP echo; identifier, sequence
/// number and data carry over verbatim.
pub fn icmp_to_scmp(icmp: &Icmpv6Slice) -> Result<ScmpMessage, TranslateError> {
    let echo = |header: scion_packet::IcmpEchoHeader| scmp::Echo {
        id: header.id,
        seq: header.seq,
        data: icmp.payload().to_vec(),
    };

    match icmp.icmp_type() {
        Icmpv6Type::EchoRequest(header) => Ok(ScmpMessage::EchoRequest(echo(header))),
        Icmpv6Type::EchoReply(header) => Ok(ScmpMessage::EchoReply(echo(header))),
        other => Err(TranslateError::UnsupportedIcmpv6Type(other)),
    }
}

/// Maps an SCMP echo back onto ICMPv6. The checksum is left zeroed, callers
/// refresh it once the packet has its final addresses.
pub fn scmp_to_icmp(message: &ScmpMessage) -> Vec<u8> {
    let echo = message.echo();
    let header = scion_packet::IcmpEchoHeader {
        id: echo.id,
        seq: echo.seq,
    };

    let icmp_type = match message {
        ScmpMessage::EchoRequest(_) => Icmpv6Type::EchoRequest(header),
        ScmpMessage::EchoReply(_) => Icmpv6Type::EchoReply(header),
    };

    let mut buf = Vec::with_capacity(8 + echo.data.len());
    Icmpv6Header::new(icmp_type)
        .write(&mut buf)
        .expect("writing to a Vec never fails");
    buf.extend_from_slice(&echo.data);

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use sciond_client::PathEntry;
    use std::net::Ipv4Addr;

    const HOST_V4: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const PORT: u16 = 30041;

    struct StubSciond {
        response: Vec<PathEntry>,
    }

    impl Sciond for StubSciond {
        fn local_ia(&self) -> IsdAsn {
            IsdAsn::new(1, 0x111)
        }

        fn paths(&mut self, _: IsdAsn, _: IsdAsn) -> Result<Vec<PathEntry>, RpcError> {
            Ok(self.response.clone())
        }
    }

    fn cache(response: Vec<PathEntry>) -> PathCache<StubSciond> {
        PathCache::new(StubSciond { response })
    }

    fn local_mapped() -> Ipv6Addr {
        scion_addr::map_v4(1, 0x111, HOST_V4).unwrap()
    }

    // The destination used throughout: 2-2:7:f000 (packed ASN 0xff000),
    // host 10.0.0.2.
    fn remote_mapped() -> Ipv6Addr {
        "fc00:2ff0::ffff:a00:2".parse().unwrap()
    }

    fn outbound_udp() -> Ipv6Packet {
        make::udp_packet(local_mapped(), remote_mapped(), 9000, 9000, b"hi").unwrap()
    }

    #[test]
    fn egress_without_paths_is_a_drop_and_is_cached() {
        let mut cache = cache(Vec::new());
        let pkt = outbound_udp();

        for _ in 0..2 {
            let result = translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache);

            assert!(matches!(result, Err(TranslateError::NoPath(_))));
        }
    }

    #[test]
    fn egress_empty_path_delivers_to_host_port() {
        let mut cache = cache(vec![PathEntry {
            raw: Vec::new(),
            next_hop: None,
        }]);
        let pkt = outbound_udp();

        let (scion, next_hop) =
            translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache).unwrap();

        assert_eq!(next_hop, "10.0.0.2:30041".parse().unwrap());
        assert_eq!(scion.dst_ia, IsdAsn::new(2, 0x2_0007_f000));
        assert_eq!(scion.src_ia, IsdAsn::new(1, 0x111));
        assert_eq!(scion.dst_host, HostAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
        assert_eq!(scion.src_host, HostAddr::V4(HOST_V4));
        assert_eq!(scion.next_header, NEXT_HEADER_UDP);
        assert!(scion.path.is_empty());
        // The L4 bytes pass through unchanged.
        assert_eq!(scion.payload, outbound_udp().payload());
    }

    #[test]
    fn egress_uses_first_hop_router_for_real_paths() {
        let mut cache = cache(vec![PathEntry {
            raw: vec![1, 2, 3, 4],
            next_hop: Some("10.128.0.2:31014".parse().unwrap()),
        }]);

        let (scion, next_hop) =
            translate_egress(&outbound_udp(), IpAddr::V4(HOST_V4), PORT, &mut cache).unwrap();

        assert_eq!(next_hop, "10.128.0.2:31014".parse().unwrap());
        assert_eq!(scion.path, vec![1, 2, 3, 4]);
    }

    #[test]
    fn egress_drops_paths_without_router() {
        let mut cache = cache(vec![PathEntry {
            raw: vec![1, 2, 3, 4],
            next_hop: None,
        }]);

        let result = translate_egress(&outbound_udp(), IpAddr::V4(HOST_V4), PORT, &mut cache);

        assert!(matches!(result, Err(TranslateError::MissingNextHop(_))));
    }

    #[test]
    fn egress_drops_next_hops_of_the_wrong_family() {
        let mut cache = cache(vec![PathEntry {
            raw: Vec::new(),
            next_hop: None,
        }]);
        let underlay = "fc00:10fc:100::1".parse::<IpAddr>().unwrap();

        let result = translate_egress(&outbound_udp(), underlay, PORT, &mut cache);

        assert!(matches!(
            result,
            Err(TranslateError::AddressFamilyMismatch { .. })
        ));
    }

    #[test]
    fn egress_drops_unmapped_destinations() {
        let pkt = make::udp_packet(
            local_mapped(),
            "2001:db8::1".parse().unwrap(),
            9000,
            9000,
            b"hi",
        )
        .unwrap();
        let mut cache = cache(Vec::new());

        let result = translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache);

        assert!(matches!(result, Err(TranslateError::NotMapped(_))));
    }

    #[test]
    fn egress_drops_unsupported_next_headers() {
        let pkt =
            make::ipv6_packet(local_mapped(), remote_mapped(), IpNumber(47), b"opaque").unwrap();
        let mut cache = cache(vec![PathEntry {
            raw: Vec::new(),
            next_hop: None,
        }]);

        let result = translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache);

        assert!(matches!(
            result,
            Err(TranslateError::UnsupportedProtocol(47))
        ));
    }

    #[test]
    fn egress_drops_non_echo_icmpv6() {
        // A router solicitation.
        let pkt = make::ipv6_packet(
            local_mapped(),
            remote_mapped(),
            IpNumber::IPV6_ICMP,
            &[133, 0, 0, 0, 0, 0, 0, 0],
        )
        .unwrap();
        let mut cache = cache(vec![PathEntry {
            raw: Vec::new(),
            next_hop: None,
        }]);

        let result = translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache);

        assert!(matches!(
            result,
            Err(TranslateError::UnsupportedIcmpv6Type(_))
        ));
    }

    #[test]
    fn egress_translates_echo_requests_to_scmp() {
        let pkt =
            make::icmpv6_echo_request(local_mapped(), remote_mapped(), 1, 2, b"ping").unwrap();
        let mut cache = cache(vec![PathEntry {
            raw: Vec::new(),
            next_hop: None,
        }]);

        let (scion, _) = translate_egress(&pkt, IpAddr::V4(HOST_V4), PORT, &mut cache).unwrap();

        assert_eq!(scion.next_header, NEXT_HEADER_SCMP);
        assert_eq!(
            ScmpMessage::parse(&scion.payload).unwrap(),
            ScmpMessage::EchoRequest(scmp::Echo {
                id: 1,
                seq: 2,
                data: b"ping".to_vec(),
            })
        );
    }

    fn inbound(payload_protocol: u8, payload: Vec<u8>) -> ScionPacket {
        ScionPacket {
            dst_ia: IsdAsn::new(1, 0x111),
            src_ia: IsdAsn::new(1, 0x110),
            dst_type: 0,
            src_type: 0,
            dst_host: HostAddr::V4(HOST_V4),
            src_host: HostAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            next_header: payload_protocol,
            traffic_class: 0,
            flow_id: 1,
            path: Vec::new(),
            payload,
        }
    }

    fn udp_l4() -> Vec<u8> {
        make::udp_packet(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST, 9000, 9000, b"hi")
            .unwrap()
            .payload()
            .to_vec()
    }

    #[test]
    fn ingress_rewrites_udp_with_fresh_checksum() {
        let tun_ip = local_mapped();
        let src = scion_addr::map_v4(1, 0x110, Ipv4Addr::new(10, 0, 0, 2)).unwrap();

        let ip = translate_ingress(&inbound(NEXT_HEADER_UDP, udp_l4()), tun_ip).unwrap();

        // Byte-identical to what etherparse builds for the same tuple,
        // checksum included.
        let reference = make::udp_packet(src, tun_ip, 9000, 9000, b"hi").unwrap();
        assert_eq!(ip, reference);
    }

    #[test]
    fn ingress_rewrites_tcp_with_fresh_checksum() {
        let tun_ip = local_mapped();
        let src = scion_addr::map_v4(1, 0x110, Ipv4Addr::new(10, 0, 0, 2)).unwrap();
        let l4 = make::tcp_packet(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST, 22, 4022, b"ssh")
            .unwrap()
            .payload()
            .to_vec();

        let ip = translate_ingress(&inbound(NEXT_HEADER_TCP, l4), tun_ip).unwrap();

        let reference = make::tcp_packet(src, tun_ip, 22, 4022, b"ssh").unwrap();
        assert_eq!(ip, reference);
    }

    #[test]
    fn ingress_translates_scmp_echo_to_icmpv6() {
        let tun_ip = local_mapped();
        let src = scion_addr::map_v4(1, 0x110, Ipv4Addr::new(10, 0, 0, 2)).unwrap();
        let scmp = ScmpMessage::EchoReply(scmp::Echo {
            id: 7,
            seq: 8,
            data: b"pong".to_vec(),
        });

        let ip = translate_ingress(&inbound(NEXT_HEADER_SCMP, scmp.serialize()), tun_ip).unwrap();

        let reference = make::icmpv6_echo_reply(src, tun_ip, 7, 8, b"pong").unwrap();
        assert_eq!(ip, reference);
    }

    #[test]
    fn ingress_drops_foreign_destinations() {
        let tun_ip = local_mapped();
        let mut pkt = inbound(NEXT_HEADER_UDP, udp_l4());
        pkt.dst_host = HostAddr::V4(Ipv4Addr::new(10, 0, 0, 99));

        let result = translate_ingress(&pkt, tun_ip);

        assert!(matches!(result, Err(TranslateError::WrongDestination(_))));
    }

    #[test]
    fn ingress_drops_non_ip_host_types() {
        let mut pkt = inbound(NEXT_HEADER_UDP, udp_l4());
        pkt.dst_type = 1;

        let result = translate_ingress(&pkt, local_mapped());

        assert!(matches!(result, Err(TranslateError::UnsupportedHostType(1))));
    }

    #[test]
    fn ingress_drops_unmapped_v6_sources() {
        let mut pkt = inbound(NEXT_HEADER_UDP, udp_l4());
        pkt.src_host = HostAddr::V6("2001:db8::1".parse().unwrap());

        let result = translate_ingress(&pkt, local_mapped());

        assert!(matches!(result, Err(TranslateError::SourceNotMapped(_))));
    }

    #[test]
    fn ingress_drops_unsupported_protocols() {
        let result = translate_ingress(&inbound(89, Vec::new()), local_mapped());

        assert!(matches!(
            result,
            Err(TranslateError::UnsupportedProtocol(89))
        ));
    }

    #[test]
    fn ingress_drops_non_echo_scmp() {
        // SCMP external interface down (type 5).
        let result = translate_ingress(
            &inbound(NEXT_HEADER_SCMP, vec![5, 0, 0, 0, 0, 0, 0, 0]),
            local_mapped(),
        );

        assert!(matches!(result, Err(TranslateError::UnsupportedScmp(_))));
    }

    #[test]
    fn echo_mapping_round_trips() {
        for make_echo in [make::icmpv6_echo_request, make::icmpv6_echo_reply] {
            let pkt = make_echo(local_mapped(), remote_mapped(), 11, 22, b"data").unwrap();
            let icmp = pkt.as_icmpv6().unwrap();

            let scmp = icmp_to_scmp(&icmp).unwrap();
            let back = scmp_to_icmp(&scmp);

            let slice = Icmpv6Slice::from_slice(&back).unwrap();
            let (Icmpv6Type::EchoRequest(header) | Icmpv6Type::EchoReply(header)) =
                slice.icmp_type()
            else {
                panic!("not an echo");
            };
            assert_eq!(header.id, 11);
            assert_eq!(header.seq, 22);
            assert_eq!(slice.payload(), b"data");
        }
    }
}
