//! A synchronous client for the SCION daemon.
//!
//! The daemon answers over gRPC. The translator is a single-threaded
//! readiness loop, so the client owns a private current-thread runtime and
//! blocks on each call; runtime and channel are released together on drop.
//! The local AS identity is fetched once at connect time and is immutable for
//! the lifetime of the client.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod proto;

mod path_cache;

pub use path_cache::PathCache;

use anyhow::{Context as _, Result};
use proto::daemon::v1 as daemon;
use proto::daemon::v1::daemon_service_client::DaemonServiceClient;
use scion_addr::IsdAsn;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime};
use tonic::transport::{Channel, Endpoint};

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("daemon RPC failed: {0}")]
    Status(#[from] tonic::Status),
    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
}

/// One usable path towards a destination AS.
///
/// An empty `raw` path means the destination is in the local AS and packets
/// are delivered to the host directly; `next_hop` is absent whenever the
/// daemon did not name a first-hop router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub raw: Vec<u8>,
    pub next_hop: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy)]
pub struct AsInfo {
    pub isd_as: IsdAsn,
    pub core: bool,
    pub mtu: u16,
}

/// The daemon queries needed by the translator, behind a seam for tests.
pub trait Sciond {
    fn local_ia(&self) -> IsdAsn;
    fn paths(&mut self, src: IsdAsn, dst: IsdAsn) -> Result<Vec<PathEntry>, RpcError>;
}

pub struct DaemonClient {
    runtime: tokio::runtime::Runtime,
    client: DaemonServiceClient<Channel>,
    local: AsInfo,
}

impl DaemonClient {
    /// Connects to the daemon and fetches the local AS identity.
    pub fn connect(addr: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create runtime")?;

        let endpoint = Endpoint::from_shared(format!("http://{addr}"))
            .context("Invalid daemon address")?
            .connect_timeout(Duration::from_secs(5));

        let channel = runtime
            .block_on(endpoint.connect())
            .with_context(|| format!("Failed to connect to SCION daemon at {addr}"))?;

        let mut client = DaemonServiceClient::new(channel);

        let info = runtime
            .block_on(client.r#as(daemon::AsRequest { isd_as: 0 }))
            .context("Failed to query local AS info")?
            .into_inner();

        let local = AsInfo {
            isd_as: IsdAsn::from(info.isd_as),
            core: info.core,
            mtu: info.mtu as u16,
        };

        tracing::debug!(local_ia = %local.isd_as, core = local.core, mtu = local.mtu, "Connected to SCION daemon");

        Ok(Self {
            runtime,
            client,
            local,
        })
    }

    pub fn local_as(&self) -> AsInfo {
        self.local
    }

    pub fn paths(
        &mut self,
        src: IsdAsn,
        dst: IsdAsn,
        refresh: bool,
        hidden: bool,
    ) -> Result<Vec<PathEntry>, RpcError> {
        let request = daemon::PathsRequest {
            source_isd_as: src.to_u64(),
            destination_isd_as: dst.to_u64(),
            refresh,
            hidden,
        };

        let response = self
            .runtime
            .block_on(self.client.paths(request))?
            .into_inner();

        Ok(response.paths.into_iter().map(path_entry).collect())
    }

    // The remaining RPCs are passthroughs; the translator itself never calls
    // them.

    pub fn interfaces(&mut self) -> Result<daemon::InterfacesResponse, RpcError> {
        let response = self
            .runtime
            .block_on(self.client.interfaces(daemon::InterfacesRequest {}))?;

        Ok(response.into_inner())
    }

    pub fn services(&mut self) -> Result<daemon::ServicesResponse, RpcError> {
        let response = self
            .runtime
            .block_on(self.client.services(daemon::ServicesRequest {}))?;

        Ok(response.into_inner())
    }

    pub fn notify_interface_down(&mut self, isd_as: IsdAsn, id: u64) -> Result<(), RpcError> {
        let request = daemon::NotifyInterfaceDownRequest {
            isd_as: isd_as.to_u64(),
            id,
        };

        self.runtime
            .block_on(self.client.notify_interface_down(request))?;

        Ok(())
    }

    pub fn drkey_as_host(
        &mut self,
        val_time: SystemTime,
        protocol_id: i32,
        src_ia: IsdAsn,
        dst_ia: IsdAsn,
        dst_host: &str,
    ) -> Result<daemon::DrKeyAsHostResponse, RpcError> {
        let request = daemon::DrKeyAsHostRequest {
            val_time: Some(val_time.into()),
            protocol_id,
            src_ia: src_ia.to_u64(),
            dst_ia: dst_ia.to_u64(),
            dst_host: dst_host.to_owned(),
        };

        Ok(self
            .runtime
            .block_on(self.client.dr_key_as_host(request))?
            .into_inner())
    }

    pub fn drkey_host_as(
        &mut self,
        val_time: SystemTime,
        protocol_id: i32,
        src_ia: IsdAsn,
        dst_ia: IsdAsn,
        src_host: &str,
    ) -> Result<daemon::DrKeyHostAsResponse, RpcError> {
        let request = daemon::DrKeyHostAsRequest {
            val_time: Some(val_time.into()),
            protocol_id,
            src_ia: src_ia.to_u64(),
            dst_ia: dst_ia.to_u64(),
            src_host: src_host.to_owned(),
        };

        Ok(self
            .runtime
            .block_on(self.client.dr_key_host_as(request))?
            .into_inner())
    }

    pub fn drkey_host_host(
        &mut self,
        val_time: SystemTime,
        protocol_id: i32,
        src_ia: IsdAsn,
        dst_ia: IsdAsn,
        src_host: &str,
        dst_host: &str,
    ) -> Result<daemon::DrKeyHostHostResponse, RpcError> {
        let request = daemon::DrKeyHostHostRequest {
            val_time: Some(val_time.into()),
            protocol_id,
            src_ia: src_ia.to_u64(),
            dst_ia: dst_ia.to_u64(),
            src_host: src_host.to_owned(),
            dst_host: dst_host.to_owned(),
        };

        Ok(self
            .runtime
            .block_on(self.client.dr_key_host_host(request))?
            .into_inner())
    }
}

impl Sciond for DaemonClient {
    fn local_ia(&self) -> IsdAsn {
        self.local.isd_as
    }

    fn paths(&mut self, src: IsdAsn, dst: IsdAsn) -> Result<Vec<PathEntry>, RpcError> {
        DaemonClient::paths(self, src, dst, false, false)
    }
}

fn path_entry(path: daemon::Path) -> PathEntry {
    let next_hop = path
        .interface
        .and_then(|interface| interface.address)
        .and_then(|underlay| parse_underlay(&underlay.address));

    PathEntry {
        raw: path.raw,
        next_hop,
    }
}

// The daemon reports the first-hop router as "ip:port" or "[ip]:port"; paths
// within the local AS carry an empty string.
fn parse_underlay(addr: &str) -> Option<SocketAddr> {
    if addr.is_empty() {
        return None;
    }

    match addr.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            tracing::warn!(%addr, "Ignoring unparsable underlay address");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_underlay_addresses() {
        assert_eq!(
            parse_underlay("10.128.0.2:31014"),
            Some("10.128.0.2:31014".parse().unwrap())
        );
        assert_eq!(
            parse_underlay("[fc00:10fc:100::1]:31014"),
            Some("[fc00:10fc:100::1]:31014".parse().unwrap())
        );
        assert_eq!(parse_underlay(""), None);
        assert_eq!(parse_underlay("not-an-address"), None);
    }

    #[test]
    fn reduces_daemon_path_to_entry() {
        let path = daemon::Path {
            raw: vec![1, 2, 3, 4],
            interface: Some(daemon::Interface {
                address: Some(daemon::Underlay {
                    address: "10.128.0.2:31014".to_owned(),
                }),
            }),
            interfaces: Vec::new(),
            mtu: 1472,
            expiration: None,
        };

        assert_eq!(
            path_entry(path),
            PathEntry {
                raw: vec![1, 2, 3, 4],
                next_hop: Some("10.128.0.2:31014".parse().unwrap()),
            }
        );
    }

    #[test]
    fn empty_underlay_means_no_next_hop() {
        let path = daemon::Path {
            raw: Vec::new(),
            interface: Some(daemon::Interface {
                address: Some(daemon::Underlay {
                    address: String::new(),
                }),
            }),
            interfaces: Vec::new(),
            mtu: 0,
            expiration: None,
        };

        assert_eq!(path_entry(path).next_hop, None);
    }
}
