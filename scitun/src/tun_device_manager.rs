//! TUN interface configuration over rtnetlink.

use anyhow::{Context as _, Result};
use futures::TryStreamExt;
use netlink_packet_route::route::{RouteProtocol, RouteScope};
use rtnetlink::{new_connection, Handle};
use scion_addr::{SCION_PREFIX, SCION_PREFIX_LEN};
use std::net::{IpAddr, Ipv6Addr};

/// Assigns `tun_ip/prefix_len` to the tunnel interface, brings the link up
/// and routes `fc00::/8` into it.
///
/// Runs on a throwaway current-thread runtime; the netlink socket is gone
/// again once configuration is done. The kernel removes address and route
/// together with the interface when the TUN fd closes.
pub fn configure(tun_name: &str, tun_ip: Ipv6Addr, prefix_len: u8) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")?;

    runtime.block_on(async {
        let (connection, handle, _) =
            new_connection().context("Failed to create netlink connection")?;
        tokio::spawn(connection);

        let index = interface_index(&handle, tun_name).await?;

        handle
            .address()
            .add(index, IpAddr::V6(tun_ip), prefix_len)
            .execute()
            .await
            .with_context(|| format!("Failed to assign {tun_ip}/{prefix_len} to '{tun_name}'"))?;

        handle
            .link()
            .set(index)
            .up()
            .execute()
            .await
            .with_context(|| format!("Failed to bring up '{tun_name}'"))?;

        let scion_net = Ipv6Addr::from(u128::from(SCION_PREFIX) << 120);
        handle
            .route()
            .add()
            .output_interface(index)
            .protocol(RouteProtocol::Static)
            .scope(RouteScope::Universe)
            .v6()
            .destination_prefix(scion_net, SCION_PREFIX_LEN)
            .execute()
            .await
            .context("Failed to install route for fc00::/8")?;

        tracing::debug!(interface = tun_name, %tun_ip, prefix_len, "Configured tunnel interface");

        Ok(())
    })
}

async fn interface_index(handle: &Handle, name: &str) -> Result<u32> {
    let index = handle
        .link()
        .get()
        .match_name(name.to_string())
        .execute()
        .try_next()
        .await?
        .with_context(|| format!("No interface '{name}'"))?
        .header
        .index;

    Ok(index)
}
