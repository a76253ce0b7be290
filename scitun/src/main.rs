//! A user-space SCION-IP translator.
//!
//! Exposes a TUN device to the kernel. IPv6 packets addressed into
//! `fc00::/8` are rewritten into SCION packets and sent over a UDP underlay
//! socket; SCION packets arriving on that socket are rewritten back into
//! native IPv6 and injected into the tunnel. Paths come from the local SCION
//! daemon and are cached for the lifetime of the process.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod eventloop;
mod sockets;
mod translate;
mod tun_device_manager;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use eventloop::Eventloop;
use sciond_client::{DaemonClient, PathCache};
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// Mapped addresses derived from an IPv4 underlay cover prefix, ISD, ASN and
// the leading zero byte of the local prefix.
const V4_TUN_PREFIX_LEN: u8 = 40;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Host address with prefix length, e.g. `10.128.1.2/24`.
    ip: IpInterface,

    /// Main network interface.
    interface: String,

    /// SCION daemon address.
    #[arg(short, long, default_value = "127.0.0.1:30255")]
    daemon: String,

    /// Name of the tunnel device.
    #[arg(short, long, value_name = "TUN", default_value = "scitun")]
    tunnel: String,

    /// UDP port for SCION packet IO.
    #[arg(short, long, default_value_t = 30041)]
    port: u16,
}

/// An IP address with prefix length.
#[derive(Debug, Clone, Copy)]
struct IpInterface {
    ip: IpAddr,
    prefix_len: u8,
}

impl FromStr for IpInterface {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (ip, prefix_len) = s.split_once('/').context("expected <ip>/<prefix>")?;
        let ip: IpAddr = ip.parse().context("invalid IP address")?;
        let prefix_len: u8 = prefix_len.parse().context("invalid prefix length")?;

        let max = if ip.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            bail!("prefix length {prefix_len} out of range for {ip}");
        }

        Ok(Self { ip, prefix_len })
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Startup failures can happen before the tracing subscriber exists."
)]
fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{e:#}");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let daemon = DaemonClient::connect(&cli.daemon)?;
    let local = daemon.local_as();
    let cache = PathCache::new(daemon);

    let (tun_ip, prefix_len) = match cli.ip.ip {
        IpAddr::V4(host) => {
            let ia = local.isd_as;
            let tun_ip = scion_addr::map_v4(ia.isd(), ia.asn(), host)
                .with_context(|| format!("Local AS {ia} has no SCION-mapped address"))?;

            (tun_ip, V4_TUN_PREFIX_LEN)
        }
        IpAddr::V6(host) => (host, cli.ip.prefix_len),
    };

    let tun = tun::Tun::open(&cli.tunnel)?;
    tun_device_manager::configure(tun.name(), tun_ip, prefix_len)?;

    let socket = sockets::udp(SocketAddr::new(cli.ip.ip, cli.port), &cli.interface)?;

    tracing::info!(
        tunnel = tun.name(),
        %tun_ip,
        local_ia = %local.isd_as,
        port = cli.port,
        "Translating between IPv6 and SCION"
    );

    Eventloop::new(tun, socket, cache, cli.ip.ip, cli.port, tun_ip)?.run()
}
