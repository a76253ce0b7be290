use std::{io, os::fd::RawFd};

const TUNSETIFF: libc::c_ulong = 0x4004_54ca;

/// The kernel's `ifreq` argument for `TUNSETIFF`: interface name followed by
/// the requested flags.
#[repr(C)]
struct IfReq {
    name: [libc::c_uchar; libc::IF_NAMESIZE],
    flags: libc::c_short,
}

/// Turns an open `/dev/net/tun` descriptor into the TUN interface `name`.
///
/// Requests plain `IFF_TUN`, no `IFF_NO_PI`: the kernel keeps the 4-byte
/// packet-info header on every frame.
pub fn attach_tun(fd: RawFd, name: &str) -> io::Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() >= libc::IF_NAMESIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "interface name too long",
        ));
    }

    let mut req = IfReq {
        name: [0; libc::IF_NAMESIZE],
        flags: libc::IFF_TUN as _,
    };
    req.name[..bytes.len()].copy_from_slice(bytes);

    // Safety: `fd` came from `open` and `IfReq` is the layout `TUNSETIFF`
    // expects.
    if unsafe { libc::ioctl(fd, TUNSETIFF as _, &mut req) } < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}
