//! The Linux TUN character device.
//!
//! The device is attached with plain `IFF_TUN`, so every frame exchanged
//! with the kernel carries a 4-byte packet-info header: flags and ethertype,
//! both big-endian. [`Frame`] models exactly that.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod ioctl;

use anyhow::{Context as _, Result};
use std::ffi::CStr;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd as _, OwnedFd, RawFd};

const TUN_FILE: &CStr = c"/dev/net/tun";

/// Packet-info flag set by the kernel when a frame did not fit the read
/// buffer.
pub const TUN_PKT_STRIP: u16 = 0x0001;

pub const ETH_P_IP: u16 = 0x0800;
pub const ETH_P_IPV6: u16 = 0x86dd;

const PI_LEN: usize = 4;

/// One frame read from the device: packet-info header plus the L3 packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub flags: u16,
    pub ethertype: u16,
    pub packet: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn parse(buf: &'a [u8]) -> io::Result<Self> {
        if buf.len() < PI_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "tunnel frames are at least 4 bytes long",
            ));
        }

        Ok(Self {
            flags: u16::from_be_bytes([buf[0], buf[1]]),
            ethertype: u16::from_be_bytes([buf[2], buf[3]]),
            packet: &buf[PI_LEN..],
        })
    }

    pub fn truncated(&self) -> bool {
        self.flags & TUN_PKT_STRIP != 0
    }
}

#[derive(Debug)]
pub struct Tun {
    fd: OwnedFd,
    name: String,
}

impl Tun {
    /// Opens `/dev/net/tun`, attaches it to the interface `name` and makes
    /// it non-blocking. The interface disappears again when the returned
    /// handle is dropped.
    pub fn open(name: &str) -> Result<Self> {
        let fd = match unsafe { libc::open(TUN_FILE.as_ptr() as _, libc::O_RDWR | libc::O_CLOEXEC) }
        {
            -1 => {
                return Err(anyhow::Error::new(io::Error::last_os_error()))
                    .with_context(|| format!("Failed to open '{}'", TUN_FILE.to_string_lossy()));
            }
            fd => fd,
        };

        // Safety: We just opened the FD and are its only owner.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        ioctl::attach_tun(fd.as_raw_fd(), name)
            .with_context(|| format!("Failed to attach TUN device '{name}'"))?;

        set_non_blocking(fd.as_raw_fd()).context("Failed to make TUN device non-blocking")?;

        Ok(Self {
            fd,
            name: name.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads one frame into `buf`; `WouldBlock` when no frame is pending.
    pub fn read<'a>(&self, buf: &'a mut [u8]) -> io::Result<Frame<'a>> {
        // Safety: The file descriptor is valid for the lifetime of `self`.
        let n = match unsafe { libc::read(self.fd.as_raw_fd(), buf.as_mut_ptr() as _, buf.len()) }
        {
            -1 => return Err(io::Error::last_os_error()),
            n => n as usize,
        };

        Frame::parse(&buf[..n])
    }

    /// Writes one L3 packet prefixed with the packet-info header. Returns
    /// the number of packet bytes written.
    pub fn write(&self, ethertype: u16, packet: &[u8]) -> io::Result<usize> {
        let mut frame = Vec::with_capacity(PI_LEN + packet.len());
        frame.extend_from_slice(&0u16.to_be_bytes());
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame.extend_from_slice(packet);

        // Safety: The file descriptor is valid for the lifetime of `self`.
        match unsafe { libc::write(self.fd.as_raw_fd(), frame.as_ptr() as _, frame.len()) } {
            -1 => Err(io::Error::last_os_error()),
            n => Ok((n as usize).saturating_sub(PI_LEN)),
        }
    }
}

impl AsRawFd for Tun {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

fn set_non_blocking(fd: RawFd) -> io::Result<()> {
    match unsafe { libc::fcntl(fd, libc::F_GETFL) } {
        -1 => Err(io::Error::last_os_error()),
        flags => match unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } {
            -1 => Err(io::Error::last_os_error()),
            _ => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipv6_frame() {
        let frame = Frame::parse(&[0x00, 0x00, 0x86, 0xdd, 0x60, 0x00]).unwrap();

        assert_eq!(frame.flags, 0);
        assert_eq!(frame.ethertype, ETH_P_IPV6);
        assert_eq!(frame.packet, &[0x60, 0x00]);
        assert!(!frame.truncated());
    }

    #[test]
    fn detects_truncation_flag() {
        let frame = Frame::parse(&[0x00, 0x01, 0x08, 0x00]).unwrap();

        assert_eq!(frame.ethertype, ETH_P_IP);
        assert!(frame.truncated());
        assert!(frame.packet.is_empty());
    }

    #[test]
    fn rejects_short_frames() {
        assert_eq!(
            Frame::parse(&[0x00, 0x00, 0x86]).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
