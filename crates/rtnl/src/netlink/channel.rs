//! Raw datagram channel to the kernel.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use bytes::BytesMut;
use netlink_sys::{Socket as RawSocket, SocketAddr, protocols};

/// How a receive call waits for data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReceiveMode {
    /// Block until a datagram arrives.
    #[default]
    Wait,
    /// Fail with `WouldBlock` if nothing is queued.
    Nonblock,
}

/// Datagram transport underneath a [`Socket`](super::Socket).
pub trait Channel {
    /// Transmit one datagram to the kernel.
    fn send(&mut self, frame: &[u8]) -> io::Result<usize>;

    /// Size of the next queued datagram, without consuming it.
    fn peek_len(&mut self, mode: ReceiveMode) -> io::Result<usize>;

    /// Consume the next datagram into the spare capacity of `buf`.
    fn recv(&mut self, buf: &mut BytesMut) -> io::Result<usize>;
}

/// NETLINK_ROUTE socket.
pub struct NetlinkChannel {
    socket: RawSocket,
    pid: u32,
}

impl NetlinkChannel {
    /// Create a NETLINK_ROUTE socket bound to `pid` and the legacy group mask.
    ///
    /// On bind failure the descriptor is closed before the error is returned.
    pub fn bind(pid: u32, groups: u32) -> io::Result<Self> {
        let mut socket = RawSocket::new(protocols::NETLINK_ROUTE)?;

        let mut addr = SocketAddr::new(pid, groups);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;

        Ok(Self {
            socket,
            pid: addr.port_number(),
        })
    }

    /// Port ID the socket is bound to.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Channel for NetlinkChannel {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        let kernel = SocketAddr::new(0, 0);
        self.socket.send_to(frame, &kernel, 0)
    }

    fn peek_len(&mut self, mode: ReceiveMode) -> io::Result<usize> {
        let mut flags = libc::MSG_PEEK | libc::MSG_TRUNC;
        if mode == ReceiveMode::Nonblock {
            flags |= libc::MSG_DONTWAIT;
        }

        // SAFETY: a zero-length receive never writes through the buffer
        // pointer. MSG_TRUNC makes the kernel report the full datagram size.
        let ret = unsafe { libc::recv(self.as_raw_fd(), std::ptr::null_mut(), 0, flags) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }

    fn recv(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        self.socket.recv(buf, 0)
    }
}

impl AsRawFd for NetlinkChannel {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

impl std::fmt::Debug for NetlinkChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlinkChannel")
            .field("fd", &self.as_raw_fd())
            .field("pid", &self.pid)
            .finish()
    }
}
