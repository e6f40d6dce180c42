//! Common test utilities for integration tests.
//!
//! Provides `Kernel`, a scripted channel that plays the kernel side of a
//! socket, and `Datagram`, a builder for the byte streams it replays.

use std::collections::VecDeque;
use std::io;
use std::net::IpAddr;

use bytes::BytesMut;
use rtnl::netlink::attr::nla_align;
use rtnl::netlink::message::{NLM_F_MULTI, nlmsg_align};
use rtnl::netlink::types::addr::ifa;
use rtnl::netlink::types::link::{arphrd, ifla};
use rtnl::netlink::types::route::{rt_table, rta};
use rtnl::netlink::types::{AF_INET, AF_INET6, IfAddrMsg, IfInfoMsg, RtMsg};
use rtnl::netlink::{Channel, NlAttr, NlMsgHdr, NlMsgType, ReceiveMode, Socket};

/// Port ID used for the socket under test.
pub const PID: u32 = 31337;

/// Scripted kernel end of a channel.
#[derive(Debug, Default)]
pub struct Kernel {
    queue: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
}

impl Kernel {
    /// Queue a datagram for the socket to read.
    pub fn reply(&mut self, datagram: Datagram) {
        self.queue.push_back(datagram.buf);
    }

    /// Number of datagrams not yet read.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Channel for Kernel {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.sent.push(frame.to_vec());
        Ok(frame.len())
    }

    fn peek_len(&mut self, _mode: ReceiveMode) -> io::Result<usize> {
        self.queue
            .front()
            .map(Vec::len)
            .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))
    }

    fn recv(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        let datagram = self
            .queue
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::WouldBlock))?;
        buf.extend_from_slice(&datagram);
        Ok(datagram.len())
    }
}

/// A socket over a scripted kernel that resolves index 2 to "eth0".
pub fn socket() -> Socket<Kernel> {
    Socket::with_channel(Kernel::default(), PID)
        .with_resolver(|index: u32| (index == 2).then(|| "eth0".to_string()))
}

fn push_attr(buf: &mut Vec<u8>, kind: u16, payload: &[u8]) {
    buf.extend_from_slice(NlAttr::new(kind, payload.len()).as_bytes());
    buf.extend_from_slice(payload);
    buf.resize(nla_align(buf.len()), 0);
}

fn octets(addr: IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

fn family(addr: IpAddr) -> u8 {
    if addr.is_ipv4() { AF_INET } else { AF_INET6 }
}

/// Builder for one kernel datagram.
#[derive(Debug, Default)]
pub struct Datagram {
    buf: Vec<u8>,
}

impl Datagram {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, msg_type: u16, flags: u16, seq: u32, pid: u32, payload: &[u8]) -> Self {
        let header = NlMsgHdr::new(msg_type, flags, payload.len()).with_identity(seq, pid);
        self.buf.extend_from_slice(header.as_bytes());
        self.buf.extend_from_slice(payload);
        self.buf.resize(nlmsg_align(self.buf.len()), 0);
        self
    }

    /// A link message of type `msg_type`.
    pub fn link(self, msg_type: u16, seq: u32, pid: u32, index: i32, name: &str) -> Self {
        let mut msg = IfInfoMsg::new();
        msg.ifi_type = if name == "lo" {
            arphrd::LOOPBACK
        } else {
            arphrd::ETHER
        };
        msg.ifi_index = index;

        let mut payload = msg.as_bytes().to_vec();
        push_attr(&mut payload, ifla::IFNAME, format!("{}\0", name).as_bytes());
        self.push(msg_type, NLM_F_MULTI, seq, pid, &payload)
    }

    /// An address message of type `msg_type` on interface 2.
    pub fn address(
        self,
        msg_type: u16,
        seq: u32,
        pid: u32,
        addr: &str,
        prefix_len: u8,
        scope: u8,
    ) -> Self {
        let addr: IpAddr = addr.parse().unwrap();
        let mut msg = IfAddrMsg::new().with_family(family(addr));
        msg.ifa_prefixlen = prefix_len;
        msg.ifa_scope = scope;
        msg.ifa_index = 2;

        let mut payload = msg.as_bytes().to_vec();
        push_attr(&mut payload, ifa::ADDRESS, &octets(addr));
        self.push(msg_type, NLM_F_MULTI, seq, pid, &payload)
    }

    /// A route message of type `msg_type` in the main table.
    ///
    /// `dst` of `None` is the default route.
    pub fn route(
        self,
        msg_type: u16,
        seq: u32,
        pid: u32,
        dst: Option<(&str, u8)>,
        gateway: Option<&str>,
        oif: Option<u32>,
    ) -> Self {
        let dst = dst.map(|(addr, len)| (addr.parse::<IpAddr>().unwrap(), len));
        let gateway = gateway.map(|addr| addr.parse::<IpAddr>().unwrap());
        let af = dst
            .map(|(addr, _)| family(addr))
            .or(gateway.map(family))
            .unwrap_or(AF_INET);

        let msg = RtMsg::new()
            .with_family(af)
            .with_dst_len(dst.map(|(_, len)| len).unwrap_or(0))
            .with_table(rt_table::MAIN as u8);
        let mut payload = msg.as_bytes().to_vec();
        if let Some((addr, _)) = dst {
            push_attr(&mut payload, rta::DST, &octets(addr));
        }
        if let Some(addr) = gateway {
            push_attr(&mut payload, rta::GATEWAY, &octets(addr));
        }
        if let Some(index) = oif {
            push_attr(&mut payload, rta::OIF, &index.to_ne_bytes());
        }
        self.push(msg_type, NLM_F_MULTI, seq, pid, &payload)
    }

    /// NLMSG_DONE.
    pub fn done(self, seq: u32, pid: u32) -> Self {
        self.push(NlMsgType::DONE, NLM_F_MULTI, seq, pid, &0i32.to_ne_bytes())
    }

    /// A message with arbitrary flags and an empty body.
    pub fn bare(self, msg_type: u16, flags: u16, seq: u32, pid: u32) -> Self {
        self.push(msg_type, flags, seq, pid, &[])
    }
}
