//! Netlink message fixtures for testing.
//!
//! Captured message payloads (built in host byte order) plus a builder for whole kernel datagrams, and
//! a scripted channel that replays them.

use std::collections::VecDeque;
use std::io;
use std::net::Ipv6Addr;

use bytes::BytesMut;

use super::attr::{NlAttr, nla_align};
use super::channel::{Channel, ReceiveMode};
use super::message::{NLM_F_MULTI, NlMsgHdr, NlMsgType, nlmsg_align};
use super::types::addr::ifa;
use super::types::link::{arphrd, ifla};
use super::types::route::{rt_scope, rt_table, rta};
use super::types::{AF_INET, AF_INET6, IfAddrMsg, IfInfoMsg, RtMsg};

/// Link message for loopback interface.
/// Captured from: ip link show lo
pub fn link_loopback() -> Vec<u8> {
    // type=772 (ARPHRD_LOOPBACK), index=1, flags=0x49 (UP|LOOPBACK|RUNNING)
    let msg = IfInfoMsg {
        ifi_type: arphrd::LOOPBACK,
        ifi_index: 1,
        ifi_flags: 0x49,
        ..IfInfoMsg::new()
    };
    let mut buf = msg.as_bytes().to_vec();
    push_attr(&mut buf, ifla::IFNAME, b"lo\0");
    // IFLA_MTU = 65536
    push_attr(&mut buf, 4, &65536u32.to_ne_bytes());
    // IFLA_OPERSTATE = 0 (UNKNOWN)
    push_attr(&mut buf, 16, &[0]);
    buf
}

/// Address message for IPv4 loopback address 127.0.0.1/8.
pub fn addr_loopback_v4() -> Vec<u8> {
    // flags=0x80 (IFA_F_PERMANENT), scope=RT_SCOPE_HOST
    let msg = IfAddrMsg {
        ifa_family: AF_INET,
        ifa_prefixlen: 8,
        ifa_flags: 0x80,
        ifa_scope: rt_scope::HOST,
        ifa_index: 1,
    };
    let mut buf = msg.as_bytes().to_vec();
    push_attr(&mut buf, ifa::ADDRESS, &[127, 0, 0, 1]);
    push_attr(&mut buf, ifa::LOCAL, &[127, 0, 0, 1]);
    // IFA_LABEL = "lo"
    push_attr(&mut buf, 3, b"lo\0");
    buf
}

/// Address message for IPv6 loopback address ::1/128.
pub fn addr_loopback_v6() -> Vec<u8> {
    let msg = IfAddrMsg {
        ifa_family: AF_INET6,
        ifa_prefixlen: 128,
        ifa_flags: 0x80,
        ifa_scope: rt_scope::HOST,
        ifa_index: 1,
    };
    let mut buf = msg.as_bytes().to_vec();
    push_attr(&mut buf, ifa::ADDRESS, &Ipv6Addr::LOCALHOST.octets());
    buf
}

/// Route message for default route via gateway.
pub fn route_default_v4() -> Vec<u8> {
    // protocol=RTPROT_STATIC, scope=RT_SCOPE_UNIVERSE, type=RTN_UNICAST
    let msg = RtMsg {
        rtm_protocol: 4,
        rtm_type: 1,
        ..RtMsg::new()
            .with_family(AF_INET)
            .with_table(rt_table::MAIN as u8)
    };
    route_payload(
        msg,
        &[
            (rta::GATEWAY, vec![192, 168, 1, 1]),
            (rta::OIF, 2u32.to_ne_bytes().to_vec()),
        ],
    )
}

/// Append one attribute, padded.
pub fn push_attr(buf: &mut Vec<u8>, kind: u16, payload: &[u8]) {
    buf.extend_from_slice(NlAttr::new(kind, payload.len()).as_bytes());
    buf.extend_from_slice(payload);
    buf.resize(nla_align(buf.len()), 0);
}

/// Route payload from a body and a list of attributes.
pub fn route_payload(msg: RtMsg, attrs: &[(u16, Vec<u8>)]) -> Vec<u8> {
    let mut buf = msg.as_bytes().to_vec();
    for (kind, payload) in attrs {
        push_attr(&mut buf, *kind, payload);
    }
    buf
}

/// Builder for one kernel datagram holding several messages.
#[derive(Debug, Clone, Default)]
pub struct Datagram {
    buf: Vec<u8>,
    flags: u16,
}

impl Datagram {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            flags: NLM_F_MULTI,
        }
    }

    /// Extra header flags for the messages added afterwards.
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags |= flags;
        self
    }

    /// Append a message with an arbitrary type and payload.
    pub fn raw(mut self, msg_type: u16, seq: u32, pid: u32, payload: &[u8]) -> Self {
        let header = NlMsgHdr::new(msg_type, self.flags, payload.len()).with_identity(seq, pid);
        self.buf.extend_from_slice(header.as_bytes());
        self.buf.extend_from_slice(payload);
        self.buf.resize(nlmsg_align(self.buf.len()), 0);
        self
    }

    /// RTM_NEWLINK for an Ethernet interface.
    pub fn link(self, seq: u32, pid: u32, index: i32, name: &str) -> Self {
        let mut msg = IfInfoMsg::new();
        msg.ifi_type = arphrd::ETHER;
        msg.ifi_index = index;

        let mut payload = msg.as_bytes().to_vec();
        let mut ifname = name.as_bytes().to_vec();
        ifname.push(0);
        push_attr(&mut payload, ifla::IFNAME, &ifname);
        self.raw(NlMsgType::RTM_NEWLINK, seq, pid, &payload)
    }

    /// RTM_NEWADDR for an IPv4 address on interface 2.
    pub fn address(self, seq: u32, pid: u32, addr: [u8; 4], prefix_len: u8) -> Self {
        let mut msg = IfAddrMsg::new().with_family(AF_INET);
        msg.ifa_prefixlen = prefix_len;
        msg.ifa_index = 2;

        let mut payload = msg.as_bytes().to_vec();
        push_attr(&mut payload, ifa::ADDRESS, &addr);
        push_attr(&mut payload, ifa::LOCAL, &addr);
        self.raw(NlMsgType::RTM_NEWADDR, seq, pid, &payload)
    }

    /// RTM_NEWROUTE for an IPv4 network in the main table.
    pub fn route(self, seq: u32, pid: u32, dst: [u8; 4], prefix_len: u8) -> Self {
        let msg = RtMsg::new()
            .with_family(AF_INET)
            .with_dst_len(prefix_len)
            .with_table(rt_table::MAIN as u8);
        let payload = route_payload(
            msg,
            &[
                (rta::TABLE, rt_table::MAIN.to_ne_bytes().to_vec()),
                (rta::DST, dst.to_vec()),
            ],
        );
        self.raw(NlMsgType::RTM_NEWROUTE, seq, pid, &payload)
    }

    /// RTM_NEWROUTE for the IPv4 default route.
    pub fn default_route(self, seq: u32, pid: u32, gateway: [u8; 4], oif: u32) -> Self {
        let msg = RtMsg::new()
            .with_family(AF_INET)
            .with_table(rt_table::MAIN as u8);
        let payload = route_payload(
            msg,
            &[
                (rta::GATEWAY, gateway.to_vec()),
                (rta::OIF, oif.to_ne_bytes().to_vec()),
            ],
        );
        self.raw(NlMsgType::RTM_NEWROUTE, seq, pid, &payload)
    }

    /// RTM_NEWROUTE with a bare body of the given family.
    pub fn route_with_family(self, seq: u32, pid: u32, family: u8) -> Self {
        let payload = RtMsg::new().with_family(family).as_bytes().to_vec();
        self.raw(NlMsgType::RTM_NEWROUTE, seq, pid, &payload)
    }

    /// NLMSG_DONE.
    pub fn done(self, seq: u32, pid: u32) -> Self {
        self.raw(NlMsgType::DONE, seq, pid, &0i32.to_ne_bytes())
    }

    /// NLMSG_ERROR carrying a negative errno.
    pub fn error(self, seq: u32, pid: u32, error: i32) -> Self {
        let mut payload = error.to_ne_bytes().to_vec();
        payload.extend_from_slice(NlMsgHdr::new(NlMsgType::RTM_GETLINK, 0, 0).as_bytes());
        self.raw(NlMsgType::ERROR, seq, pid, &payload)
    }

    /// NLMSG_NOOP.
    pub fn noop(self, seq: u32, pid: u32) -> Self {
        self.raw(NlMsgType::NOOP, seq, pid, &[])
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl From<Datagram> for Vec<u8> {
    fn from(datagram: Datagram) -> Self {
        datagram.into_bytes()
    }
}

/// In-memory channel replaying queued datagrams.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    queue: VecDeque<Vec<u8>>,
    /// Frames passed to `send`.
    pub sent: Vec<Vec<u8>>,
    /// Make `send` fail with ENOBUFS.
    pub fail_sends: bool,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a datagram.
    pub fn push(&mut self, datagram: impl Into<Vec<u8>>) {
        self.queue.push_back(datagram.into());
    }

    /// Check if every queued datagram was consumed.
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Channel for ScriptedChannel {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        if self.fail_sends {
            return Err(io::Error::from_raw_os_error(libc::ENOBUFS));
        }
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
