//! The rtnetlink socket: channel, sequence space and active request slot.

use std::fmt;

use tracing::debug;

use super::channel::{Channel, NetlinkChannel};
use super::error::{Result, SocketError};
use super::request::{Id, Message, Request, RequestKind, Response};
use super::ReceiveMode;
use crate::util::ifname::{NameResolver, SysfsResolver};

/// Legacy multicast group bits (RTMGRP_*) used in the bind address.
pub mod rtmgrp {
    pub const LINK: u32 = 0x1;
    pub const IPV4_IFADDR: u32 = 0x10;
    pub const IPV4_ROUTE: u32 = 0x40;
    pub const IPV6_IFADDR: u32 = 0x100;
    pub const IPV6_ROUTE: u32 = 0x400;
}

/// A multicast group carrying change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Link,
    Ipv4Route,
    Ipv6Route,
    Ipv4Address,
    Ipv6Address,
}

impl Group {
    /// Bit of this group in the bind mask.
    pub fn mask(self) -> u32 {
        match self {
            Self::Link => rtmgrp::LINK,
            Self::Ipv4Route => rtmgrp::IPV4_ROUTE,
            Self::Ipv6Route => rtmgrp::IPV6_ROUTE,
            Self::Ipv4Address => rtmgrp::IPV4_IFADDR,
            Self::Ipv6Address => rtmgrp::IPV6_IFADDR,
        }
    }
}

/// Set of multicast groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Groups(u32);

impl Groups {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group.
    pub fn insert(&mut self, group: Group) {
        self.0 |= group.mask();
    }

    /// Remove a group.
    pub fn remove(&mut self, group: Group) {
        self.0 &= !group.mask();
    }

    /// Check if a group is in the set.
    pub fn contains(&self, group: Group) -> bool {
        self.0 & group.mask() != 0
    }

    /// Check if no group is in the set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Bind mask.
    pub fn mask(&self) -> u32 {
        self.0
    }
}

impl From<&[Group]> for Groups {
    fn from(groups: &[Group]) -> Self {
        let mut set = Self::new();
        for group in groups {
            set.insert(*group);
        }
        set
    }
}

/// Builder for configuring a [`Socket`].
pub struct SocketBuilder {
    groups: Groups,
    pid: Option<u32>,
    resolver: Option<Box<dyn NameResolver + Send>>,
}

impl Default for SocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketBuilder {
    /// Create a new builder with no subscriptions.
    pub fn new() -> Self {
        Self {
            groups: Groups::new(),
            pid: None,
            resolver: None,
        }
    }

    fn toggle(mut self, group: Group, enabled: bool) -> Self {
        if enabled {
            self.groups.insert(group);
        } else {
            self.groups.remove(group);
        }
        self
    }

    /// Subscribe to link changes.
    pub fn links(self, enabled: bool) -> Self {
        self.toggle(Group::Link, enabled)
    }

    /// Subscribe to IPv4 address changes.
    pub fn addresses_v4(self, enabled: bool) -> Self {
        self.toggle(Group::Ipv4Address, enabled)
    }

    /// Subscribe to IPv6 address changes.
    pub fn addresses_v6(self, enabled: bool) -> Self {
        self.toggle(Group::Ipv6Address, enabled)
    }

    /// Subscribe to both IPv4 and IPv6 address changes.
    pub fn addresses(self, enabled: bool) -> Self {
        self.addresses_v4(enabled).addresses_v6(enabled)
    }

    /// Subscribe to IPv4 route changes.
    pub fn routes_v4(self, enabled: bool) -> Self {
        self.toggle(Group::Ipv4Route, enabled)
    }

    /// Subscribe to IPv6 route changes.
    pub fn routes_v6(self, enabled: bool) -> Self {
        self.toggle(Group::Ipv6Route, enabled)
    }

    /// Subscribe to both IPv4 and IPv6 route changes.
    pub fn routes(self, enabled: bool) -> Self {
        self.routes_v4(enabled).routes_v6(enabled)
    }

    /// Subscribe to every group.
    pub fn all(self) -> Self {
        self.links(true).addresses(true).routes(true)
    }

    /// Subscribe to the groups in a slice.
    pub fn groups(mut self, groups: &[Group]) -> Self {
        for group in groups {
            self.groups.insert(*group);
        }
        self
    }

    /// Bind to this port ID instead of the process ID.
    ///
    /// `0` lets the kernel pick a free one.
    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Use a custom interface index resolver.
    pub fn resolver(mut self, resolver: impl NameResolver + Send + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Groups selected so far.
    pub fn selected(&self) -> Groups {
        self.groups
    }

    /// Create and bind the socket.
    pub fn open(self) -> Result<Socket> {
        let pid = self.pid.unwrap_or_else(std::process::id);
        let channel = NetlinkChannel::bind(pid, self.groups.mask())?;
        let pid = channel.pid();
        debug!(pid, groups = self.groups.mask(), "opened rtnetlink socket");

        let mut socket = Socket::with_channel(channel, pid);
        if let Some(resolver) = self.resolver {
            socket.resolver = resolver;
        }
        Ok(socket)
    }
}

impl fmt::Debug for SocketBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketBuilder")
            .field("groups", &self.groups)
            .field("pid", &self.pid)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

/// An rtnetlink session.
///
/// At most one dump request is outstanding at a time. Replies are matched to
/// it by identity; messages from other origins are notifications.
pub struct Socket<C: Channel = NetlinkChannel> {
    pub(crate) channel: C,
    pub(crate) pid: u32,
    pub(crate) seq: u32,
    pub(crate) active: Option<Message>,
    pub(crate) resolver: Box<dyn NameResolver + Send>,
}

impl Socket {
    /// Create a builder.
    pub fn builder() -> SocketBuilder {
        SocketBuilder::new()
    }

    /// Open a socket bound to the process ID and joined to `groups`.
    pub fn open(groups: &[Group]) -> Result<Self> {
        Self::builder().groups(groups).open()
    }
}

impl<C: Channel> Socket<C> {
    /// Wrap an existing channel, using `pid` as the local identity.
    pub fn with_channel(channel: C, pid: u32) -> Self {
        Self {
            channel,
            pid,
            seq: 0,
            active: None,
            resolver: Box::new(SysfsResolver),
        }
    }

    /// Replace the interface index resolver.
    pub fn with_resolver(mut self, resolver: impl NameResolver + Send + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Local port ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Sequence number of the last request sent.
    pub fn sequence(&self) -> u32 {
        self.seq
    }

    /// Identity of the outstanding request, if any.
    pub fn active_id(&self) -> Option<Id> {
        self.active.as_ref().map(Message::id)
    }

    /// Underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Underlying channel, mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Send a dump request of kind `K` for an address family.
    ///
    /// Fails with [`SocketError::Busy`] without touching any state if a
    /// request is already outstanding. The request becomes active only once
    /// the datagram has been sent.
    pub fn send_request<K: RequestKind>(&mut self, family: u8) -> Result<Id> {
        if let Some(active) = &self.active {
            debug!(active = %active.id(), kind = K::NAME, "request rejected, socket busy");
            return Err(SocketError::Busy.into());
        }

        self.seq = self.seq.wrapping_add(1);
        let message = Message::from(Request::<K>::new(family, self.seq, self.pid));
        self.channel.send(&message.encode())?;

        let id = message.id();
        debug!(seq = id.sequence, pid = id.pid, kind = K::NAME, family, "sent dump request");
        self.active = Some(message);
        Ok(id)
    }

    /// Receive the next completed dump of kind `K`.
    ///
    /// Fails with [`SocketError::MessageTypeMismatch`] if the next result
    /// is of another kind or is a notification.
    pub fn receive_typed<K: RequestKind>(&mut self, mode: ReceiveMode) -> Result<Response<K::Item>> {
        let received = self.receive(mode)?;
        Ok(K::unwrap_response(received)?)
    }

    /// Drop the outstanding request, returning its identity.
    ///
    /// Needed after [`SocketError::Interrupted`] before the dump can be
    /// issued again.
    pub fn abandon(&mut self) -> Option<Id> {
        let message = self.active.take()?;
        debug!(id = %message.id(), items = message.len(), "abandoned request");
        Some(message.id())
    }

    pub(crate) fn resolver(&self) -> &dyn NameResolver {
        self.resolver.as_ref()
    }
}

impl<C: Channel + fmt::Debug> fmt::Debug for Socket<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("channel", &self.channel)
            .field("pid", &self.pid)
            .field("seq", &self.seq)
            .field("active", &self.active_id())
            .finish()
    }
}
