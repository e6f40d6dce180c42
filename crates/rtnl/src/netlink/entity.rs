//! Decoded rtnetlink entities.
//!
//! These are plain values produced by the decoders in
//! [`decode`](super::decode). Absent wire attributes are `None`. Every
//! entity renders as one deterministic line through `Display`.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::message::NlMsgType;
use super::types::link::arphrd;
use super::types::route::{rt_scope, rt_table};

/// Whether a message announces a new or a deleted object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    Unknown,
    New,
    Delete,
}

impl Action {
    /// Derive the action from an RTM_NEW* / RTM_DEL* message type.
    pub fn from_msg_type(msg_type: u16) -> Self {
        match msg_type {
            NlMsgType::RTM_NEWLINK | NlMsgType::RTM_NEWADDR | NlMsgType::RTM_NEWROUTE => Self::New,
            NlMsgType::RTM_DELLINK | NlMsgType::RTM_DELADDR | NlMsgType::RTM_DELROUTE => {
                Self::Delete
            }
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::New => "new",
            Self::Delete => "del",
        })
    }
}

/// Address scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    #[default]
    Unknown,
    Universe,
    Site,
    Link,
    Host,
    Nowhere,
}

impl Scope {
    /// Map a wire scope byte. Unassigned values become [`Scope::Unknown`].
    pub fn from_wire(value: u8) -> Self {
        match value {
            rt_scope::UNIVERSE => Self::Universe,
            rt_scope::SITE => Self::Site,
            rt_scope::LINK => Self::Link,
            rt_scope::HOST => Self::Host,
            rt_scope::NOWHERE => Self::Nowhere,
            _ => Self::Unknown,
        }
    }

    /// The wire value of this scope, `None` for [`Scope::Unknown`].
    pub fn to_wire(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::Universe => Some(rt_scope::UNIVERSE),
            Self::Site => Some(rt_scope::SITE),
            Self::Link => Some(rt_scope::LINK),
            Self::Host => Some(rt_scope::HOST),
            Self::Nowhere => Some(rt_scope::NOWHERE),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "Unknown",
            Self::Universe => "Universe",
            Self::Site => "Site",
            Self::Link => "Link",
            Self::Host => "Host",
            Self::Nowhere => "Nowhere",
        })
    }
}

/// An interface address (RTM_NEWADDR / RTM_DELADDR).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub action: Action,
    /// Interface index the address belongs to.
    pub index: u32,
    /// IFA_ADDRESS.
    pub address: Option<IpAddr>,
    pub prefix_len: u8,
    /// IFA_BROADCAST.
    pub broadcast: Option<IpAddr>,
    /// IFA_LOCAL; differs from `address` only on point-to-point links.
    pub local: Option<IpAddr>,
    pub scope: Scope,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} address ", self.action)?;
        match &self.address {
            Some(addr) => write!(f, "{}", addr)?,
            None => f.write_str("-")?,
        }
        write!(f, "/{} scope {}", self.prefix_len, self.scope)?;
        if let Some(broadcast) = &self.broadcast {
            write!(f, " broadcast {}", broadcast)?;
        }
        if let Some(local) = &self.local {
            write!(f, " local {}", local)?;
        }
        Ok(())
    }
}

/// Hardware type of an interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    Ethernet,
    IpIpTunnel,
    IpIp6Tunnel,
    Loopback,
    None,
    #[default]
    Unknown,
}

impl InterfaceType {
    /// Map an ARPHRD_* value.
    pub fn from_arphrd(value: u16) -> Self {
        match value {
            arphrd::ETHER => Self::Ethernet,
            arphrd::TUNNEL => Self::IpIpTunnel,
            arphrd::TUNNEL6 => Self::IpIp6Tunnel,
            arphrd::LOOPBACK => Self::Loopback,
            arphrd::NONE => Self::None,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ethernet => "ethernet",
            Self::IpIpTunnel => "ipiptunnel",
            Self::IpIp6Tunnel => "ipip6tunnel",
            Self::Loopback => "loopback",
            Self::None => "none",
            Self::Unknown => "unknown",
        })
    }
}

/// A network interface (RTM_NEWLINK / RTM_DELLINK).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub action: Action,
    pub index: u32,
    pub kind: InterfaceType,
    /// IFLA_IFNAME, empty when the attribute is absent.
    pub name: String,
}

impl Interface {
    /// Create a new-link entry with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            action: Action::New,
            name: name.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} index: {} type: {} link: {}",
            self.action, self.index, self.kind, self.name
        )
    }
}

/// Routing table a route lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Table {
    #[default]
    Default,
    Main,
    Local,
}

impl Table {
    /// Map a routing table ID.
    pub fn from_id(id: u32) -> Self {
        match id {
            rt_table::MAIN => Self::Main,
            rt_table::LOCAL => Self::Local,
            _ => Self::Default,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Main => "main",
            Self::Local => "local",
        })
    }
}

/// Route destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Destination {
    /// The default route (no RTA_DST).
    #[default]
    Default,
    V4 { addr: Ipv4Addr, prefix_len: u8 },
    V6 { addr: Ipv6Addr, prefix_len: u8 },
}

impl Destination {
    /// Build a destination from an address and prefix length.
    pub fn network(addr: IpAddr, prefix_len: u8) -> Self {
        match addr {
            IpAddr::V4(addr) => Self::V4 { addr, prefix_len },
            IpAddr::V6(addr) => Self::V6 { addr, prefix_len },
        }
    }

    /// Check if this is the default route.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::V4 { addr, prefix_len } => write!(f, "{}/{}", addr, prefix_len),
            Self::V6 { addr, prefix_len } => write!(f, "{}/{}", addr, prefix_len),
        }
    }
}

/// A route (RTM_NEWROUTE / RTM_DELROUTE).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    pub table: Table,
    pub destination: Destination,
    /// RTA_GATEWAY.
    pub gateway: Option<IpAddr>,
    /// Name of the RTA_OIF interface, if it could be resolved.
    pub interface_name: Option<String>,
    /// RTA_SRC.
    pub source: Option<IpAddr>,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} route: {}", self.action, self.destination)?;
        if let Some(gateway) = &self.gateway {
            write!(f, " via {}", gateway)?;
        }
        if let Some(name) = &self.interface_name {
            write!(f, " dev {}", name)?;
        }
        if let Some(source) = &self.source {
            write!(f, " src {}", source)?;
        }
        write!(f, " table {}", self.table)
    }
}

/// One decoded entity of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Interface(Interface),
    Address(Address),
    Route(Route),
}

impl Entity {
    /// Action of the wrapped entity.
    pub fn action(&self) -> Action {
        match self {
            Self::Interface(link) => link.action,
            Self::Address(addr) => addr.action,
            Self::Route(route) => route.action,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(link) => link.fmt(f),
            Self::Address(addr) => addr.fmt(f),
            Self::Route(route) => route.fmt(f),
        }
    }
}
