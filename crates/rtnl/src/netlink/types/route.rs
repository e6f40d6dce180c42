//! Route message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::parse::{PResult, parse_u8, parse_u32_ne};

/// Route message (struct rtmsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct RtMsg {
    /// Address family.
    pub rtm_family: u8,
    /// Destination prefix length.
    pub rtm_dst_len: u8,
    /// Source prefix length.
    pub rtm_src_len: u8,
    /// TOS filter.
    pub rtm_tos: u8,
    /// Routing table ID.
    pub rtm_table: u8,
    /// Routing protocol (RTPROT_*).
    pub rtm_protocol: u8,
    /// Route scope (RT_SCOPE_*).
    pub rtm_scope: u8,
    /// Route type (RTN_*).
    pub rtm_type: u8,
    /// Route flags.
    pub rtm_flags: u32,
}

impl RtMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new route message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.rtm_family = family;
        self
    }

    /// Set the destination prefix length.
    pub fn with_dst_len(mut self, len: u8) -> Self {
        self.rtm_dst_len = len;
        self
    }

    /// Set the routing table.
    pub fn with_table(mut self, table: u8) -> Self {
        self.rtm_table = table;
        self
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse the fixed body, advancing the input.
    pub fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            rtm_family: parse_u8(input)?,
            rtm_dst_len: parse_u8(input)?,
            rtm_src_len: parse_u8(input)?,
            rtm_tos: parse_u8(input)?,
            rtm_table: parse_u8(input)?,
            rtm_protocol: parse_u8(input)?,
            rtm_scope: parse_u8(input)?,
            rtm_type: parse_u8(input)?,
            rtm_flags: parse_u32_ne(input)?,
        })
    }
}

/// Route attribute IDs (RTA_*).
pub mod rta {
    pub const DST: u16 = 1;
    pub const SRC: u16 = 2;
    pub const OIF: u16 = 4;
    pub const GATEWAY: u16 = 5;
    pub const TABLE: u16 = 15;
    /// Highest attribute ID known to this crate's kernel headers.
    pub const MAX: u16 = 30;
}

/// Reserved routing table IDs (RT_TABLE_*).
pub mod rt_table {
    pub const MAIN: u32 = 254;
    pub const LOCAL: u32 = 255;
}

/// Route and address scopes (RT_SCOPE_*).
pub mod rt_scope {
    pub const UNIVERSE: u8 = 0;
    pub const SITE: u8 = 200;
    pub const LINK: u8 = 253;
    pub const HOST: u8 = 254;
    pub const NOWHERE: u8 = 255;
}
