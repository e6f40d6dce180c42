//! Link message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::parse::{PResult, parse_i32_ne, parse_u8, parse_u16_ne, parse_u32_ne};

/// Interface info message (struct ifinfomsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct IfInfoMsg {
    /// Address family (AF_UNSPEC).
    pub ifi_family: u8,
    /// Padding.
    pub __ifi_pad: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Change mask.
    pub ifi_change: u32,
}

impl IfInfoMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new interface info message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ifi_family = family;
        self
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse the fixed body, advancing the input.
    pub fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            ifi_family: parse_u8(input)?,
            __ifi_pad: parse_u8(input)?,
            ifi_type: parse_u16_ne(input)?,
            ifi_index: parse_i32_ne(input)?,
            ifi_flags: parse_u32_ne(input)?,
            ifi_change: parse_u32_ne(input)?,
        })
    }
}

/// Link attribute IDs (IFLA_*).
pub mod ifla {
    pub const IFNAME: u16 = 3;
    /// Highest attribute ID known to this crate's kernel headers.
    pub const MAX: u16 = 65;
}

/// Hardware types (ARPHRD_*).
pub mod arphrd {
    pub const ETHER: u16 = 1;
    pub const TUNNEL: u16 = 768;
    pub const TUNNEL6: u16 = 769;
    pub const LOOPBACK: u16 = 772;
    pub const NONE: u16 = 0xFFFE;
}
