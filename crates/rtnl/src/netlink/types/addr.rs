//! Address message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::parse::{PResult, parse_u8, parse_u32_ne};

/// Interface address message (struct ifaddrmsg).
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct IfAddrMsg {
    /// Address family.
    pub ifa_family: u8,
    /// Prefix length.
    pub ifa_prefixlen: u8,
    /// Address flags (IFA_F_*).
    pub ifa_flags: u8,
    /// Address scope (RT_SCOPE_*).
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

impl IfAddrMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new address message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.ifa_family = family;
        self
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse the fixed body, advancing the input.
    pub fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            ifa_family: parse_u8(input)?,
            ifa_prefixlen: parse_u8(input)?,
            ifa_flags: parse_u8(input)?,
            ifa_scope: parse_u8(input)?,
            ifa_index: parse_u32_ne(input)?,
        })
    }
}

/// Address attribute IDs (IFA_*).
pub mod ifa {
    pub const ADDRESS: u16 = 1;
    pub const LOCAL: u16 = 2;
    pub const BROADCAST: u16 = 4;
    /// Highest attribute ID known to this crate's kernel headers.
    pub const MAX: u16 = 12;
}
