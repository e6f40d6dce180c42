//! Netlink attribute (rtattr) handling.
//!
//! [`AttrTable`] indexes the attributes that follow a fixed message body by
//! type. The table borrows from the datagram buffer and lives only as long
//! as the buffer does.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::parse::{PResult, parse_u16_ne};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Netlink attribute header (mirrors struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse a header, advancing the input.
    pub fn parse(input: &mut &[u8]) -> PResult<Self> {
        Ok(Self {
            nla_len: parse_u16_ne(input)?,
            nla_type: parse_u16_ne(input)?,
        })
    }
}

/// Attributes of one message, indexed by type.
///
/// Records the payload of the first occurrence of every attribute type in
/// `0..N`. Types at or above `N` are skipped. The walk stops at the first
/// record that is truncated or claims more bytes than remain, so nothing
/// past the region is ever read.
#[derive(Debug, Clone, Copy)]
pub struct AttrTable<'a, const N: usize> {
    slots: [Option<&'a [u8]>; N],
}

impl<'a, const N: usize> AttrTable<'a, N> {
    /// Index the attribute stream in `data`.
    pub fn parse(data: &'a [u8]) -> Self {
        let mut slots = [None; N];
        let mut rest = data;

        while rest.len() >= NLA_HDRLEN {
            let mut input = rest;
            let Ok(attr) = NlAttr::parse(&mut input) else {
                break;
            };

            let len = attr.nla_len as usize;
            if len < NLA_HDRLEN || len > rest.len() {
                break;
            }

            let kind = attr.kind() as usize;
            if kind < N && slots[kind].is_none() {
                slots[kind] = Some(&rest[NLA_HDRLEN..len]);
            }

            let aligned_len = nla_align(len);
            if aligned_len >= rest.len() {
                break;
            }
            rest = &rest[aligned_len..];
        }

        Self { slots }
    }

    /// Get the payload of an attribute, if present.
    pub fn get(&self, kind: u16) -> Option<&'a [u8]> {
        self.slots.get(kind as usize).copied().flatten()
    }

    /// Check if an attribute is present.
    pub fn contains(&self, kind: u16) -> bool {
        self.get(kind).is_some()
    }

    /// Number of attribute types present.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Check if no attribute was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Option<u32> {
        let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }

    /// Extract a null-terminated string, replacing invalid UTF-8.
    pub fn string(data: &[u8]) -> String {
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        String::from_utf8_lossy(&data[..len]).into_owned()
    }
}
