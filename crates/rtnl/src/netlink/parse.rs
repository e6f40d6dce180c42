//! Parser primitives for the rtnetlink wire format.
//!
//! Netlink integers are in host byte order; every multi-byte read here goes
//! through an explicit `from_ne_bytes`. Address payloads are in network byte
//! order and are copied octet by octet.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use super::types::{AF_INET, AF_INET6};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Parse a u8.
pub fn parse_u8(input: &mut &[u8]) -> PResult<u8> {
    take(1usize).map(|b: &[u8]| b[0]).parse_next(input)
}

/// Parse a u16 in native endian.
pub fn parse_u16_ne(input: &mut &[u8]) -> PResult<u16> {
    take(2usize)
        .map(|b: &[u8]| u16::from_ne_bytes([b[0], b[1]]))
        .parse_next(input)
}

/// Parse a u32 in native endian.
pub fn parse_u32_ne(input: &mut &[u8]) -> PResult<u32> {
    take(4usize)
        .map(|b: &[u8]| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .parse_next(input)
}

/// Parse an i32 in native endian.
pub fn parse_i32_ne(input: &mut &[u8]) -> PResult<i32> {
    take(4usize)
        .map(|b: &[u8]| i32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .parse_next(input)
}

/// Decode an address payload according to its address family.
///
/// Returns `None` for unknown families or short payloads.
pub fn parse_ip_addr(data: &[u8], family: u8) -> Option<IpAddr> {
    match family {
        AF_INET => {
            let octets: [u8; 4] = data.get(..4)?.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        AF_INET6 => {
            let octets: [u8; 16] = data.get(..16)?.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
