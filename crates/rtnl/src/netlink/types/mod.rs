//! Fixed-layout rtnetlink message bodies and their attribute IDs.

pub mod addr;
pub mod link;
pub mod route;

pub use addr::IfAddrMsg;
pub use link::IfInfoMsg;
pub use route::RtMsg;

/// Address families.
pub const AF_UNSPEC: u8 = 0;
pub const AF_INET: u8 = 2;
pub const AF_INET6: u8 = 10;
