//! Synchronous rtnetlink client for Linux.
//!
//! Dumps network links, addresses and routes over a NETLINK_ROUTE socket,
//! correlates the kernel replies to the request that caused them, and
//! surfaces multicast change notifications.
//!
//! # Example
//!
//! ```ignore
//! use rtnl::netlink::{ReceiveMode, RouteRequest, AF_INET};
//! use rtnl::Socket;
//!
//! fn main() -> rtnl::Result<()> {
//!     let mut socket = Socket::open(&[])?;
//!     socket.send_request::<RouteRequest>(AF_INET)?;
//!
//!     let routes = socket.receive_typed::<RouteRequest>(ReceiveMode::Wait)?;
//!     for route in routes.data {
//!         println!("{}", route);
//!     }
//!     Ok(())
//! }
//! ```

pub mod netlink;
pub mod util;

// Re-export common types at crate root for convenience
pub use netlink::{Error, Result, Socket, SocketError};
