//! Synchronous rtnetlink client.
//!
//! A [`Socket`] sends link, address and route dump requests and reassembles
//! the kernel replies into typed responses. Sockets joined to multicast
//! groups also surface change notifications, one per receive call.
//!
//! # Quick Start
//!
//! ```ignore
//! use rtnl::netlink::{LinkRequest, ReceiveMode, Socket, AF_UNSPEC};
//!
//! let mut socket = Socket::open(&[])?;
//! socket.send_request::<LinkRequest>(AF_UNSPEC)?;
//! let links = socket.receive_typed::<LinkRequest>(ReceiveMode::Wait)?;
//! for link in &links.data {
//!     println!("{}", link);
//! }
//! ```
//!
//! # Notifications
//!
//! ```ignore
//! use rtnl::netlink::{ReceiveMode, Received, Socket};
//!
//! let mut socket = Socket::builder().links(true).addresses(true).open()?;
//! loop {
//!     if let Received::Notification(entity) = socket.receive(ReceiveMode::Wait)? {
//!         println!("{}", entity);
//!     }
//! }
//! ```

pub mod attr;
mod channel;
pub mod decode;
pub mod entity;
mod error;
#[cfg(test)]
mod fixtures;
pub mod message;
pub mod parse;
mod receive;
pub mod request;
mod socket;
pub mod types;

pub use attr::{AttrTable, NlAttr};
pub use channel::{Channel, NetlinkChannel, ReceiveMode};
pub use entity::{
    Action, Address, Destination, Entity, Interface, InterfaceType, Route, Scope, Table,
};
pub use error::{Error, Result, SocketError};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use request::{
    AddressRequest, Id, LinkRequest, Message, Received, Request, RequestKind, Response,
    RouteRequest,
};
pub use socket::{Group, Groups, Socket, SocketBuilder, rtmgrp};
pub use types::{AF_INET, AF_INET6, AF_UNSPEC};
