//! Typed dump requests and their accumulated responses.
//!
//! A request kind binds a GET message type, its fixed body, and the entity
//! its replies decode to. The set of kinds is closed: [`LinkRequest`],
//! [`AddressRequest`] and [`RouteRequest`].
//!
//! # Example
//!
//! ```ignore
//! use rtnl::{Socket, RouteRequest, ReceiveMode, AF_INET};
//!
//! let mut socket = Socket::open(&[])?;
//! socket.send_request::<RouteRequest>(AF_INET)?;
//! let routes = socket.receive_typed::<RouteRequest>(ReceiveMode::Wait)?;
//! for route in &routes.data {
//!     println!("{}", route);
//! }
//! ```

use std::fmt;

use bytes::{BufMut, BytesMut};
use zerocopy::{Immutable, IntoBytes};

use super::entity::{Address, Entity, Interface, Route};
use super::error::SocketError;
use super::message::{NLM_F_DUMP, NLM_F_REQUEST, NlMsgHdr, NlMsgType};
use super::types::{IfAddrMsg, IfInfoMsg, RtMsg};

/// Correlation key of one request: sequence number and origin port ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Id {
    pub sequence: u32,
    pub pid: u32,
}

impl Id {
    pub fn new(sequence: u32, pid: u32) -> Self {
        Self { sequence, pid }
    }
}

impl From<&NlMsgHdr> for Id {
    fn from(header: &NlMsgHdr) -> Self {
        Self::new(header.nlmsg_seq, header.nlmsg_pid)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sequence, self.pid)
    }
}

/// The entities accumulated for one completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    pub id: Id,
    pub data: Vec<T>,
}

/// Result of one receive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// A completed link dump.
    Links(Response<Interface>),
    /// A completed address dump.
    Addresses(Response<Address>),
    /// A completed route dump.
    Routes(Response<Route>),
    /// An unsolicited multicast notification.
    Notification(Entity),
}

mod private {
    pub trait Sealed {}
}

/// A kind of dump request.
///
/// This trait is sealed and cannot be implemented outside this crate.
pub trait RequestKind: private::Sealed + Sized {
    /// Fixed message body sent after the header.
    type Body: IntoBytes + Immutable + Copy + fmt::Debug;
    /// Entity the replies decode to.
    type Item: fmt::Debug;

    /// GET message type of the request.
    const MSG_TYPE: u16;
    /// Short name for logging.
    const NAME: &'static str;

    /// Build the body for the given address family.
    fn body(family: u8) -> Self::Body;

    #[doc(hidden)]
    fn wrap(request: Request<Self>) -> Message;

    #[doc(hidden)]
    fn unwrap_response(received: Received) -> Result<Response<Self::Item>, SocketError>;
}

/// Dump of all links (RTM_GETLINK).
#[derive(Debug, Clone, Copy)]
pub struct LinkRequest;

/// Dump of all addresses (RTM_GETADDR).
#[derive(Debug, Clone, Copy)]
pub struct AddressRequest;

/// Dump of all routes (RTM_GETROUTE).
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest;

impl private::Sealed for LinkRequest {}
impl private::Sealed for AddressRequest {}
impl private::Sealed for RouteRequest {}

impl RequestKind for LinkRequest {
    type Body = IfInfoMsg;
    type Item = Interface;

    const MSG_TYPE: u16 = NlMsgType::RTM_GETLINK;
    const NAME: &'static str = "link";

    fn body(family: u8) -> IfInfoMsg {
        IfInfoMsg::new().with_family(family)
    }

    fn wrap(request: Request<Self>) -> Message {
        Message::Link(request)
    }

    fn unwrap_response(received: Received) -> Result<Response<Interface>, SocketError> {
        match received {
            Received::Links(response) => Ok(response),
            _ => Err(SocketError::MessageTypeMismatch),
        }
    }
}

impl RequestKind for AddressRequest {
    type Body = IfAddrMsg;
    type Item = Address;

    const MSG_TYPE: u16 = NlMsgType::RTM_GETADDR;
    const NAME: &'static str = "address";

    fn body(family: u8) -> IfAddrMsg {
        IfAddrMsg::new().with_family(family)
    }

    fn wrap(request: Request<Self>) -> Message {
        Message::Address(request)
    }

    fn unwrap_response(received: Received) -> Result<Response<Address>, SocketError> {
        match received {
            Received::Addresses(response) => Ok(response),
            _ => Err(SocketError::MessageTypeMismatch),
        }
    }
}

impl RequestKind for RouteRequest {
    type Body = RtMsg;
    type Item = Route;

    const MSG_TYPE: u16 = NlMsgType::RTM_GETROUTE;
    const NAME: &'static str = "route";

    fn body(family: u8) -> RtMsg {
        RtMsg::new().with_family(family)
    }

    fn wrap(request: Request<Self>) -> Message {
        Message::Route(request)
    }

    fn unwrap_response(received: Received) -> Result<Response<Route>, SocketError> {
        match received {
            Received::Routes(response) => Ok(response),
            _ => Err(SocketError::MessageTypeMismatch),
        }
    }
}

/// One dump request of kind `K` and the items received for it so far.
#[derive(Debug)]
pub struct Request<K: RequestKind> {
    header: NlMsgHdr,
    body: K::Body,
    items: Vec<K::Item>,
}

impl<K: RequestKind> Request<K> {
    /// Create a dump request with identity `sequence:pid`.
    pub fn new(family: u8, sequence: u32, pid: u32) -> Self {
        let body = K::body(family);
        let header = NlMsgHdr::new(
            K::MSG_TYPE,
            NLM_F_REQUEST | NLM_F_DUMP,
            std::mem::size_of::<K::Body>(),
        )
        .with_identity(sequence, pid);

        Self {
            header,
            body,
            items: Vec::new(),
        }
    }

    /// Identity of this request.
    pub fn id(&self) -> Id {
        Id::from(&self.header)
    }

    /// Wire header.
    pub fn header(&self) -> &NlMsgHdr {
        &self.header
    }

    /// Items received so far.
    pub fn items(&self) -> &[K::Item] {
        &self.items
    }

    /// Append one decoded item.
    pub fn add_item(&mut self, item: K::Item) {
        self.items.push(item);
    }

    /// Consume the request, yielding its identity and items.
    pub fn into_response(self) -> Response<K::Item> {
        Response {
            id: self.id(),
            data: self.items,
        }
    }

    /// Serialize header and body into one datagram.
    pub fn encode(&self) -> BytesMut {
        let body = self.body.as_bytes();
        let mut buf = BytesMut::with_capacity(self.header.nlmsg_len as usize);
        buf.put_slice(self.header.as_bytes());
        buf.put_slice(body);
        buf
    }
}

/// The in-flight request of a socket, whatever its kind.
#[derive(Debug)]
pub enum Message {
    Link(Request<LinkRequest>),
    Address(Request<AddressRequest>),
    Route(Request<RouteRequest>),
}

impl Message {
    /// Identity of the wrapped request.
    pub fn id(&self) -> Id {
        match self {
            Self::Link(r) => r.id(),
            Self::Address(r) => r.id(),
            Self::Route(r) => r.id(),
        }
    }

    /// Short name of the wrapped request kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Link(_) => LinkRequest::NAME,
            Self::Address(_) => AddressRequest::NAME,
            Self::Route(_) => RouteRequest::NAME,
        }
    }

    /// Number of items received so far.
    pub fn len(&self) -> usize {
        match self {
            Self::Link(r) => r.items().len(),
            Self::Address(r) => r.items().len(),
            Self::Route(r) => r.items().len(),
        }
    }

    /// Check if nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the wrapped request.
    pub fn encode(&self) -> BytesMut {
        match self {
            Self::Link(r) => r.encode(),
            Self::Address(r) => r.encode(),
            Self::Route(r) => r.encode(),
        }
    }

    /// Route a decoded reply into the accumulator.
    ///
    /// The reply identity must equal the request identity and the entity
    /// must be of the request's item type.
    pub fn add_response(&mut self, id: Id, entity: Entity) -> Result<(), SocketError> {
        if id != self.id() {
            return Err(SocketError::MessageIdMismatch);
        }
        match (self, entity) {
            (Self::Link(r), Entity::Interface(item)) => r.add_item(item),
            (Self::Address(r), Entity::Address(item)) => r.add_item(item),
            (Self::Route(r), Entity::Route(item)) => r.add_item(item),
            _ => return Err(SocketError::MessageTypeMismatch),
        }
        Ok(())
    }

    /// Consume the request, yielding the completed response.
    pub fn into_received(self) -> Received {
        match self {
            Self::Link(r) => Received::Links(r.into_response()),
            Self::Address(r) => Received::Addresses(r.into_response()),
            Self::Route(r) => Received::Routes(r.into_response()),
        }
    }
}

impl<K: RequestKind> From<Request<K>> for Message {
    fn from(request: Request<K>) -> Self {
        K::wrap(request)
    }
}
