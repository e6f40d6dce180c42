//! Decoders from rtnetlink messages to domain entities.
//!
//! Each decoder takes the message header and the payload following it
//! (fixed body plus attribute stream). A payload shorter than its fixed
//! body yields [`SocketError::WrongMessageLength`]; missing attributes are
//! represented as absent fields, never as errors.

use super::attr::{AttrTable, get};
use super::entity::{
    Action, Address, Destination, Entity, Interface, InterfaceType, Route, Scope, Table,
};
use super::error::SocketError;
use super::message::{NlMsgHdr, NlMsgType};
use super::parse::parse_ip_addr;
use super::types::addr::ifa;
use super::types::link::ifla;
use super::types::route::rta;
use super::types::{AF_INET, AF_INET6, IfAddrMsg, IfInfoMsg, RtMsg};
use crate::util::ifname::NameResolver;

const RTA_SLOTS: usize = rta::MAX as usize + 1;
const IFA_SLOTS: usize = ifa::MAX as usize + 1;
const IFLA_SLOTS: usize = ifla::MAX as usize + 1;

/// Decode any route, address or link message.
///
/// Returns `None` for message types that carry no entity.
pub fn decode(
    header: &NlMsgHdr,
    payload: &[u8],
    resolver: &dyn NameResolver,
) -> Option<Result<Entity, SocketError>> {
    let entity = match header.nlmsg_type {
        NlMsgType::RTM_NEWROUTE | NlMsgType::RTM_DELROUTE => {
            decode_route(header, payload, resolver).map(Entity::Route)
        }
        NlMsgType::RTM_NEWADDR | NlMsgType::RTM_DELADDR => {
            decode_address(header, payload).map(Entity::Address)
        }
        NlMsgType::RTM_NEWLINK | NlMsgType::RTM_DELLINK => {
            decode_link(header, payload).map(Entity::Interface)
        }
        _ => return None,
    };
    Some(entity)
}

/// Split a payload into its fixed body and attribute stream.
fn split_body<'a, T>(
    payload: &'a [u8],
    size: usize,
    parse: impl FnOnce(&mut &'a [u8]) -> super::parse::PResult<T>,
) -> Result<(T, &'a [u8]), SocketError> {
    if payload.len() < size {
        return Err(SocketError::WrongMessageLength);
    }
    let mut input = payload;
    let body = parse(&mut input).map_err(|_| SocketError::WrongMessageLength)?;
    Ok((body, &payload[size..]))
}

/// Decode an RTM_NEWROUTE / RTM_DELROUTE message.
pub fn decode_route(
    header: &NlMsgHdr,
    payload: &[u8],
    resolver: &dyn NameResolver,
) -> Result<Route, SocketError> {
    let (msg, attrs) = split_body(payload, RtMsg::SIZE, RtMsg::parse)?;
    let family = msg.rtm_family;
    if family != AF_INET && family != AF_INET6 {
        return Err(SocketError::InvalidFamily);
    }

    let attrs = AttrTable::<RTA_SLOTS>::parse(attrs);

    let table_id = attrs
        .get(rta::TABLE)
        .and_then(get::u32_ne)
        .unwrap_or(msg.rtm_table as u32);

    let destination = attrs
        .get(rta::DST)
        .and_then(|data| parse_ip_addr(data, family))
        .map(|addr| Destination::network(addr, msg.rtm_dst_len))
        .unwrap_or_default();

    let interface_name = attrs
        .get(rta::OIF)
        .and_then(get::u32_ne)
        .and_then(|index| resolver.resolve(index));

    Ok(Route {
        action: Action::from_msg_type(header.nlmsg_type),
        table: Table::from_id(table_id),
        destination,
        gateway: attrs
            .get(rta::GATEWAY)
            .and_then(|data| parse_ip_addr(data, family)),
        interface_name,
        source: attrs
            .get(rta::SRC)
            .and_then(|data| parse_ip_addr(data, family)),
    })
}

/// Decode an RTM_NEWADDR / RTM_DELADDR message.
pub fn decode_address(header: &NlMsgHdr, payload: &[u8]) -> Result<Address, SocketError> {
    let (msg, attrs) = split_body(payload, IfAddrMsg::SIZE, IfAddrMsg::parse)?;
    let attrs = AttrTable::<IFA_SLOTS>::parse(attrs);
    let family = msg.ifa_family;
    let addr = |kind| attrs.get(kind).and_then(|data| parse_ip_addr(data, family));

    Ok(Address {
        action: Action::from_msg_type(header.nlmsg_type),
        index: msg.ifa_index,
        address: addr(ifa::ADDRESS),
        prefix_len: msg.ifa_prefixlen,
        broadcast: addr(ifa::BROADCAST),
        local: addr(ifa::LOCAL),
        scope: Scope::from_wire(msg.ifa_scope),
    })
}

/// Decode an RTM_NEWLINK / RTM_DELLINK message.
pub fn decode_link(header: &NlMsgHdr, payload: &[u8]) -> Result<Interface, SocketError> {
    let (msg, attrs) = split_body(payload, IfInfoMsg::SIZE, IfInfoMsg::parse)?;
    let attrs = AttrTable::<IFLA_SLOTS>::parse(attrs);

    Ok(Interface {
        action: Action::from_msg_type(header.nlmsg_type),
        index: msg.ifi_index as u32,
        kind: InterfaceType::from_arphrd(msg.ifi_type),
        name: attrs.get(ifla::IFNAME).map(get::string).unwrap_or_default(),
    })
}
