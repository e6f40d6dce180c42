//! Receive path: datagram reassembly, classification and demultiplexing.
//!
//! Replies whose origin port ID equals the socket's go into the active
//! request; anything else is a notification. One call returns either a
//! completed dump or a single notification. A dump spanning several
//! datagrams is read in one call.

use bytes::BytesMut;
use tracing::{debug, trace};

use super::channel::{Channel, ReceiveMode};
use super::decode::decode;
use super::entity::Entity;
use super::error::{Result, SocketError};
use super::message::{MessageIter, NlMsgHdr};
use super::request::{Id, Received};
use super::socket::Socket;

impl<C: Channel> Socket<C> {
    /// Receive the next completed dump or notification.
    ///
    /// With [`ReceiveMode::Nonblock`] an empty queue fails with an I/O error
    /// for which [`Error::is_would_block`](super::Error::is_would_block)
    /// holds.
    pub fn receive(&mut self, mode: ReceiveMode) -> Result<Received> {
        let mut notification: Option<Entity> = None;

        loop {
            let datagram = self.read_datagram(mode)?;
            trace!(len = datagram.len(), "received datagram");

            // Classified from the raw header, even when its length is bad.
            if let Ok(first) = NlMsgHdr::parse(&mut &datagram[..]) {
                if first.is_dump_interrupted() {
                    debug!(seq = first.nlmsg_seq, pid = first.nlmsg_pid, "dump interrupted");
                    return Err(SocketError::Interrupted.into());
                }
                if first.is_error() {
                    debug!(seq = first.nlmsg_seq, pid = first.nlmsg_pid, "kernel reported error");
                    return Err(SocketError::Error.into());
                }
                if first.is_noop() {
                    debug!(seq = first.nlmsg_seq, "no-op message");
                    return Err(SocketError::Noop.into());
                }
                if first.is_done() {
                    return self.finish_dump(&first);
                }
            }

            for (header, payload) in MessageIter::new(&datagram) {
                trace!(
                    msg_type = header.nlmsg_type,
                    seq = header.nlmsg_seq,
                    pid = header.nlmsg_pid,
                    "scanning message"
                );

                if header.is_done() {
                    if let Some(entity) = notification.take() {
                        return Ok(Received::Notification(entity));
                    }
                    return self.finish_dump(&header);
                }

                let Some(entity) = decode(&header, payload, self.resolver()) else {
                    trace!(msg_type = header.nlmsg_type, "skipping unhandled message type");
                    continue;
                };
                let entity = entity?;

                if header.nlmsg_pid == self.pid {
                    let active = self.active.as_mut().ok_or(SocketError::NoActiveRequest)?;
                    active.add_response(Id::from(&header), entity)?;
                } else if notification.is_none() {
                    notification = Some(entity);
                }
            }

            if self.active.is_none() {
                break;
            }
        }

        match notification {
            Some(entity) => Ok(Received::Notification(entity)),
            None => Err(SocketError::Error.into()),
        }
    }

    /// Read one whole datagram, sized by a truncation-safe peek.
    fn read_datagram(&mut self, mode: ReceiveMode) -> Result<BytesMut> {
        let len = self.channel.peek_len(mode)?;
        let mut buf = BytesMut::with_capacity(len);
        let n = self.channel.recv(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Complete the active request named by a terminator message.
    fn finish_dump(&mut self, header: &NlMsgHdr) -> Result<Received> {
        let id = Id::from(header);
        let message = self
            .active
            .take_if(|m| m.id() == id)
            .ok_or(SocketError::MessageIdMismatch)?;

        debug!(
            seq = id.sequence,
            kind = message.kind_name(),
            items = message.len(),
            "dump complete"
        );
        Ok(message.into_received())
    }
}
