//! Error types for rtnetlink socket operations.
//!
//! Two independent domains are kept apart: [`Error::Io`] carries failures of
//! the underlying OS calls (errno plus its standard text), [`Error::Socket`]
//! carries protocol-level outcomes as a closed [`SocketError`] set.

use std::io;

/// Result type for rtnetlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during rtnetlink operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from a socket system call.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Protocol-level error raised while talking to the kernel.
    #[error("netlink socket error: {0}")]
    Socket(#[from] SocketError),
}

impl Error {
    /// Get the errno value if this is an OS-call error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Io(e) => e.raw_os_error(),
            Self::Socket(_) => None,
        }
    }

    /// Get the protocol error if this is a protocol-level error.
    pub fn socket_error(&self) -> Option<SocketError> {
        match self {
            Self::Socket(e) => Some(*e),
            Self::Io(_) => None,
        }
    }

    /// Check if a non-blocking receive found nothing to read (EAGAIN).
    pub fn is_would_block(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == io::ErrorKind::WouldBlock,
            Self::Socket(_) => false,
        }
    }

    /// Check if the dump was interrupted and must be restarted.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Socket(SocketError::Interrupted))
    }

    /// Check if a request was rejected because another one is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Socket(SocketError::Busy))
    }
}

/// Protocol-level errors.
///
/// The numeric codes are stable: `0` is reserved for "no error" and every
/// variant keeps the code returned by [`SocketError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SocketError {
    /// A request is already outstanding on this socket.
    #[error("socket busy: a request is already active")]
    Busy,

    /// The kernel flagged the dump as inconsistent (NLM_F_DUMP_INTR).
    #[error("dump interrupted: restart the request")]
    Interrupted,

    /// The kernel reported an error, or nothing could be classified.
    #[error("netlink error")]
    Error,

    /// A message was shorter than its fixed-size body.
    #[error("wrong message length")]
    WrongMessageLength,

    /// A route message carried an address family other than IPv4/IPv6.
    #[error("invalid address family")]
    InvalidFamily,

    /// Reserved: route is not in the main table.
    #[error("not the main routing table")]
    NotMainTable,

    /// The kernel sent a no-op message.
    #[error("no-op message")]
    Noop,

    /// A reply arrived while no request was active.
    #[error("no active request")]
    NoActiveRequest,

    /// A reply identity does not match the active request.
    #[error("message id mismatch")]
    MessageIdMismatch,

    /// A reply or result has a different kind than the one expected.
    #[error("message type mismatch")]
    MessageTypeMismatch,

    /// Reserved: message type not handled.
    #[error("unhandled message type")]
    UnhandledMessageType,
}

impl SocketError {
    /// All protocol errors in code order.
    pub const ALL: [SocketError; 11] = [
        Self::Busy,
        Self::Interrupted,
        Self::Error,
        Self::WrongMessageLength,
        Self::InvalidFamily,
        Self::NotMainTable,
        Self::Noop,
        Self::NoActiveRequest,
        Self::MessageIdMismatch,
        Self::MessageTypeMismatch,
        Self::UnhandledMessageType,
    ];

    /// Stable numeric code.
    pub fn code(self) -> i32 {
        match self {
            Self::Busy => 1,
            Self::Interrupted => 2,
            Self::Error => 3,
            Self::WrongMessageLength => 4,
            Self::InvalidFamily => 5,
            Self::NotMainTable => 6,
            Self::Noop => 7,
            Self::NoActiveRequest => 8,
            Self::MessageIdMismatch => 9,
            Self::MessageTypeMismatch => 10,
            Self::UnhandledMessageType => 11,
        }
    }

    /// Look up an error by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }

    /// Stable symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Busy => "Busy",
            Self::Interrupted => "Interrupted",
            Self::Error => "Error",
            Self::WrongMessageLength => "WrongMessageLength",
            Self::InvalidFamily => "InvalidFamily",
            Self::NotMainTable => "NotMainTable",
            Self::Noop => "Noop",
            Self::NoActiveRequest => "NoActiveRequest",
            Self::MessageIdMismatch => "MessageIdMismatch",
            Self::MessageTypeMismatch => "MessageTypeMismatch",
            Self::UnhandledMessageType => "UnhandledMessageType",
        }
    }
}
