//! Client-visible reply construction.
//!
//! The splitter never propagates failures as `Result`; every failure becomes
//! a RESP error value on the client connection. [`ReplyError`] enumerates
//! the protocol-layer failures and its `Display` strings are the exact wire
//! messages.

use bytes::Bytes;
use resp_value::Value;

/// Protocol-layer failures surfaced to clients as RESP error values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    /// Top-level request was not an array of at least two bulk strings.
    #[error("invalid request")]
    InvalidRequest,

    /// The verb resolved to no registered handler.
    #[error("unsupported command '{0}'")]
    UnsupportedCommand(String),

    /// Command-specific arity check failed.
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),

    /// The pool had no healthy upstream for the routing key.
    #[error("no upstream host")]
    NoUpstreamHost,

    /// The pool reported a connection failure for a sub-request.
    #[error("upstream failure")]
    UpstreamFailure,

    /// A child reply's type is incompatible with the aggregate being built.
    #[error("upstream protocol error")]
    UpstreamProtocolError,

    /// A write or numeric aggregate finished with failed children.
    #[error("finished with {0} error(s)")]
    FinishedWithErrors(u32),
}

/// Build the RESP error reply for a protocol-layer failure.
pub fn make_error(err: ReplyError) -> Value {
    Value::Error(Bytes::from(err.to_string()))
}

/// The `+OK` reply.
pub(crate) fn ok() -> Value {
    Value::simple_string(b"OK")
}
