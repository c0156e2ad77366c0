//! Decoded RESP value tree.
//!
//! RESP2 defines the following value types:
//! - Simple String: `+OK\r\n`
//! - Error: `-ERR message\r\n`
//! - Integer: `:1000\r\n`
//! - Bulk String: `$6\r\nfoobar\r\n`
//! - Null Bulk String: `$-1\r\n`
//! - Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
//!
//! This crate models RESP at the *decoded* level only: the tree a wire codec
//! produces from client commands and upstream replies, and the tree handed
//! back to a codec for encoding. Null bulk strings and null arrays both
//! decode to [`Value::Null`].
//!
//! String payloads are [`bytes::Bytes`], so cloning a value (for example
//! when a proxy fans a key list out into per-key sub-requests) shares the
//! underlying buffers instead of copying them.

use std::fmt;

use bytes::Bytes;

/// A RESP protocol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Simple string: `+OK\r\n`
    SimpleString(Bytes),
    /// Error: `-ERR message\r\n`
    Error(Bytes),
    /// Integer: `:1000\r\n`
    Integer(i64),
    /// Bulk string: `$6\r\nfoobar\r\n`
    BulkString(Bytes),
    /// Null value: `$-1\r\n` or `*-1\r\n`
    Null,
    /// Array: `*2\r\n...`
    Array(Vec<Value>),
}

impl Value {
    // ── Constructors ────────────────────────────────────────────────────

    /// Create a simple string value.
    #[inline]
    pub fn simple_string(s: &[u8]) -> Self {
        Value::SimpleString(Bytes::copy_from_slice(s))
    }

    /// Create an error value.
    #[inline]
    pub fn error(msg: &[u8]) -> Self {
        Value::Error(Bytes::copy_from_slice(msg))
    }

    /// Create an integer value.
    #[inline]
    pub fn integer(n: i64) -> Self {
        Value::Integer(n)
    }

    /// Create a bulk string value.
    #[inline]
    pub fn bulk_string(data: &[u8]) -> Self {
        Value::BulkString(Bytes::copy_from_slice(data))
    }

    /// Create a null value.
    #[inline]
    pub fn null() -> Self {
        Value::Null
    }

    /// Create an array value.
    #[inline]
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(elements)
    }

    // ── Type checks ─────────────────────────────────────────────────────

    /// Returns true if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an error value.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Returns true if this is a simple string.
    #[inline]
    pub fn is_simple_string(&self) -> bool {
        matches!(self, Value::SimpleString(_))
    }

    /// Returns true if this is a bulk string.
    #[inline]
    pub fn is_bulk_string(&self) -> bool {
        matches!(self, Value::BulkString(_))
    }

    /// Returns true if this is an integer.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns true if this is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Returns the value as bytes if it's a string type (simple, bulk, or error).
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::SimpleString(s) | Value::BulkString(s) | Value::Error(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

/// Compact single-line rendering for diagnostics and log lines.
///
/// String payloads are rendered lossily; this is not a wire format.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::SimpleString(s) | Value::BulkString(s) => {
                write!(f, "\"{}\"", String::from_utf8_lossy(s))
            }
            Value::Error(msg) => write!(f, "error({})", String::from_utf8_lossy(msg)),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Null => f.write_str("null"),
            Value::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
        }
    }
}
