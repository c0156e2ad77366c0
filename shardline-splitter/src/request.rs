//! Split-request lifetime objects.
//!
//! One [`SplitRequest`] is created per accepted client command and lives
//! until its reply is delivered or the caller cancels. Fan-out commands
//! dispatch one sub-request per key; pool handles live in parent-owned
//! contiguous storage and each fragment carries the index of the reply slot
//! it fills, so children may complete in any order while the aggregate
//! preserves the client's key order.
//!
//! Everything here is single-threaded. The request state is co-owned by the
//! caller's handle and by the pool's per-fragment callback slots, hence the
//! `Rc` + interior mutability shape; there are no locks and no suspension
//! points other than "the pool holds a handle and will call back later".

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

use resp_value::Value;

use crate::pool::{ConnPool, PoolHandle, RequestCallbacks};
use crate::reply::{self, ReplyError};
use crate::splitter::SplitCallbacks;

/// Reply being accumulated, tagged by request kind.
enum Reply {
    /// Single sub-request; the upstream reply passes through unchanged.
    Passthrough,
    /// MGET: per-key slots, pre-filled Null, filled as children land.
    Gather(Vec<Value>),
    /// MSET: every child must answer `+OK`.
    AllOk,
    /// DEL-style fan-out: integer replies are summed.
    Sum(i64),
    /// Terminal: the reply has been handed to the client callbacks.
    Delivered,
}

struct RequestInner {
    callbacks: Rc<dyn SplitCallbacks>,
    /// One slot per fragment, indexed by fragment. Cleared on completion
    /// and on cancellation.
    handles: RefCell<Vec<Option<PoolHandle>>>,
    num_pending: Cell<usize>,
    error_count: Cell<u32>,
    reply: RefCell<Reply>,
}

/// Caller-held handle to an in-flight split request.
///
/// Dropping the handle cancels any outstanding sub-requests first, so the
/// pool can never call back into a dead request.
pub struct SplitRequest {
    inner: Rc<RequestInner>,
}

impl SplitRequest {
    /// Cancel all outstanding sub-requests.
    ///
    /// Idempotent, and a no-op once the reply has been delivered. No client
    /// callback fires after cancellation.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

impl Drop for SplitRequest {
    fn drop(&mut self) {
        self.inner.cancel();
    }
}

impl RequestInner {
    fn new(callbacks: Rc<dyn SplitCallbacks>, children: usize, reply: Reply) -> Rc<Self> {
        Rc::new(Self {
            callbacks,
            handles: RefCell::new((0..children).map(|_| None).collect()),
            num_pending: Cell::new(children),
            error_count: Cell::new(0),
            reply: RefCell::new(reply),
        })
    }

    fn cancel(&self) {
        for slot in self.handles.borrow_mut().iter_mut() {
            if let Some(handle) = slot.take() {
                handle.cancel();
            }
        }
    }

    /// One child produced a reply (or a synthesized error). Folds it into
    /// the aggregate and delivers the client reply when the last child lands.
    fn on_child_response(&self, index: usize, value: Value) {
        self.handles.borrow_mut()[index] = None;

        let passthrough = {
            let mut reply = self.reply.borrow_mut();
            match &mut *reply {
                Reply::Passthrough => {
                    *reply = Reply::Delivered;
                    Some(value)
                }
                Reply::Gather(slots) => {
                    if gather_slot(&mut slots[index], value) {
                        self.error_count.set(self.error_count.get() + 1);
                    }
                    None
                }
                Reply::AllOk => {
                    if !matches!(&value, Value::SimpleString(s) if &s[..] == b"OK") {
                        self.error_count.set(self.error_count.get() + 1);
                    }
                    None
                }
                Reply::Sum(total) => {
                    match value {
                        Value::Integer(n) => *total += n,
                        _ => self.error_count.set(self.error_count.get() + 1),
                    }
                    None
                }
                Reply::Delivered => {
                    debug_assert!(false, "child response after delivery");
                    return;
                }
            }
        };

        if let Some(value) = passthrough {
            debug_assert_eq!(self.num_pending.get(), 1);
            self.num_pending.set(0);
            self.deliver(value);
            return;
        }

        debug_assert!(self.num_pending.get() > 0);
        self.num_pending.set(self.num_pending.get() - 1);
        if self.num_pending.get() > 0 {
            return;
        }

        let errors = self.error_count.get();
        let value = match mem::replace(&mut *self.reply.borrow_mut(), Reply::Delivered) {
            Reply::Gather(slots) => Value::Array(slots),
            Reply::AllOk if errors == 0 => reply::ok(),
            Reply::Sum(total) if errors == 0 => Value::Integer(total),
            Reply::AllOk | Reply::Sum(_) => {
                reply::make_error(ReplyError::FinishedWithErrors(errors))
            }
            Reply::Passthrough | Reply::Delivered => {
                debug_assert!(false, "aggregate delivery in a non-aggregate state");
                return;
            }
        };
        self.deliver(value);
    }

    fn deliver(&self, value: Value) {
        log::debug!("response: '{value}'");
        self.callbacks.on_response(value);
    }
}

impl Drop for RequestInner {
    fn drop(&mut self) {
        debug_assert!(
            self.handles.borrow().iter().all(Option::is_none),
            "split request dropped with live pool handles"
        );
    }
}

/// Fold one MGET child reply into its slot. Returns true when the slot
/// counts as an error.
fn gather_slot(slot: &mut Value, value: Value) -> bool {
    match value {
        Value::BulkString(data) => {
            *slot = Value::BulkString(data);
            false
        }
        Value::Error(text) => {
            *slot = Value::Error(text);
            true
        }
        // A single-key get can surface as a one-element array depending on
        // the upstream decoder; unwrap it.
        Value::Array(elements) => {
            if let Some(first) = elements.into_iter().next() {
                *slot = first;
            }
            false
        }
        Value::Integer(_) | Value::SimpleString(_) => {
            *slot = reply::make_error(ReplyError::UpstreamProtocolError);
            true
        }
        Value::Null => false,
    }
}

/// Index-carrying shim the pool calls back through.
struct Fragment {
    parent: Rc<RequestInner>,
    index: usize,
}

impl RequestCallbacks for Fragment {
    fn on_response(&self, value: Value) {
        self.parent.on_child_response(self.index, value);
    }

    fn on_failure(&self) {
        self.parent
            .on_child_response(self.index, reply::make_error(ReplyError::UpstreamFailure));
    }
}

/// Dispatch one fragment. On acceptance the handle lands in the parent's
/// slot; with no upstream the slot is reduced immediately with a synthesized
/// error.
fn dispatch_fragment(
    pool: &dyn ConnPool,
    inner: &Rc<RequestInner>,
    index: usize,
    hash_key: &[u8],
    request: &Value,
) {
    let fragment: Rc<dyn RequestCallbacks> = Rc::new(Fragment {
        parent: Rc::clone(inner),
        index,
    });
    match pool.make_request(hash_key, request, fragment) {
        Some(handle) => inner.handles.borrow_mut()[index] = Some(handle),
        None => inner.on_child_response(index, reply::make_error(ReplyError::NoUpstreamHost)),
    }
}

fn hash_key(args: &[Value], index: usize) -> &[u8] {
    // Shape is validated before dispatch: every element is a bulk string.
    args[index].as_bytes().unwrap_or_default()
}

fn lowered_verb(args: &[Value]) -> String {
    let verb = args.first().and_then(Value::as_bytes).unwrap_or_default();
    String::from_utf8_lossy(verb).to_ascii_lowercase()
}

/// Single-key command: route by `args[key_index]`, forward the client
/// command unchanged.
pub(crate) fn start_simple(
    pool: &dyn ConnPool,
    request: &Value,
    key_index: usize,
    callbacks: Rc<dyn SplitCallbacks>,
) -> Option<SplitRequest> {
    let args = request.as_array().unwrap_or_default();
    let inner = RequestInner::new(callbacks, 1, Reply::Passthrough);
    dispatch_fragment(pool, &inner, 0, hash_key(args, key_index), request);
    (inner.num_pending.get() > 0).then(|| SplitRequest { inner })
}

/// `EVAL script numkeys key [key ...] arg [arg ...]`: route the whole
/// command by the first declared key.
///
/// A script declaring no keys cannot be hashed, so anything shorter than
/// `EVAL script numkeys key` is rejected. Scripts spanning shards are not
/// supported; hashing by the first key colocates the single-key case.
pub(crate) fn start_eval(
    pool: &dyn ConnPool,
    request: &Value,
    callbacks: Rc<dyn SplitCallbacks>,
) -> Option<SplitRequest> {
    let args = request.as_array().unwrap_or_default();
    if args.len() < 4 {
        callbacks.on_response(reply::make_error(ReplyError::WrongNumberOfArguments(
            lowered_verb(args),
        )));
        return None;
    }
    start_simple(pool, request, 3, callbacks)
}

/// `MGET key [key ...]`: one single-key `mget` per key, gathered into an
/// array preserving key order.
pub(crate) fn start_mget(
    pool: &dyn ConnPool,
    request: &Value,
    callbacks: Rc<dyn SplitCallbacks>,
) -> Option<SplitRequest> {
    let args = request.as_array().unwrap_or_default();
    let keys = &args[1..];
    let inner = RequestInner::new(
        callbacks,
        keys.len(),
        Reply::Gather(vec![Value::Null; keys.len()]),
    );

    for (index, key) in keys.iter().enumerate() {
        let sub_request = Value::Array(vec![Value::bulk_string(b"mget"), key.clone()]);
        let hash_key = key.as_bytes().unwrap_or_default();
        log::debug!(
            "parallel get '{sub_request}' to shard {}",
            pool.shard_id(hash_key)
        );
        dispatch_fragment(pool, &inner, index, hash_key, &sub_request);
    }

    (inner.num_pending.get() > 0).then(|| SplitRequest { inner })
}

/// `MSET key value [key value ...]`: one `set` per pair, keyed on the pair's
/// key. Replies `+OK` only when every child did.
pub(crate) fn start_mset(
    pool: &dyn ConnPool,
    request: &Value,
    callbacks: Rc<dyn SplitCallbacks>,
) -> Option<SplitRequest> {
    let args = request.as_array().unwrap_or_default();
    if (args.len() - 1) % 2 != 0 {
        callbacks.on_response(reply::make_error(ReplyError::WrongNumberOfArguments(
            lowered_verb(args),
        )));
        return None;
    }

    let pairs = (args.len() - 1) / 2;
    let inner = RequestInner::new(callbacks, pairs, Reply::AllOk);

    for (index, pair) in args[1..].chunks_exact(2).enumerate() {
        let sub_request = Value::Array(vec![
            Value::bulk_string(b"set"),
            pair[0].clone(),
            pair[1].clone(),
        ]);
        log::debug!("parallel set '{sub_request}'");
        dispatch_fragment(
            pool,
            &inner,
            index,
            pair[0].as_bytes().unwrap_or_default(),
            &sub_request,
        );
    }

    (inner.num_pending.get() > 0).then(|| SplitRequest { inner })
}

/// Fan-out for commands whose aggregate reply is the sum of per-key integer
/// replies (`DEL`, `EXISTS`, `TOUCH`, `UNLINK`).
pub(crate) fn start_sum(
    pool: &dyn ConnPool,
    request: &Value,
    callbacks: Rc<dyn SplitCallbacks>,
) -> Option<SplitRequest> {
    let args = request.as_array().unwrap_or_default();
    let keys = &args[1..];
    let inner = RequestInner::new(callbacks, keys.len(), Reply::Sum(0));

    for (index, key) in keys.iter().enumerate() {
        let sub_request = Value::Array(vec![args[0].clone(), key.clone()]);
        log::debug!("parallel '{sub_request}'");
        dispatch_fragment(
            pool,
            &inner,
            index,
            key.as_bytes().unwrap_or_default(),
            &sub_request,
        );
    }

    (inner.num_pending.get() > 0).then(|| SplitRequest { inner })
}
