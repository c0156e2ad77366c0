//! Upstream connection pool interface consumed by the splitter.
//!
//! The splitter never touches sockets. Each sub-request is handed to a
//! [`ConnPool`] together with its routing key; the pool picks the upstream
//! owning that key, queues the request, and later delivers exactly one
//! callback. A concrete pool (consistent-hash sharding, per-host connection
//! slots, reconnection) lives outside this crate.

use std::rc::Rc;

use resp_value::Value;

/// Callbacks for one in-flight sub-request.
///
/// The pool invokes exactly one of these per accepted request, on the
/// splitter's thread, and never from inside [`ConnPool::make_request`]
/// itself. After [`RequestHandle::cancel`] neither is invoked.
pub trait RequestCallbacks {
    /// The upstream produced a reply.
    fn on_response(&self, value: Value);

    /// The upstream connection failed (reset, timeout) before a reply arrived.
    fn on_failure(&self);
}

/// Cancellable ticket for one in-flight sub-request.
///
/// Becomes inert once the pool has delivered a callback or `cancel` has
/// run. `cancel` is idempotent.
pub trait RequestHandle {
    /// Drop the sub-request; no callback is delivered afterwards.
    fn cancel(&self);
}

/// Owned handle to an accepted sub-request.
pub type PoolHandle = Box<dyn RequestHandle>;

/// Interface to the upstream pool, sharded by key.
pub trait ConnPool {
    /// Submit `request` to the upstream owning `hash_key`.
    ///
    /// Returns `None` when no healthy upstream owns the key; the caller
    /// synthesizes a `no upstream host` reply in that case and the pool
    /// retains nothing. On `Some`, the pool holds `callbacks` until it
    /// delivers exactly one of [`RequestCallbacks::on_response`] /
    /// [`RequestCallbacks::on_failure`], or until the handle is cancelled.
    fn make_request(
        &self,
        hash_key: &[u8],
        request: &Value,
        callbacks: Rc<dyn RequestCallbacks>,
    ) -> Option<PoolHandle>;

    /// Shard index `hash_key` maps to. Diagnostic only.
    fn shard_id(&self, hash_key: &[u8]) -> usize;
}
