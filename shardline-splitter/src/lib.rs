//! Command splitter for the shardline Redis proxy.
//!
//! The splitter sits between a protocol-decoded client command and the
//! upstream connection pool. Single-key commands are routed whole to the
//! shard owning their key; multi-key commands (`MGET`, `MSET`, and the
//! sum-result group `DEL`/`EXISTS`/`TOUCH`/`UNLINK`) are fragmented into one
//! sub-request per key, dispatched in parallel, and their replies folded
//! back into the single reply the client expects, preserving key order.
//!
//! Everything runs on a single thread: pool completions, failures, and
//! cancellation all happen as callbacks on the dispatching thread, so the
//! in-flight request state uses `Rc` and interior mutability instead of
//! locks.
//!
//! Failures never surface as `Result`: shape and arity rejections, missing
//! upstreams, connection failures, and partial aggregate failures all become
//! RESP error replies (see [`ReplyError`] for the taxonomy).
//!
//! # Example
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use resp_value::Value;
//! use shardline_splitter::{
//!     ConnPool, PoolHandle, RequestCallbacks, SplitCallbacks, Splitter,
//! };
//!
//! // A real pool shards by key and owns the upstream connections.
//! struct Pool;
//!
//! impl ConnPool for Pool {
//!     fn make_request(
//!         &self,
//!         _hash_key: &[u8],
//!         _request: &Value,
//!         _callbacks: Rc<dyn RequestCallbacks>,
//!     ) -> Option<PoolHandle> {
//!         None
//!     }
//!
//!     fn shard_id(&self, _hash_key: &[u8]) -> usize {
//!         0
//!     }
//! }
//!
//! struct Reply;
//!
//! impl SplitCallbacks for Reply {
//!     fn on_response(&self, value: Value) {
//!         println!("{value}");
//!     }
//! }
//!
//! let splitter = Splitter::new(Rc::new(Pool), "redis.");
//! let command = Value::array(vec![
//!     Value::bulk_string(b"get"),
//!     Value::bulk_string(b"foo"),
//! ]);
//! // Hold the returned handle to keep the request cancellable; `None`
//! // means the reply was already delivered synchronously.
//! let in_flight = splitter.make_request(&command, Rc::new(Reply));
//! # drop(in_flight);
//! ```

pub mod commands;
mod pool;
mod reply;
mod request;
mod splitter;
mod stats;

pub use pool::{ConnPool, PoolHandle, RequestCallbacks, RequestHandle};
pub use reply::{ReplyError, make_error};
pub use request::SplitRequest;
pub use splitter::{SplitCallbacks, Splitter};
pub use stats::SplitterStats;
