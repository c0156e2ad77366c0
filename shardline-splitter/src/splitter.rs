//! Command dispatch.
//!
//! A [`Splitter`] holds the registry from lowercased command name to routing
//! strategy, built once at construction from the tables in
//! [`commands`](crate::commands) and immutable afterwards. The entry point
//! is [`make_request`](Splitter::make_request).

use std::collections::HashMap;
use std::rc::Rc;

use metriken::{Counter, DynBoxedMetric};
use resp_value::Value;

use crate::commands;
use crate::pool::ConnPool;
use crate::reply::{self, ReplyError};
use crate::request::{self, SplitRequest};
use crate::stats::{self, SplitterStats};

/// Receiver for the single reply of an accepted command.
pub trait SplitCallbacks {
    /// Invoked exactly once per accepted command, unless the split request
    /// is cancelled first.
    fn on_response(&self, value: Value);
}

/// Routing strategy for one command name. The set is closed; dispatch is a
/// match, not dynamic lookup.
#[derive(Debug, Clone, Copy)]
enum Route {
    /// Route whole command by the key at position 1, pass the reply through.
    Simple,
    /// Route whole command by the first declared script key (position 3).
    Eval,
    /// Fan out one read per key, gather an array in key order.
    MultiGet,
    /// Fan out one `set` per pair, reply `+OK` iff all children did.
    MultiSet,
    /// Fan out one sub-request per key, sum the integer replies.
    SumAcrossKeys,
}

struct HandlerEntry {
    total: DynBoxedMetric<Counter>,
    route: Route,
}

/// The command splitter instance for one proxy worker.
pub struct Splitter {
    pool: Rc<dyn ConnPool>,
    handlers: HashMap<Vec<u8>, HandlerEntry>,
    stats: SplitterStats,
}

impl Splitter {
    /// Build the dispatch registry. `stat_prefix` prefixes every counter
    /// name registered by this instance.
    pub fn new(pool: Rc<dyn ConnPool>, stat_prefix: &str) -> Self {
        let mut splitter = Splitter {
            pool,
            handlers: HashMap::new(),
            stats: SplitterStats::new(stat_prefix),
        };
        for name in commands::SIMPLE_COMMANDS {
            splitter.add_handler(stat_prefix, name, Route::Simple);
        }
        for name in commands::EVAL_COMMANDS {
            splitter.add_handler(stat_prefix, name, Route::Eval);
        }
        for name in commands::SUM_RESULT_COMMANDS {
            splitter.add_handler(stat_prefix, name, Route::SumAcrossKeys);
        }
        splitter.add_handler(stat_prefix, commands::MGET, Route::MultiGet);
        splitter.add_handler(stat_prefix, commands::MSET, Route::MultiSet);
        splitter
    }

    fn add_handler(&mut self, stat_prefix: &str, name: &str, route: Route) {
        let name = name.to_ascii_lowercase();
        let total = stats::command_counter(stat_prefix, &name);
        self.handlers
            .insert(name.into_bytes(), HandlerEntry { total, route });
    }

    /// Route one decoded client command.
    ///
    /// Returns the in-flight [`SplitRequest`] while sub-requests are
    /// outstanding — hold it to be able to cancel — or `None` when the
    /// command already completed synchronously (shape/arity rejections and
    /// fail-fast upstream errors; the reply has been delivered through
    /// `callbacks`).
    pub fn make_request(
        &self,
        request: &Value,
        callbacks: Rc<dyn SplitCallbacks>,
    ) -> Option<SplitRequest> {
        let Some(args) = request.as_array() else {
            return self.reject_invalid(&callbacks);
        };
        if args.len() < 2 || !args.iter().all(Value::is_bulk_string) {
            return self.reject_invalid(&callbacks);
        }

        let verb = args[0].as_bytes().unwrap_or_default();
        let Some(entry) = self.handlers.get(&commands::lowered(verb)) else {
            self.stats.unsupported_command.increment();
            let verb = String::from_utf8_lossy(verb).into_owned();
            callbacks.on_response(reply::make_error(ReplyError::UnsupportedCommand(verb)));
            return None;
        };

        log::debug!("splitting '{request}'");
        entry.total.increment();
        let pool = self.pool.as_ref();
        match entry.route {
            Route::Simple => request::start_simple(pool, request, 1, callbacks),
            Route::Eval => request::start_eval(pool, request, callbacks),
            Route::MultiGet => request::start_mget(pool, request, callbacks),
            Route::MultiSet => request::start_mset(pool, request, callbacks),
            Route::SumAcrossKeys => request::start_sum(pool, request, callbacks),
        }
    }

    fn reject_invalid(&self, callbacks: &Rc<dyn SplitCallbacks>) -> Option<SplitRequest> {
        self.stats.invalid_request.increment();
        callbacks.on_response(reply::make_error(ReplyError::InvalidRequest));
        None
    }

    /// Splitter-level counters (shape rejections, unknown verbs).
    pub fn stats(&self) -> &SplitterStats {
        &self.stats
    }

    /// Current request total for a routed command, by any-case name.
    pub fn command_total(&self, name: &str) -> Option<u64> {
        self.handlers
            .get(name.to_ascii_lowercase().as_bytes())
            .map(|entry| entry.total.value())
    }
}
