//! Splitter counters.
//!
//! Counter names embed a runtime `stat_prefix` and the per-command set is
//! table-driven, so these are metriken dynamic metrics rather than
//! `#[metric]` statics. They appear in the process-wide metriken registry
//! alongside the runtime's own counters.

use metriken::{Counter, DynBoxedMetric, MetricBuilder};

/// Global splitter counters, registered under the configured prefix.
pub struct SplitterStats {
    /// Requests rejected before dispatch (top-level shape checks).
    pub invalid_request: DynBoxedMetric<Counter>,
    /// Verbs that resolved to no handler.
    pub unsupported_command: DynBoxedMetric<Counter>,
}

impl SplitterStats {
    pub(crate) fn new(stat_prefix: &str) -> Self {
        Self {
            invalid_request: MetricBuilder::new(format!("{stat_prefix}splitter.invalid_request"))
                .build(Counter::new()),
            unsupported_command: MetricBuilder::new(format!(
                "{stat_prefix}splitter.unsupported_command"
            ))
            .build(Counter::new()),
        }
    }
}

/// Per-command request counter: `<prefix>command.<name>.total`.
pub(crate) fn command_counter(stat_prefix: &str, name: &str) -> DynBoxedMetric<Counter> {
    MetricBuilder::new(format!("{stat_prefix}command.{name}.total")).build(Counter::new())
}
