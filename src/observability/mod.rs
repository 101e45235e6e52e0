//! Observability for the mapper
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Lock-free counters
//!
//! Observability is read-only: it never changes the outcome of a mapping call.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MapperMetrics, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
