//! Observability for fieldguard
//!
//! - Structured logging (JSON lines on stderr)
//! - Lock-free counters
//! - Typed lifecycle and validation events
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes a validation outcome
//! 2. No async or background threads
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use fieldguard::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::SchemasLoaded, &[("count", "3")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_documents_validated();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::BootStart);
        log_event(Event::Serving);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("schema_dir", "/tmp/schemas")]);
    }

    #[test]
    fn test_fatal_event_logs_at_fatal() {
        assert!(Event::SchemaLoadFailed.is_fatal());
        assert!(Logger::enabled(Severity::Fatal));
        log_event_with_fields(Event::SchemaLoadFailed, &[("error", "FG_MALFORMED_PATH")]);
    }
}
