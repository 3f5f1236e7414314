//! Observable events
//!
//! Events are explicit and typed; each maps to one stable log event name.

use std::fmt;

/// Observable events in fieldguard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// All schemas built
    SchemasLoaded,
    /// Schema load failed (FATAL)
    SchemaLoadFailed,
    /// Ready to read requests
    Serving,
    /// Input exhausted, process exits
    ShutdownComplete,

    // Validation
    /// One document validated
    ValidationComplete,
    /// A field failed validation
    FieldRejected,
    /// A default was written for an absent field
    DefaultApplied,
    /// The engine could not write to the output document
    EngineFault,

    // Requests
    /// A request could not be decoded or referenced an unknown schema
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FIELDGUARD_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",
            Event::Serving => "FIELDGUARD_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::ValidationComplete => "VALIDATION_COMPLETE",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::DefaultApplied => "DEFAULT_APPLIED",
            Event::EngineFault => "ENGINE_FAULT",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SchemaLoadFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
