//! Observable events emitted by the mapper
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema lifecycle
    /// A mapped type was registered
    SchemaRegistered,
    /// A schema directory was loaded
    SchemasLoaded,
    /// Configuration loaded
    ConfigLoaded,

    // Mapping
    /// Mapping of one (sub-)payload begins
    MappingBegin,
    /// Mapping of one (sub-)payload produced an instance
    MappingComplete,
    /// The rule engine rejected the payload
    ValidationFailed,
    /// Structural mapping error
    MappingFailed,

    // Rule engine
    /// A rule name the engine does not understand
    UnknownRule,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MappingBegin => "MAPPING_BEGIN",
            Event::MappingComplete => "MAPPING_COMPLETE",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::MappingFailed => "MAPPING_FAILED",
            Event::UnknownRule => "UNKNOWN_RULE",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::MappingBegin | Event::MappingComplete => Severity::Trace,
            Event::SchemaRegistered | Event::SchemasLoaded | Event::ConfigLoaded => Severity::Info,
            Event::ValidationFailed => Severity::Info,
            Event::UnknownRule => Severity::Warn,
            Event::MappingFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
