//! Schema registry errors
//!
//! Error codes:
//! - REQMAP_SCHEMA_INVALID
//! - REQMAP_SCHEMA_IMMUTABLE
//! - REQMAP_SCHEMA_MALFORMED
//! - REQMAP_SCHEMA_UNKNOWN_REFERENCE

use thiserror::Error;

/// Errors raised while defining or loading mapped types.
///
/// These happen at initialization time, never while mapping a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The type definition itself is inconsistent
    #[error("Mapped type '{type_name}' is invalid: {reason}")]
    Invalid { type_name: String, reason: String },

    /// A type with this name is already registered
    #[error("Mapped type '{0}' is already registered and cannot be replaced")]
    Immutable(String),

    /// A schema file could not be read or parsed
    #[error("Malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// A field refers to a type that is not registered
    #[error("Field '{type_name}.{field}' refers to unregistered type '{missing}'")]
    UnknownReference {
        type_name: String,
        field: String,
        missing: String,
    },
}

impl SchemaError {
    pub fn invalid(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Invalid {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Invalid { .. } => "REQMAP_SCHEMA_INVALID",
            SchemaError::Immutable(_) => "REQMAP_SCHEMA_IMMUTABLE",
            SchemaError::Malformed { .. } => "REQMAP_SCHEMA_MALFORMED",
            SchemaError::UnknownReference { .. } => "REQMAP_SCHEMA_UNKNOWN_REFERENCE",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
