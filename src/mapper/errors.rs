//! Mapper error model
//!
//! Two disjoint kinds, never mixed in one result:
//! - [`ValidationFailure`]: the rule engine rejected the payload. Raised
//!   before any field is populated; meant to be shown to the end user.
//! - [`MappingError`]: the payload does not fit the declared structure, or
//!   the metadata is incomplete. A schema/programming error.
//!
//! Error codes:
//! - REQMAP_VALIDATION_FAILED
//! - REQMAP_NULL_NOT_ALLOWED
//! - REQMAP_MISSING_FIELD
//! - REQMAP_MISSING_ARRAY_OBJECT_MAP
//! - REQMAP_MISSING_ARRAY_CHILD_TYPE
//! - REQMAP_NOT_MAPPED_TYPE
//! - REQMAP_TYPE_MISMATCH
//! - REQMAP_UNDECLARED_FIELD
//! - REQMAP_INVALID_PAYLOAD

use thiserror::Error;

use super::path::FieldPath;
use crate::rules::MessageBag;

/// Semantic failure reported by the rule engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{first_message}")]
pub struct ValidationFailure {
    messages: MessageBag,
    first_message: String,
}

impl ValidationFailure {
    /// Builds a failure from an engine's message bag, keying messages by
    /// their full path below `path`.
    pub fn from_bag(bag: MessageBag, path: &FieldPath) -> Self {
        let first_message = bag
            .first()
            .unwrap_or("The given data was invalid.")
            .to_string();
        let messages = bag.map_keys(|field| path.qualify(field));
        Self {
            messages,
            first_message,
        }
    }

    /// Messages by field path
    pub fn messages(&self) -> &MessageBag {
        &self.messages
    }

    /// The message to show when only one can be shown
    pub fn first_message(&self) -> &str {
        &self.first_message
    }
}

/// Structural mapping failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Field '{path}' does not allow a null/empty value")]
    NullNotAllowed { path: String },

    #[error("Field '{path}' is missing from the payload")]
    MissingField { path: String },

    #[error("Field '{path}' received an associative array but declares no element object type")]
    MissingArrayObjectMap { path: String },

    #[error("Field '{path}' received a positional array but declares no element type")]
    MissingArrayChildType { path: String },

    #[error("'{type_name}' used at '{path}' is not a registered mapped type")]
    NotMappedType { type_name: String, path: String },

    #[error("Field '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{type_name}' has no mapped field '{field}'")]
    UndeclaredField { type_name: String, field: String },

    #[error("Payload could not be read: {0}")]
    InvalidPayload(String),
}

impl MappingError {
    pub fn null_not_allowed(path: &FieldPath) -> Self {
        MappingError::NullNotAllowed { path: path.render() }
    }

    pub fn missing_field(path: &FieldPath) -> Self {
        MappingError::MissingField { path: path.render() }
    }

    pub fn not_mapped_type(type_name: &str, path: &FieldPath) -> Self {
        MappingError::NotMappedType {
            type_name: type_name.to_string(),
            path: path.render(),
        }
    }

    pub fn type_mismatch(path: &FieldPath, expected: &'static str, actual: &'static str) -> Self {
        MappingError::TypeMismatch {
            path: path.render(),
            expected,
            actual,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::NullNotAllowed { .. } => "REQMAP_NULL_NOT_ALLOWED",
            MappingError::MissingField { .. } => "REQMAP_MISSING_FIELD",
            MappingError::MissingArrayObjectMap { .. } => "REQMAP_MISSING_ARRAY_OBJECT_MAP",
            MappingError::MissingArrayChildType { .. } => "REQMAP_MISSING_ARRAY_CHILD_TYPE",
            MappingError::NotMappedType { .. } => "REQMAP_NOT_MAPPED_TYPE",
            MappingError::TypeMismatch { .. } => "REQMAP_TYPE_MISMATCH",
            MappingError::UndeclaredField { .. } => "REQMAP_UNDECLARED_FIELD",
            MappingError::InvalidPayload(_) => "REQMAP_INVALID_PAYLOAD",
        }
    }
}

/// Either kind of mapper failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl MapperError {
    pub fn code(&self) -> &'static str {
        match self {
            MapperError::Validation(_) => "REQMAP_VALIDATION_FAILED",
            MapperError::Mapping(err) => err.code(),
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            MapperError::Validation(failure) => Some(failure),
            MapperError::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingError> {
        match self {
            MapperError::Mapping(err) => Some(err),
            MapperError::Validation(_) => None,
        }
    }
}

/// Result type for structural operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for a full mapping call
pub type MapperResult<T> = Result<T, MapperError>;
