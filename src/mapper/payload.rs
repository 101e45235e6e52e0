//! Payload sources
//!
//! A mapping call always receives its payload explicitly, either as a
//! `serde_json::Value` or through a [`PayloadProvider`].

use serde_json::Value;

use super::errors::{MappingError, MappingResult};

/// Supplies the request payload for one mapping call
pub trait PayloadProvider {
    fn payload(&self) -> MappingResult<Value>;
}

impl PayloadProvider for Value {
    fn payload(&self) -> MappingResult<Value> {
        Ok(self.clone())
    }
}

/// A payload held as raw JSON text, parsed on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayload(String);

impl JsonPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PayloadProvider for JsonPayload {
    fn payload(&self) -> MappingResult<Value> {
        serde_json::from_str(&self.0).map_err(|e| MappingError::InvalidPayload(e.to_string()))
    }
}
