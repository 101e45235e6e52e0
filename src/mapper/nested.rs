//! Nested mapping
//!
//! Object fields and object array elements recurse into the orchestrator
//! with the sub-payload and an extended path. Errors from the recursive
//! call propagate unchanged.

use serde_json::Value;

use super::coerce::json_kind;
use super::errors::{MapperResult, MappingError};
use super::orchestrator::RequestMapper;
use super::path::FieldPath;
use super::value::MappedObject;

impl RequestMapper<'_> {
    /// Maps `value` into a new instance of the registered type `type_name`.
    pub(crate) fn map_nested(
        &self,
        type_name: &str,
        value: &Value,
        path: &FieldPath,
    ) -> MapperResult<MappedObject> {
        let mapped = self
            .registry()
            .get(type_name)
            .ok_or_else(|| MappingError::not_mapped_type(type_name, path))?;

        let Value::Object(payload) = value else {
            return Err(MappingError::type_mismatch(path, "object", json_kind(value)).into());
        };

        let object = self.map_with_path(mapped, payload, path)?;
        self.metrics().increment_nested_objects();
        Ok(object)
    }
}
