//! Array disambiguation
//!
//! A payload array is either associative (elements identified by name,
//! always mapped to nested objects) or positional (elements identified by
//! order, mapped to the field's declared element kind). JSON sequences are
//! always positional; JSON objects are classified by their keys.

use serde_json::{Map, Value};

use super::coerce::{coerce_scalar, json_kind};
use super::errors::{MapperResult, MappingError};
use super::orchestrator::RequestMapper;
use super::path::FieldPath;
use super::value::MappedValue;
use crate::config::AssociativeDetection;
use crate::schema::{ArrayChildSpec, FieldDef};

/// Shape of a non-empty or empty payload array
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ArrayShape<'v> {
    Empty,
    Positional(Vec<&'v Value>),
    Associative(Vec<&'v Value>),
}

/// Classifies an array-field value. `None` if the value is not array-like.
pub(crate) fn classify(value: &Value, detection: AssociativeDetection) -> Option<ArrayShape<'_>> {
    match value {
        Value::Array(items) if items.is_empty() => Some(ArrayShape::Empty),
        Value::Array(items) => Some(ArrayShape::Positional(items.iter().collect())),
        Value::Object(map) if map.is_empty() => Some(ArrayShape::Empty),
        Value::Object(map) => {
            let values = map.values().collect();
            if is_associative(map, detection) {
                Some(ArrayShape::Associative(values))
            } else {
                Some(ArrayShape::Positional(values))
            }
        }
        _ => None,
    }
}

fn is_associative(map: &Map<String, Value>, detection: AssociativeDetection) -> bool {
    match detection {
        AssociativeDetection::StringKeys => map.keys().any(|key| !is_integer_key(key)),
        AssociativeDetection::Reindexing => map
            .keys()
            .enumerate()
            .any(|(index, key)| *key != index.to_string()),
    }
}

/// True for canonical integer keys:
/// `"0"`, `"42"`, `"-3"`, but not `"01"`, `"-0"`, `"+1"` or `" 1"`.
fn is_integer_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == key.len(),
        [first, rest @ ..] => {
            *first != b'0' && first.is_ascii_digit() && rest.iter().all(u8::is_ascii_digit)
        }
    };
    canonical && key.parse::<i64>().is_ok()
}

impl RequestMapper<'_> {
    /// Maps the value of an array field at `path`.
    ///
    /// Every element of a nested-typed array must be a JSON object. A scalar
    /// element is a `TypeMismatch` at `path.*` rather than being dropped, so a
    /// mapped array always has one entry per payload element.
    pub(crate) fn map_array(
        &self,
        field: &FieldDef,
        value: &Value,
        path: &FieldPath,
    ) -> MapperResult<MappedValue> {
        let shape = classify(value, self.config().associative_detection)
            .ok_or_else(|| MappingError::type_mismatch(path, "array", json_kind(value)))?;

        let element_path = path.wildcard();

        let elements = match shape {
            ArrayShape::Empty => Vec::new(),
            ArrayShape::Associative(values) => {
                let type_name = field
                    .array_object
                    .as_deref()
                    .or_else(|| field.array_child.as_ref().and_then(ArrayChildSpec::nested_type))
                    .ok_or_else(|| MappingError::MissingArrayObjectMap {
                        path: path.render(),
                    })?;

                values
                    .into_iter()
                    .map(|element| {
                        self.map_nested(type_name, element, &element_path)
                            .map(MappedValue::Object)
                    })
                    .collect::<MapperResult<_>>()?
            }
            ArrayShape::Positional(values) => {
                let spec = field.array_child.as_ref().ok_or_else(|| {
                    MappingError::MissingArrayChildType {
                        path: path.render(),
                    }
                })?;

                match spec {
                    ArrayChildSpec::Scalar(kind) => values
                        .into_iter()
                        .map(|element| coerce_scalar(*kind, element, &element_path))
                        .collect::<Result<_, _>>()?,
                    ArrayChildSpec::Nested { type_name } => values
                        .into_iter()
                        .map(|element| {
                            self.map_nested(type_name, element, &element_path)
                                .map(MappedValue::Object)
                        })
                        .collect::<MapperResult<_>>()?,
                }
            }
        };

        Ok(MappedValue::Array(elements))
    }
}
