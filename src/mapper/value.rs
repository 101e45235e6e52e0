//! Mapped instances
//!
//! A [`MappedObject`] is the fully populated result of one mapping call:
//! every declared field is present, in declaration order, holding a coerced
//! [`MappedValue`]. [`RequestObject`] lets application structs be built from it.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::errors::{MappingError, MappingResult};
use crate::schema::MappedType;

/// A coerced field value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum MappedValue {
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Array(Vec<MappedValue>),
    Object(MappedObject),
}

impl MappedValue {
    /// Kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            MappedValue::Null => "null",
            MappedValue::String(_) => "string",
            MappedValue::Bool(_) => "bool",
            MappedValue::Int(_) => "int",
            MappedValue::Float(_) => "float",
            MappedValue::Array(_) => "array",
            MappedValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MappedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MappedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MappedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MappedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MappedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MappedValue]> {
        match self {
            MappedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&MappedObject> {
        match self {
            MappedValue::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// A populated instance of a mapped type
#[derive(Debug, Clone, PartialEq)]
pub struct MappedObject {
    type_name: String,
    fields: Vec<(String, MappedValue)>,
}

impl MappedObject {
    pub(crate) fn with_capacity(type_name: &str, capacity: usize) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: MappedValue) {
        self.fields.push((name.to_string(), value));
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&MappedValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &MappedValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Removes a field's value, leaving null in its place
    pub fn take(&mut self, name: &str) -> MappingResult<MappedValue> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| std::mem::replace(v, MappedValue::Null))
            .ok_or_else(|| MappingError::UndeclaredField {
                type_name: self.type_name.clone(),
                field: name.to_string(),
            })
    }

    fn mismatch(&self, name: &str, expected: &'static str, actual: &MappedValue) -> MappingError {
        MappingError::TypeMismatch {
            path: format!("{}.{}", self.type_name, name),
            expected,
            actual: actual.kind_name(),
        }
    }

    fn take_opt<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        convert: impl FnOnce(MappedValue) -> Result<T, MappedValue>,
    ) -> MappingResult<Option<T>> {
        match self.take(name)? {
            MappedValue::Null => Ok(None),
            value => convert(value)
                .map(Some)
                .map_err(|value| self.mismatch(name, expected, &value)),
        }
    }

    fn take_required<T>(
        &mut self,
        name: &str,
        expected: &'static str,
        convert: impl FnOnce(MappedValue) -> Result<T, MappedValue>,
    ) -> MappingResult<T> {
        self.take_opt(name, expected, convert)?
            .ok_or_else(|| self.mismatch(name, expected, &MappedValue::Null))
    }

    pub fn take_string(&mut self, name: &str) -> MappingResult<String> {
        self.take_required(name, "string", string_of)
    }

    pub fn take_opt_string(&mut self, name: &str) -> MappingResult<Option<String>> {
        self.take_opt(name, "string", string_of)
    }

    pub fn take_bool(&mut self, name: &str) -> MappingResult<bool> {
        self.take_required(name, "bool", bool_of)
    }

    pub fn take_opt_bool(&mut self, name: &str) -> MappingResult<Option<bool>> {
        self.take_opt(name, "bool", bool_of)
    }

    pub fn take_int(&mut self, name: &str) -> MappingResult<i64> {
        self.take_required(name, "int", int_of)
    }

    pub fn take_opt_int(&mut self, name: &str) -> MappingResult<Option<i64>> {
        self.take_opt(name, "int", int_of)
    }

    pub fn take_float(&mut self, name: &str) -> MappingResult<f64> {
        self.take_required(name, "float", float_of)
    }

    pub fn take_opt_float(&mut self, name: &str) -> MappingResult<Option<f64>> {
        self.take_opt(name, "float", float_of)
    }

    pub fn take_array(&mut self, name: &str) -> MappingResult<Vec<MappedValue>> {
        self.take_required(name, "array", array_of)
    }

    /// Converts a nested object field
    pub fn take_object<T: RequestObject>(&mut self, name: &str) -> MappingResult<T> {
        let object = self.take_required(name, "object", object_of)?;
        T::from_mapped(object)
    }

    pub fn take_opt_object<T: RequestObject>(&mut self, name: &str) -> MappingResult<Option<T>> {
        self.take_opt(name, "object", object_of)?
            .map(T::from_mapped)
            .transpose()
    }

    /// Converts an array-of-objects field
    pub fn take_objects<T: RequestObject>(&mut self, name: &str) -> MappingResult<Vec<T>> {
        let items = self.take_array(name)?;
        items
            .into_iter()
            .map(|item| match item {
                MappedValue::Object(object) => T::from_mapped(object),
                other => Err(self.mismatch(name, "object", &other)),
            })
            .collect()
    }
}

fn string_of(value: MappedValue) -> Result<String, MappedValue> {
    match value {
        MappedValue::String(s) => Ok(s),
        other => Err(other),
    }
}

fn bool_of(value: MappedValue) -> Result<bool, MappedValue> {
    match value {
        MappedValue::Bool(b) => Ok(b),
        other => Err(other),
    }
}

fn int_of(value: MappedValue) -> Result<i64, MappedValue> {
    match value {
        MappedValue::Int(i) => Ok(i),
        other => Err(other),
    }
}

fn float_of(value: MappedValue) -> Result<f64, MappedValue> {
    match value {
        MappedValue::Float(f) => Ok(f),
        other => Err(other),
    }
}

fn array_of(value: MappedValue) -> Result<Vec<MappedValue>, MappedValue> {
    match value {
        MappedValue::Array(items) => Ok(items),
        other => Err(other),
    }
}

fn object_of(value: MappedValue) -> Result<MappedObject, MappedValue> {
    match value {
        MappedValue::Object(object) => Ok(object),
        other => Err(other),
    }
}

impl Serialize for MappedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An application type that can be built from a mapping result.
///
/// ```ignore
/// struct Login { email: String, remember: bool }
///
/// impl RequestObject for Login {
///     const TYPE_NAME: &'static str = "Login";
///
///     fn schema() -> MappedType {
///         MappedType::new(Self::TYPE_NAME)
///             .field(FieldDef::string("email").rules("required|string"))
///             .field(FieldDef::bool("remember"))
///     }
///
///     fn from_mapped(mut object: MappedObject) -> MappingResult<Self> {
///         Ok(Self {
///             email: object.take_string("email")?,
///             remember: object.take_bool("remember")?,
///         })
///     }
/// }
/// ```
pub trait RequestObject: Sized {
    /// Name the type is registered under
    const TYPE_NAME: &'static str;

    /// Static field metadata
    fn schema() -> MappedType;

    fn from_mapped(object: MappedObject) -> MappingResult<Self>;
}
