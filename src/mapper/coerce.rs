//! Scalar coercion
//!
//! Coercion is permissive: it never rejects a scalar on content. A
//! non-numeric string becomes `0`, an unrecognized boolean becomes `false`.
//! Only composite values (objects, arrays) in scalar position are rejected.

use serde_json::{Number, Value};

use super::errors::{MappingError, MappingResult};
use super::path::FieldPath;
use super::value::MappedValue;
use crate::config::{EmptyStringPolicy, MapperConfig, MissingFieldPolicy};
use crate::schema::{FieldDef, FieldKind, ScalarKind};

static NULL: Value = Value::Null;

/// Kind name of a raw payload value for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Applies the field's nullability to a raw value.
///
/// Returns `Ok(None)` when the field resolves to null and coercion ends,
/// `Ok(Some(value))` when the value must be dispatched by kind.
pub(crate) fn check_nullability<'v>(
    raw: Option<&'v Value>,
    field: &FieldDef,
    path: &FieldPath,
    config: &MapperConfig,
) -> MappingResult<Option<&'v Value>> {
    let value = match raw {
        Some(value) => value,
        None if config.missing_field == MissingFieldPolicy::AbsentIsError => {
            return Err(MappingError::missing_field(path));
        }
        None => &NULL,
    };

    let is_empty_string = matches!(value, Value::String(s) if s.is_empty());

    if value.is_null() {
        return if field.nullable {
            Ok(None)
        } else {
            Err(MappingError::null_not_allowed(path))
        };
    }

    if is_empty_string {
        if !field.nullable {
            return Err(MappingError::null_not_allowed(path));
        }
        let numeric = matches!(
            field.kind,
            FieldKind::Scalar(ScalarKind::Int) | FieldKind::Scalar(ScalarKind::Float)
        );
        if numeric && config.empty_string == EmptyStringPolicy::Null {
            return Ok(None);
        }
    }

    Ok(Some(value))
}

/// Coerces a non-composite value to `kind`. Null coerces to the kind's zero value.
pub(crate) fn coerce_scalar(
    kind: ScalarKind,
    value: &Value,
    path: &FieldPath,
) -> MappingResult<MappedValue> {
    if value.is_array() || value.is_object() {
        return Err(MappingError::type_mismatch(path, kind.type_name(), json_kind(value)));
    }

    let coerced = match kind {
        ScalarKind::String => MappedValue::String(to_string(value)),
        ScalarKind::Bool => MappedValue::Bool(to_bool(value)),
        ScalarKind::Int => MappedValue::Int(to_int(value)),
        ScalarKind::Float => MappedValue::Float(to_float(value)),
    };
    Ok(coerced)
}

fn to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// `"true"` and `"false"` are recognized, native booleans pass through,
/// everything else is false.
fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => number_to_int(n),
        Value::String(s) => parse_int_prefix(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

fn number_to_int(n: &Number) -> i64 {
    if let Some(i) = n.as_i64() {
        return i;
    }
    if n.as_u64().is_some() {
        return i64::MAX;
    }
    // `as` saturates and maps NaN to zero
    n.as_f64().map(|f| f as i64).unwrap_or(0)
}

/// Longest leading numeric prefix: optional whitespace and sign, digits,
/// optional fraction, optional exponent. Empty if there is none.
fn numeric_prefix(s: &str) -> &str {
    let trimmed = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        let frac_digits = frac - end - 1;
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_start {
            end = exp;
        }
    }

    &trimmed[..end]
}

fn parse_int_prefix(s: &str) -> i64 {
    let prefix = numeric_prefix(s);
    if prefix.is_empty() {
        return 0;
    }

    if prefix.contains(['.', 'e', 'E']) {
        return prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0);
    }

    match prefix.parse::<i64>() {
        Ok(i) => i,
        Err(_) if prefix.starts_with('-') => i64::MIN,
        Err(_) => i64::MAX,
    }
}

fn parse_float_prefix(s: &str) -> f64 {
    let prefix = numeric_prefix(s);
    if prefix.is_empty() {
        return 0.0;
    }
    prefix.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> FieldPath {
        FieldPath::root().child("field")
    }

    fn coerce(kind: ScalarKind, value: Value) -> MappedValue {
        coerce_scalar(kind, &value, &path()).unwrap()
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(coerce(ScalarKind::Bool, json!("true")), MappedValue::Bool(true));
        assert_eq!(coerce(ScalarKind::Bool, json!("false")), MappedValue::Bool(false));
        assert_eq!(coerce(ScalarKind::Bool, json!(true)), MappedValue::Bool(true));
        assert_eq!(coerce(ScalarKind::Bool, json!(false)), MappedValue::Bool(false));

        for other in [json!("yes"), json!(1), json!("TRUE"), json!("1"), json!(0.5)] {
            assert_eq!(coerce(ScalarKind::Bool, other), MappedValue::Bool(false));
        }
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(coerce(ScalarKind::Int, json!(5)), MappedValue::Int(5));
        assert_eq!(coerce(ScalarKind::Int, json!("5")), MappedValue::Int(5));
        assert_eq!(coerce(ScalarKind::Int, json!("12abc")), MappedValue::Int(12));
        assert_eq!(coerce(ScalarKind::Int, json!("5.9")), MappedValue::Int(5));
        assert_eq!(coerce(ScalarKind::Int, json!(" -3")), MappedValue::Int(-3));
        assert_eq!(coerce(ScalarKind::Int, json!("1e3")), MappedValue::Int(1000));
        assert_eq!(coerce(ScalarKind::Int, json!("abc")), MappedValue::Int(0));
        assert_eq!(coerce(ScalarKind::Int, json!(7.8)), MappedValue::Int(7));
        assert_eq!(coerce(ScalarKind::Int, json!(true)), MappedValue::Int(1));
    }

    #[test]
    fn test_int_saturates() {
        assert_eq!(
            coerce(ScalarKind::Int, json!("99999999999999999999")),
            MappedValue::Int(i64::MAX)
        );
        assert_eq!(
            coerce(ScalarKind::Int, json!("-99999999999999999999")),
            MappedValue::Int(i64::MIN)
        );
        assert_eq!(coerce(ScalarKind::Int, json!(u64::MAX)), MappedValue::Int(i64::MAX));
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(coerce(ScalarKind::Float, json!(1.5)), MappedValue::Float(1.5));
        assert_eq!(coerce(ScalarKind::Float, json!("2.25kg")), MappedValue::Float(2.25));
        assert_eq!(coerce(ScalarKind::Float, json!(".5")), MappedValue::Float(0.5));
        assert_eq!(coerce(ScalarKind::Float, json!("n/a")), MappedValue::Float(0.0));
        assert_eq!(coerce(ScalarKind::Float, json!(3)), MappedValue::Float(3.0));
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(coerce(ScalarKind::String, json!("ok")), MappedValue::String("ok".into()));
        assert_eq!(coerce(ScalarKind::String, json!(42)), MappedValue::String("42".into()));
        assert_eq!(coerce(ScalarKind::String, json!(true)), MappedValue::String("1".into()));
        assert_eq!(coerce(ScalarKind::String, json!(false)), MappedValue::String("".into()));
    }

    #[test]
    fn test_null_element_is_zero_value() {
        assert_eq!(coerce(ScalarKind::Int, Value::Null), MappedValue::Int(0));
        assert_eq!(coerce(ScalarKind::String, Value::Null), MappedValue::String(String::new()));
        assert_eq!(coerce(ScalarKind::Bool, Value::Null), MappedValue::Bool(false));
    }

    #[test]
    fn test_composite_in_scalar_position() {
        let err = coerce_scalar(ScalarKind::Int, &json!({"a": 1}), &path()).unwrap_err();
        assert_eq!(
            err,
            MappingError::TypeMismatch {
                path: "field".into(),
                expected: "int",
                actual: "object",
            }
        );
        assert!(coerce_scalar(ScalarKind::String, &json!([1]), &path()).is_err());
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("12abc"), "12");
        assert_eq!(numeric_prefix("-1.5e3x"), "-1.5e3");
        assert_eq!(numeric_prefix("1e"), "1");
        assert_eq!(numeric_prefix("."), "");
        assert_eq!(numeric_prefix("-"), "");
        assert_eq!(numeric_prefix("5."), "5.");
    }

    #[test]
    fn test_nullability_non_nullable() {
        let field = FieldDef::int("id");
        let config = MapperConfig::default();

        for raw in [None, Some(&Value::Null), Some(&json!(""))] {
            let err = check_nullability(raw, &field, &path(), &config).unwrap_err();
            assert_eq!(err.code(), "REQMAP_NULL_NOT_ALLOWED");
        }
    }

    #[test]
    fn test_nullability_nullable() {
        let field = FieldDef::int("id").nullable();
        let config = MapperConfig::default();

        assert_eq!(check_nullability(None, &field, &path(), &config).unwrap(), None);
        assert_eq!(check_nullability(Some(&Value::Null), &field, &path(), &config).unwrap(), None);

        let empty = json!("");
        assert_eq!(
            check_nullability(Some(&empty), &field, &path(), &config).unwrap(),
            Some(&empty)
        );
    }

    #[test]
    fn test_empty_string_policy_null() {
        let config = MapperConfig {
            empty_string: EmptyStringPolicy::Null,
            ..Default::default()
        };
        let empty = json!("");

        let numeric = FieldDef::float("price").nullable();
        assert_eq!(check_nullability(Some(&empty), &numeric, &path(), &config).unwrap(), None);

        let text = FieldDef::string("note").nullable();
        assert_eq!(
            check_nullability(Some(&empty), &text, &path(), &config).unwrap(),
            Some(&empty)
        );
    }

    #[test]
    fn test_absent_is_error() {
        let field = FieldDef::string("name").nullable();
        let err = check_nullability(None, &field, &path(), &MapperConfig::strict()).unwrap_err();
        assert_eq!(err, MappingError::MissingField { path: "field".into() });
    }
}
