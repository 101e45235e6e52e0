//! Built-in reference rule engine
//!
//! Supported rules:
//! - `required`, `nullable`
//! - `string`, `integer`, `numeric`, `boolean`, `array`
//! - `min:N`, `max:N` (characters, numeric value or item count)
//! - `in:a,b,c`
//! - `regex:/pattern/flags`
//! - `uuid`, `date` (`YYYY-MM-DD` or RFC 3339)
//!
//! A failed `required` stops the field's remaining rules. An absent field,
//! a blank string, or null on a `nullable` field skips them. Null on any
//! other field is checked like a value. Unknown rules are logged and pass.
//!
//! Messages come from the override map (`<field>.<rule>`, then `<rule>`),
//! falling back to a default text. `:attribute` and `:<rule>` placeholders
//! are substituted in both.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::collector::{MessageOverrides, RuleMap};
use super::engine::{MessageBag, RuleEngine, RuleOutcome};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::RuleExpression;

/// What a `min`/`max` limit was measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeKind {
    Characters,
    Numeric,
    Items,
}

#[derive(Debug)]
struct Failure<'r> {
    rule: &'r str,
    param: Option<&'r str>,
    size: Option<SizeKind>,
}

/// Reference implementation of [`RuleEngine`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRuleEngine;

impl BasicRuleEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RuleEngine for BasicRuleEngine {
    fn validate(
        &self,
        payload: &Map<String, Value>,
        rules: &RuleMap,
        messages: &MessageOverrides,
    ) -> RuleOutcome {
        let mut bag = MessageBag::new();

        for (field, expr) in rules.iter() {
            for failure in check_field(field, payload.get(field), expr) {
                bag.add(field, render_message(field, &failure, messages));
            }
        }

        RuleOutcome::from_bag(bag)
    }
}

fn check_field<'r>(field: &str, value: Option<&Value>, expr: &'r RuleExpression) -> Vec<Failure<'r>> {
    let mut failures = Vec::new();

    if value.map_or(true, is_blank) && expr.contains("required") {
        failures.push(Failure {
            rule: "required",
            param: None,
            size: None,
        });
        return failures;
    }

    let value = match value {
        None => return failures,
        Some(Value::Null) if expr.contains("nullable") => return failures,
        Some(Value::String(s)) if s.trim().is_empty() => return failures,
        Some(v) => v,
    };

    let numeric_rules = expr.contains("numeric") || expr.contains("integer");

    for rule in expr.rules() {
        let (name, param) = match rule.split_once(':') {
            Some((name, param)) => (name, Some(param)),
            None => (rule.as_str(), None),
        };
        let mut size = None;

        let passed = match name {
            "required" | "nullable" => true,
            "string" => value.is_string(),
            "integer" => is_integer(value),
            "numeric" => as_number(value).is_some(),
            "boolean" => is_boolean(value),
            "array" => value.is_array() || value.is_object(),
            "min" | "max" => {
                let Some(limit) = param.and_then(|p| p.trim().parse::<f64>().ok()) else {
                    log_event_with_fields(Event::UnknownRule, &[("field", field), ("rule", rule.as_str())]);
                    continue;
                };
                match size_of(value, numeric_rules) {
                    Some((measured, kind)) => {
                        size = Some(kind);
                        if name == "min" {
                            measured >= limit
                        } else {
                            measured <= limit
                        }
                    }
                    None => false,
                }
            }
            "in" => match (param, scalar_text(value)) {
                (Some(options), Some(text)) => options.split(',').any(|opt| opt.trim() == text),
                _ => false,
            },
            "regex" => match param.map(compile_pattern) {
                Some(Ok(re)) => value.as_str().map_or(false, |s| re.is_match(s)),
                _ => {
                    log_event_with_fields(Event::UnknownRule, &[("field", field), ("rule", rule.as_str())]);
                    false
                }
            },
            "uuid" => value.as_str().map_or(false, |s| Uuid::parse_str(s).is_ok()),
            "date" => value.as_str().map_or(false, is_date),
            _ => {
                log_event_with_fields(Event::UnknownRule, &[("field", field), ("rule", rule.as_str())]);
                true
            }
        };

        if !passed {
            failures.push(Failure {
                rule: name,
                param,
                size,
            });
        }
    }

    failures
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
        Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    }
}

fn size_of(value: &Value, numeric: bool) -> Option<(f64, SizeKind)> {
    if numeric {
        if let Some(n) = as_number(value) {
            return Some((n, SizeKind::Numeric));
        }
    }
    match value {
        Value::String(s) => Some((s.chars().count() as f64, SizeKind::Characters)),
        Value::Number(n) => Some((n.to_string().chars().count() as f64, SizeKind::Characters)),
        Value::Array(items) => Some((items.len() as f64, SizeKind::Items)),
        Value::Object(map) => Some((map.len() as f64, SizeKind::Items)),
        Value::Bool(_) | Value::Null => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(s).is_ok()
}

/// Compiles `/pattern/flags` (delimiters optional). Flags `i`, `m`, `s`, `x` are honored.
fn compile_pattern(param: &str) -> Result<Regex, regex::Error> {
    let delimited = param
        .strip_prefix('/')
        .and_then(|rest| rest.rfind('/').map(|end| (&rest[..end], &rest[end + 1..])));
    let (pattern, flags) = delimited.unwrap_or((param, ""));

    let inline: String = flags
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
        .collect();
    if inline.is_empty() {
        Regex::new(pattern)
    } else {
        Regex::new(&format!("(?{}){}", inline, pattern))
    }
}

fn render_message(field: &str, failure: &Failure<'_>, overrides: &MessageOverrides) -> String {
    let template = overrides
        .first(&format!("{}.{}", field, failure.rule))
        .or_else(|| overrides.first(failure.rule))
        .unwrap_or_else(|| default_message(failure.rule, failure.size));

    let mut message = template.replace(":attribute", &field.replace('_', " "));
    if let Some(param) = failure.param {
        let placeholder = match failure.rule {
            "in" => ":values".to_string(),
            rule => format!(":{}", rule),
        };
        message = message.replace(&placeholder, param);
    }
    message
}

fn default_message(rule: &str, size: Option<SizeKind>) -> &'static str {
    match (rule, size) {
        ("required", _) => "The :attribute field is required.",
        ("string", _) => "The :attribute field must be a string.",
        ("integer", _) => "The :attribute field must be an integer.",
        ("numeric", _) => "The :attribute field must be a number.",
        ("boolean", _) => "The :attribute field must be true or false.",
        ("array", _) => "The :attribute field must be an array.",
        ("min", Some(SizeKind::Numeric)) => "The :attribute field must be at least :min.",
        ("min", Some(SizeKind::Items)) => "The :attribute field must have at least :min items.",
        ("min", _) => "The :attribute field must be at least :min characters.",
        ("max", Some(SizeKind::Numeric)) => "The :attribute field must not be greater than :max.",
        ("max", Some(SizeKind::Items)) => "The :attribute field must not have more than :max items.",
        ("max", _) => "The :attribute field must not be greater than :max characters.",
        ("in", _) => "The selected :attribute is invalid.",
        ("regex", _) => "The :attribute field format is invalid.",
        ("uuid", _) => "The :attribute field must be a valid UUID.",
        ("date", _) => "The :attribute field must be a valid date.",
        _ => "The :attribute field is invalid.",
    }
}
