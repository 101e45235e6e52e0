//! Mapped type definitions
//!
//! Supported field kinds:
//! - string, bool, int, float: scalars coerced from the payload
//! - array: associative or positional, element kind given by array metadata
//! - object: a nested mapped type, referenced by name
//!
//! A field carries at most one rule spec, at most one associative-element
//! declaration (`array_object`) and at most one positional-element
//! declaration (`array_child`).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar kinds a field or a positional array element can be coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "integer")]
    Int,
    Float,
}

impl ScalarKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Declared kind of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFieldKind", into = "RawFieldKind")]
pub enum FieldKind {
    Scalar(ScalarKind),
    Array,
    /// Nested mapped type, looked up by name in the registry
    Object { type_name: String },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar(kind) => kind.type_name(),
            FieldKind::Array => "array",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Wire form of [`FieldKind`]: `{"type": "int"}`, `{"type": "object", "object": "Address"}`
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawFieldKind {
    String,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "integer")]
    Int,
    Float,
    Array,
    Object { object: String },
}

impl From<RawFieldKind> for FieldKind {
    fn from(raw: RawFieldKind) -> Self {
        match raw {
            RawFieldKind::String => FieldKind::Scalar(ScalarKind::String),
            RawFieldKind::Bool => FieldKind::Scalar(ScalarKind::Bool),
            RawFieldKind::Int => FieldKind::Scalar(ScalarKind::Int),
            RawFieldKind::Float => FieldKind::Scalar(ScalarKind::Float),
            RawFieldKind::Array => FieldKind::Array,
            RawFieldKind::Object { object } => FieldKind::Object { type_name: object },
        }
    }
}

impl From<FieldKind> for RawFieldKind {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(ScalarKind::String) => RawFieldKind::String,
            FieldKind::Scalar(ScalarKind::Bool) => RawFieldKind::Bool,
            FieldKind::Scalar(ScalarKind::Int) => RawFieldKind::Int,
            FieldKind::Scalar(ScalarKind::Float) => RawFieldKind::Float,
            FieldKind::Array => RawFieldKind::Array,
            FieldKind::Object { type_name } => RawFieldKind::Object { object: type_name },
        }
    }
}

/// Element kind of a positional array: `"int"` or `{"object": "Item"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayChildSpec {
    Scalar(ScalarKind),
    Nested {
        #[serde(rename = "object")]
        type_name: String,
    },
}

impl ArrayChildSpec {
    /// Nested element type, if any
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            ArrayChildSpec::Nested { type_name } => Some(type_name),
            ArrayChildSpec::Scalar(_) => None,
        }
    }
}

/// An ordered list of rule strings, e.g. `required|max:255`.
///
/// Accepts either the pipe-separated string form or a list. Use the list
/// form when a rule argument itself contains `|` (such as a regex).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRules", into = "RawRules")]
pub struct RuleExpression(Vec<String>);

impl RuleExpression {
    /// Parse a pipe-separated rule string
    pub fn parse(expr: &str) -> Self {
        Self(
            expr.split('|')
                .map(str::trim)
                .filter(|rule| !rule.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Build from individual rule strings
    pub fn from_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(rules.into_iter().map(Into::into).collect())
    }

    pub fn rules(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if a rule with this name (the part before `:`) is present
    pub fn contains(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|rule| rule.split(':').next() == Some(name))
    }
}

impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}

impl From<&str> for RuleExpression {
    fn from(expr: &str) -> Self {
        Self::parse(expr)
    }
}

impl From<Vec<String>> for RuleExpression {
    fn from(rules: Vec<String>) -> Self {
        Self(rules)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRules {
    Joined(String),
    List(Vec<String>),
}

impl From<RawRules> for RuleExpression {
    fn from(raw: RawRules) -> Self {
        match raw {
            RawRules::Joined(expr) => RuleExpression::parse(&expr),
            RawRules::List(rules) => RuleExpression(rules),
        }
    }
}

impl From<RuleExpression> for RawRules {
    fn from(expr: RuleExpression) -> Self {
        RawRules::List(expr.0)
    }
}

/// Validation metadata attached to one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub rules: RuleExpression,
    /// Message overrides keyed by rule name (`required`) or full key (`id.required`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, String>,
}

impl RuleSpec {
    pub fn new(rules: impl Into<RuleExpression>) -> Self {
        Self {
            rules: rules.into(),
            messages: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(key.into(), text.into());
        self
    }
}

/// Static description of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<RuleSpec>,
    /// Element type for associative arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_object: Option<String>,
    /// Element kind for positional arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_child: Option<ArrayChildSpec>,
}

impl FieldDef {
    /// Create a non-nullable field of the given kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            validation: None,
            array_object: None,
            array_child: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::String))
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Bool))
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Int))
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar(ScalarKind::Float))
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Array)
    }

    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Object {
                type_name: type_name.into(),
            },
        )
    }

    /// Allow null (and absent) values
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach validation rules, keeping any messages already attached
    pub fn rules(mut self, rules: impl Into<RuleExpression>) -> Self {
        self.validation.get_or_insert_with(RuleSpec::default).rules = rules.into();
        self
    }

    /// Attach a message override
    pub fn message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.validation
            .get_or_insert_with(RuleSpec::default)
            .messages
            .insert(key.into(), text.into());
        self
    }

    /// Declare the element type of associative arrays
    pub fn object_map(mut self, type_name: impl Into<String>) -> Self {
        self.array_object = Some(type_name.into());
        self
    }

    /// Declare the element kind of positional arrays
    pub fn child_type(mut self, spec: ArrayChildSpec) -> Self {
        self.array_child = Some(spec);
        self
    }

    pub fn child_scalar(self, kind: ScalarKind) -> Self {
        self.child_type(ArrayChildSpec::Scalar(kind))
    }

    pub fn child_object(self, type_name: impl Into<String>) -> Self {
        self.child_type(ArrayChildSpec::Nested {
            type_name: type_name.into(),
        })
    }

    /// Names of mapped types this field refers to
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        let object = match &self.kind {
            FieldKind::Object { type_name } => Some(type_name.as_str()),
            _ => None,
        };
        let child = self.array_child.as_ref().and_then(ArrayChildSpec::nested_type);

        object
            .into_iter()
            .chain(self.array_object.as_deref())
            .chain(child)
    }
}

/// A type whose fields are populated from a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order; mapping visits them in this order
    pub fields: Vec<FieldDef>,
}

impl MappedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Append a field (builder style)
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the type definition itself (not a payload)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Mapped type name must not be empty".into());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(format!("'{}' declares a field with an empty name", self.name));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("Field '{}' is declared twice", field.name));
            }
            let has_array_spec = field.array_object.is_some() || field.array_child.is_some();
            if has_array_spec && field.kind != FieldKind::Array {
                return Err(format!(
                    "Field '{}' carries array metadata but is declared as {}",
                    field.name,
                    field.kind.type_name()
                ));
            }
        }

        Ok(())
    }
}
