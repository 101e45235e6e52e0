//! Rule collection
//!
//! Walks a mapped type's fields and gathers validation metadata into:
//! - a rule map, field name -> rule expression, in field order
//! - a message-override map, qualified key -> ordered texts
//!
//! Override keys that already mention the field name are kept verbatim;
//! every other key is qualified as `<field>.<key>`.

use crate::schema::{MappedType, RuleExpression};

/// Ordered field -> rule expression map handed to the rule engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMap {
    entries: Vec<(String, RuleExpression)>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules for a field, replacing earlier rules for the same field
    pub fn insert(&mut self, field: impl Into<String>, rules: RuleExpression) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = rules,
            None => self.entries.push((field, rules)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&RuleExpression> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleExpression)> {
        self.entries.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Message overrides keyed by `<field>.<rule>`.
///
/// Colliding keys accumulate their texts in insertion order instead of
/// overwriting each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOverrides {
    entries: Vec<(String, Vec<String>)>,
}

impl MessageOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, texts)) => texts.push(text),
            None => self.entries.push((key, vec![text])),
        }
    }

    /// All texts registered under `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, texts)| texts.as_slice())
    }

    /// The first text registered under `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|texts| texts.first()).map(String::as_str)
    }

    /// Merge another override map into this one, accumulating on collision
    pub fn merge(&mut self, other: MessageOverrides) {
        for (key, texts) in other.entries {
            for text in texts {
                self.insert(key.clone(), text);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, texts)| (k.as_str(), texts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rules and overrides gathered from one mapped type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedRules {
    pub rules: RuleMap,
    pub messages: MessageOverrides,
}

/// Gathers every field's rule spec. Pure; no side effects.
pub fn collect_rules(mapped: &MappedType) -> CollectedRules {
    let mut collected = CollectedRules::default();

    for field in &mapped.fields {
        let Some(spec) = &field.validation else {
            continue;
        };

        collected.rules.insert(field.name.clone(), spec.rules.clone());

        let mut parsed = MessageOverrides::new();
        for (key, text) in &spec.messages {
            parsed.insert(qualify_message_key(&field.name, key), text.clone());
        }
        collected.messages.merge(parsed);
    }

    collected
}

/// Qualifies an override key with its field name unless it already contains it.
pub fn qualify_message_key(field: &str, key: &str) -> String {
    if key.contains(field) {
        key.to_string()
    } else {
        format!("{}.{}", field, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;

    fn sample_type() -> MappedType {
        MappedType::new("User")
            .field(
                FieldDef::int("id")
                    .rules("required|integer")
                    .message("required", "Id is required field."),
            )
            .field(
                FieldDef::string("name")
                    .rules("required|string|max:255")
                    .message("required", "Name is required field.")
                    .message("name.max", "Name can contains maximum 255 characters."),
            )
            .field(FieldDef::bool("active"))
    }

    #[test]
    fn test_collects_rules_in_field_order() {
        let collected = collect_rules(&sample_type());

        let fields: Vec<_> = collected.rules.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["id", "name"]);
        assert_eq!(
            collected.rules.get("name").unwrap().rules(),
            ["required", "string", "max:255"]
        );
        assert!(collected.rules.get("active").is_none());
    }

    #[test]
    fn test_message_keys_qualified() {
        let collected = collect_rules(&sample_type());

        assert_eq!(collected.messages.first("id.required"), Some("Id is required field."));
        assert_eq!(collected.messages.first("name.required"), Some("Name is required field."));
        assert_eq!(
            collected.messages.first("name.max"),
            Some("Name can contains maximum 255 characters.")
        );
        assert!(collected.messages.get("required").is_none());
    }

    #[test]
    fn test_qualify_keeps_keys_mentioning_field() {
        assert_eq!(qualify_message_key("name", "name.max"), "name.max");
        assert_eq!(qualify_message_key("name", "max"), "name.max");
        // Substring match, not prefix match
        assert_eq!(qualify_message_key("id", "user_id.required"), "user_id.required");
    }

    #[test]
    fn test_colliding_keys_accumulate() {
        // Both fields produce the key "user_id.required"
        let mapped = MappedType::new("Pair")
            .field(FieldDef::int("user_id").rules("required").message("required", "first"))
            .field(FieldDef::int("id").rules("required").message("user_id.required", "second"));

        let collected = collect_rules(&mapped);
        assert_eq!(
            collected.messages.get("user_id.required").unwrap(),
            ["first".to_string(), "second".to_string()]
        );
        assert_eq!(collected.messages.first("user_id.required"), Some("first"));
    }

    #[test]
    fn test_no_rules() {
        let collected = collect_rules(&MappedType::new("Empty").field(FieldDef::int("id")));
        assert!(collected.rules.is_empty());
        assert!(collected.messages.is_empty());
    }
}
