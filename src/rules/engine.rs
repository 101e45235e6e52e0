//! Rule engine contract
//!
//! The mapper does not interpret rule expressions itself. It hands the
//! payload, the rule map and the message overrides to a [`RuleEngine`] and
//! consumes a pass/fail flag plus a [`MessageBag`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::collector::{MessageOverrides, RuleMap};

/// Ordered per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBag {
    entries: Vec<(String, Vec<String>)>,
}

impl MessageBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Field -> messages, in the order fields first failed
    pub fn messages(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_slice()))
    }

    /// Messages for one field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
    }

    /// The first message in iteration order
    pub fn first(&self) -> Option<&str> {
        self.entries
            .iter()
            .flat_map(|(_, m)| m.first())
            .next()
            .map(String::as_str)
    }

    /// Rewrites every field key through `f`
    pub fn map_keys(self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(field, messages)| (f(&field), messages))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for MessageBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Result of one rule-engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub failed: bool,
    pub bag: MessageBag,
}

impl RuleOutcome {
    pub fn passed() -> Self {
        Self::default()
    }

    /// Outcome derived from a bag: failed iff the bag holds any message
    pub fn from_bag(bag: MessageBag) -> Self {
        Self {
            failed: !bag.is_empty(),
            bag,
        }
    }
}

/// External rule engine.
///
/// Implementations must be deterministic and free of side effects on the
/// payload. They are shared by concurrent mapping calls.
pub trait RuleEngine: Send + Sync {
    fn validate(
        &self,
        payload: &Map<String, Value>,
        rules: &RuleMap,
        messages: &MessageOverrides,
    ) -> RuleOutcome;
}

/// An engine that accepts every payload
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl RuleEngine for AcceptAll {
    fn validate(&self, _: &Map<String, Value>, _: &RuleMap, _: &MessageOverrides) -> RuleOutcome {
        RuleOutcome::passed()
    }
}
