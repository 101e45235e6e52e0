//! Validation gate
//!
//! Runs the rule engine once over a (sub-)payload before any field of the
//! target type is populated.

use serde_json::{Map, Value};

use super::errors::ValidationFailure;
use super::path::FieldPath;
use crate::rules::{collect_rules, CollectedRules, RuleEngine};
use crate::schema::MappedType;

/// Validates `payload` against the rules declared on `mapped`.
///
/// On failure, message keys are qualified with `path` so nested failures
/// read as `items.*.id`.
pub fn validate_payload(
    engine: &dyn RuleEngine,
    mapped: &MappedType,
    payload: &Map<String, Value>,
    path: &FieldPath,
) -> Result<(), ValidationFailure> {
    let CollectedRules { rules, messages } = collect_rules(mapped);
    let outcome = engine.validate(payload, &rules, &messages);

    if outcome.failed {
        return Err(ValidationFailure::from_bag(outcome.bag, path));
    }
    Ok(())
}
