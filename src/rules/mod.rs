//! Validation rules
//!
//! - [`collect_rules`] turns a mapped type's rule metadata into a rule map
//!   and a message-override map
//! - [`RuleEngine`] is the boundary to whatever interprets rule expressions
//! - [`BasicRuleEngine`] is a small built-in engine covering common rules

mod basic;
mod collector;
mod engine;

pub use basic::BasicRuleEngine;
pub use collector::{collect_rules, qualify_message_key, CollectedRules, MessageOverrides, RuleMap};
pub use engine::{AcceptAll, MessageBag, RuleEngine, RuleOutcome};
