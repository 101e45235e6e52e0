//! Metadata model for mapped types
//!
//! A mapped type is a static, ordered list of field descriptors. Each field
//! declares its kind, whether it accepts null, and optional validation and
//! array-element metadata. Definitions are registered once and are read-only
//! afterwards, so a single [`SchemaRegistry`] can serve concurrent mapping calls.

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{ArrayChildSpec, FieldDef, FieldKind, MappedType, RuleExpression, RuleSpec, ScalarKind};
