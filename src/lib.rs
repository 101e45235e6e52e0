//! request-mapper - metadata-driven mapping of request payloads into typed objects
//!
//! A payload is validated by a rule engine, then every declared field of the
//! target type is populated by coercion, array disambiguation and recursive
//! nested mapping. Either a fully populated instance is returned or the call
//! fails with a [`mapper::ValidationFailure`] or a [`mapper::MappingError`].

pub mod cli;
pub mod config;
pub mod mapper;
pub mod observability;
pub mod rules;
pub mod schema;

pub use config::MapperConfig;
pub use mapper::{MappedObject, MappedValue, MapperError, RequestMapper, RequestObject};
pub use rules::{BasicRuleEngine, RuleEngine};
pub use schema::{FieldDef, MappedType, SchemaRegistry};
