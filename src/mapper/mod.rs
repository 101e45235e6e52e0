//! Request mapping
//!
//! Turns an untyped request payload into a populated instance of a
//! registered mapped type:
//! - validation gate (rule engine) before any field is touched
//! - permissive scalar coercion
//! - associative / positional array disambiguation
//! - recursive nested mapping with path-qualified errors

mod array;
mod coerce;
mod errors;
mod gate;
mod nested;
mod orchestrator;
mod path;
mod payload;
mod value;

pub use errors::{MapperError, MapperResult, MappingError, MappingResult, ValidationFailure};
pub use gate::validate_payload;
pub use orchestrator::RequestMapper;
pub use path::{FieldPath, PathSegment};
pub use payload::{JsonPayload, PayloadProvider};
pub use value::{MappedObject, MappedValue, RequestObject};
