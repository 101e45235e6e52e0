//! Mapping orchestrator
//!
//! One mapping call, for one mapped type and one payload:
//! 1. Validation gate over the whole (sub-)payload
//! 2. Every field in declaration order: nullability, then dispatch by kind
//! 3. The fully populated instance, or the first error
//!
//! A call never returns a partially populated instance. The mapper holds no
//! per-call state, so one mapper can serve concurrent calls.

use serde_json::{Map, Value};

use super::coerce::{check_nullability, coerce_scalar, json_kind};
use super::errors::{MapperError, MapperResult, MappingError};
use super::gate::validate_payload;
use super::path::FieldPath;
use super::payload::PayloadProvider;
use super::value::{MappedObject, MappedValue, RequestObject};
use crate::config::MapperConfig;
use crate::observability::{log_event_with_fields, Event, Logger, MapperMetrics};
use crate::rules::RuleEngine;
use crate::schema::{FieldDef, FieldKind, MappedType, SchemaRegistry};

/// Maps request payloads into registered types
pub struct RequestMapper<'a> {
    registry: &'a SchemaRegistry,
    engine: &'a dyn RuleEngine,
    config: MapperConfig,
    metrics: MapperMetrics,
}

impl<'a> RequestMapper<'a> {
    /// Create a mapper with the default configuration
    pub fn new(registry: &'a SchemaRegistry, engine: &'a dyn RuleEngine) -> Self {
        Self::with_config(registry, engine, MapperConfig::default())
    }

    /// Create a mapper with explicit policies
    ///
    /// `config.log_level` is not applied here: the logger is shared by every
    /// mapper in the process. Call `MapperConfig::apply_logging` once at
    /// startup, or load the config with `MapperConfig::load`.
    pub fn with_config(
        registry: &'a SchemaRegistry,
        engine: &'a dyn RuleEngine,
        config: MapperConfig,
    ) -> Self {
        Self {
            registry,
            engine,
            config,
            metrics: MapperMetrics::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MapperMetrics {
        &self.metrics
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.registry
    }

    /// Maps `payload` into a new instance of `type_name`.
    pub fn map(&self, type_name: &str, payload: &Value) -> MapperResult<MappedObject> {
        self.finish(type_name, self.map_root(type_name, payload))
    }

    /// Maps the payload supplied by `provider` into a new instance of `type_name`.
    pub fn map_from(
        &self,
        type_name: &str,
        provider: &dyn PayloadProvider,
    ) -> MapperResult<MappedObject> {
        let result = provider
            .payload()
            .map_err(MapperError::from)
            .and_then(|payload| self.map_root(type_name, &payload));
        self.finish(type_name, result)
    }

    /// Maps `payload` and converts the result into `T`.
    pub fn map_into<T: RequestObject>(&self, payload: &Value) -> MapperResult<T> {
        let object = self.map(T::TYPE_NAME, payload)?;
        Ok(T::from_mapped(object)?)
    }

    fn map_root(&self, type_name: &str, payload: &Value) -> MapperResult<MappedObject> {
        let root = FieldPath::root();

        let mapped = self
            .registry
            .get(type_name)
            .ok_or_else(|| MappingError::not_mapped_type(type_name, &root))?;

        let Value::Object(payload) = payload else {
            return Err(MappingError::type_mismatch(&root, "object", json_kind(payload)).into());
        };

        self.map_with_path(mapped, payload, &root)
    }

    fn finish(
        &self,
        type_name: &str,
        result: MapperResult<MappedObject>,
    ) -> MapperResult<MappedObject> {
        match &result {
            Ok(_) => self.metrics.increment_mappings_completed(),
            Err(MapperError::Validation(_)) => {}
            Err(MapperError::Mapping(err)) => {
                self.metrics.increment_mapping_errors();
                log_event_with_fields(
                    Event::MappingFailed,
                    &[
                        ("code", err.code()),
                        ("message", err.to_string().as_str()),
                        ("type", type_name),
                    ],
                );
            }
        }
        result
    }

    /// Maps one (sub-)payload at `path`: gate first, then every field.
    pub(crate) fn map_with_path(
        &self,
        mapped: &MappedType,
        payload: &Map<String, Value>,
        path: &FieldPath,
    ) -> MapperResult<MappedObject> {
        let rendered = path.render();
        if Logger::enabled(Event::MappingBegin.severity()) {
            log_event_with_fields(
                Event::MappingBegin,
                &[("path", rendered.as_str()), ("type", mapped.name.as_str())],
            );
        }

        if let Err(failure) = validate_payload(self.engine, mapped, payload, path) {
            self.metrics.increment_validation_failures();
            log_event_with_fields(
                Event::ValidationFailed,
                &[
                    ("first_message", failure.first_message()),
                    ("path", rendered.as_str()),
                    ("type", mapped.name.as_str()),
                ],
            );
            return Err(failure.into());
        }

        let mut object = MappedObject::with_capacity(&mapped.name, mapped.fields.len());
        for field in &mapped.fields {
            let field_path = path.child(&field.name);
            let value = self.map_field(field, payload.get(&field.name), &field_path)?;
            object.push(&field.name, value);
        }

        if Logger::enabled(Event::MappingComplete.severity()) {
            log_event_with_fields(
                Event::MappingComplete,
                &[("path", rendered.as_str()), ("type", mapped.name.as_str())],
            );
        }
        Ok(object)
    }

    fn map_field(
        &self,
        field: &FieldDef,
        raw: Option<&Value>,
        path: &FieldPath,
    ) -> MapperResult<MappedValue> {
        let Some(value) = check_nullability(raw, field, path, &self.config)? else {
            return Ok(MappedValue::Null);
        };

        match &field.kind {
            FieldKind::Scalar(kind) => Ok(coerce_scalar(*kind, value, path)?),
            FieldKind::Array => self.map_array(field, value, path),
            FieldKind::Object { type_name } => {
                self.map_nested(type_name, value, path).map(MappedValue::Object)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssociativeDetection, EmptyStringPolicy};
    use crate::observability::Severity;
    use crate::rules::{AcceptAll, BasicRuleEngine, MessageOverrides, RuleMap, RuleOutcome};
    use crate::schema::ScalarKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                MappedType::new("Child")
                    .field(FieldDef::int("id").rules("required|integer"))
                    .field(FieldDef::string("name")),
            )
            .unwrap();
        registry
            .register(
                MappedType::new("Parent")
                    .field(FieldDef::string("title"))
                    .field(FieldDef::object("child", "Child").nullable())
                    .field(FieldDef::array("items").nullable().child_object("Child"))
                    .field(FieldDef::array("tags").nullable().child_scalar(ScalarKind::Int))
                    .field(FieldDef::array("lookup").nullable().object_map("Child")),
            )
            .unwrap();
        registry
            .register(
                MappedType::new("Loose")
                    .field(FieldDef::array("values").nullable())
                    .field(FieldDef::object("other", "Unregistered").nullable())
                    .field(FieldDef::float("price").nullable()),
            )
            .unwrap();
        registry
    }

    #[derive(Default)]
    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl RuleEngine for CountingEngine {
        fn validate(&self, _: &Map<String, Value>, _: &RuleMap, _: &MessageOverrides) -> RuleOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RuleOutcome::passed()
        }
    }

    #[test]
    fn test_map_nested_object() {
        let registry = registry();
        let engine = BasicRuleEngine::new();
        let mapper = RequestMapper::new(&registry, &engine);

        let object = mapper
            .map("Parent", &json!({"title": "t", "child": {"id": 3, "name": "x"}}))
            .unwrap();

        let child = object.get("child").and_then(MappedValue::as_object).unwrap();
        assert_eq!(child.get("id"), Some(&MappedValue::Int(3)));
        assert_eq!(child.get("name"), Some(&MappedValue::String("x".into())));
        assert_eq!(object.get("items"), Some(&MappedValue::Null));
        assert_eq!(mapper.metrics().snapshot().nested_objects, 1);
        assert_eq!(mapper.metrics().snapshot().mappings_completed, 1);
    }

    #[test]
    fn test_every_field_populated_in_order() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let object = mapper.map("Parent", &json!({"title": "t"})).unwrap();
        let names: Vec<_> = object.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "child", "items", "tags", "lookup"]);
    }

    #[test]
    fn test_positional_scalar_elements() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let object = mapper
            .map("Parent", &json!({"title": "t", "tags": ["1", 2, "x", null]}))
            .unwrap();
        assert_eq!(
            object.get("tags").and_then(MappedValue::as_array).unwrap(),
            [
                MappedValue::Int(1),
                MappedValue::Int(2),
                MappedValue::Int(0),
                MappedValue::Int(0)
            ]
        );
    }

    #[test]
    fn test_positional_nested_elements() {
        let registry = registry();
        let engine = BasicRuleEngine::new();
        let mapper = RequestMapper::new(&registry, &engine);

        let object = mapper
            .map(
                "Parent",
                &json!({"title": "t", "items": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}),
            )
            .unwrap();
        let items = object.get("items").and_then(MappedValue::as_array).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_object().and_then(|o| o.get("id")), Some(&MappedValue::Int(2)));
        assert_eq!(mapper.metrics().snapshot().nested_objects, 2);
    }

    #[test]
    fn test_associative_elements() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let object = mapper
            .map(
                "Parent",
                &json!({"title": "t", "lookup": {"first": {"id": 1, "name": "a"}, "second": {"id": 2, "name": "b"}}}),
            )
            .unwrap();
        let lookup = object.get("lookup").and_then(MappedValue::as_array).unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(
            lookup[0].as_object().and_then(|o| o.get("name")),
            Some(&MappedValue::String("a".into()))
        );
    }

    #[test]
    fn test_nested_validation_failure_is_qualified() {
        let registry = registry();
        let engine = BasicRuleEngine::new();
        let mapper = RequestMapper::new(&registry, &engine);

        let err = mapper
            .map("Parent", &json!({"title": "t", "items": [{"id": 1, "name": "a"}, {"name": "b"}]}))
            .unwrap_err();
        let failure = err.as_validation().unwrap();
        assert!(failure.messages().get("items.*.id").is_some());
        assert_eq!(mapper.metrics().snapshot().validation_failures, 1);
        assert_eq!(mapper.metrics().snapshot().mappings_completed, 0);
    }

    #[test]
    fn test_missing_array_metadata() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper.map("Loose", &json!({"values": {"a": {}}})).unwrap_err();
        assert_eq!(err.code(), "REQMAP_MISSING_ARRAY_OBJECT_MAP");

        let err = mapper.map("Loose", &json!({"values": [1, 2]})).unwrap_err();
        assert_eq!(err.code(), "REQMAP_MISSING_ARRAY_CHILD_TYPE");

        let object = mapper.map("Loose", &json!({"values": []})).unwrap();
        assert_eq!(object.get("values"), Some(&MappedValue::Array(Vec::new())));
        assert_eq!(mapper.metrics().snapshot().mapping_errors, 2);
    }

    #[test]
    fn test_unregistered_nested_type() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper.map("Loose", &json!({"other": {"x": 1}})).unwrap_err();
        assert_eq!(
            err.as_mapping(),
            Some(&MappingError::NotMappedType {
                type_name: "Unregistered".into(),
                path: "other".into(),
            })
        );
    }

    #[test]
    fn test_root_must_be_object() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper.map("Parent", &json!([1, 2])).unwrap_err();
        assert_eq!(
            err.as_mapping(),
            Some(&MappingError::TypeMismatch {
                path: "$root".into(),
                expected: "object",
                actual: "array",
            })
        );
        assert_eq!(mapper.map("Nope", &json!({})).unwrap_err().code(), "REQMAP_NOT_MAPPED_TYPE");
    }

    #[test]
    fn test_nested_element_must_be_object() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper.map("Parent", &json!({"title": "t", "items": [5]})).unwrap_err();
        assert_eq!(
            err.as_mapping(),
            Some(&MappingError::TypeMismatch {
                path: "items.*".into(),
                expected: "object",
                actual: "number",
            })
        );
    }

    #[test]
    fn test_null_in_nested_field_reports_full_path() {
        let registry = registry();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper
            .map("Parent", &json!({"title": "t", "child": {"id": 1, "name": null}}))
            .unwrap_err();
        assert_eq!(
            err.as_mapping(),
            Some(&MappingError::NullNotAllowed { path: "child.name".into() })
        );
    }

    #[test]
    fn test_gate_runs_once_per_mapping_call() {
        let registry = registry();
        let engine = CountingEngine::default();
        let mapper = RequestMapper::new(&registry, &engine);

        mapper
            .map(
                "Parent",
                &json!({"title": "t", "child": {"id": 1, "name": "a"}, "items": [{"id": 2, "name": "b"}]}),
            )
            .unwrap();
        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_config_policies() {
        let registry = registry();
        let config = MapperConfig {
            associative_detection: AssociativeDetection::Reindexing,
            empty_string: EmptyStringPolicy::Null,
            ..Default::default()
        };
        let mapper = RequestMapper::with_config(&registry, &AcceptAll, config);

        let object = mapper
            .map("Parent", &json!({"title": "t", "lookup": {"0": {"id": 1, "name": "a"}, "5": {"id": 2, "name": "b"}}}))
            .unwrap();
        assert_eq!(object.get("lookup").and_then(MappedValue::as_array).map(<[_]>::len), Some(2));

        let object = mapper.map("Loose", &json!({"price": ""})).unwrap();
        assert_eq!(object.get("price"), Some(&MappedValue::Null));

        let cast = RequestMapper::new(&registry, &AcceptAll);
        let object = cast.map("Loose", &json!({"price": ""})).unwrap();
        assert_eq!(object.get("price"), Some(&MappedValue::Float(0.0)));
    }

    #[test]
    fn test_with_config_keeps_log_level_for_startup() {
        let registry = registry();
        let config = MapperConfig {
            log_level: Severity::Error,
            ..Default::default()
        };
        let mapper = RequestMapper::with_config(&registry, &AcceptAll, config);
        assert_eq!(mapper.config().log_level, Severity::Error);
        assert!(mapper.map("Parent", &json!({"title": "t"})).is_ok());
    }

    #[test]
    fn test_associative_element_type_must_be_registered() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(MappedType::new("Index").field(FieldDef::array("lookup").object_map("Missing")))
            .unwrap();
        let mapper = RequestMapper::new(&registry, &AcceptAll);

        let err = mapper
            .map("Index", &json!({"lookup": {"first": {"id": 1}}}))
            .unwrap_err();
        assert_eq!(err.code(), "REQMAP_NOT_MAPPED_TYPE");
        assert_eq!(
            err.as_mapping(),
            Some(&MappingError::NotMappedType {
                type_name: "Missing".into(),
                path: "lookup.*".into(),
            })
        );
        assert_eq!(mapper.metrics().snapshot().nested_objects, 0);
    }

    #[test]
    fn test_strict_missing_field() {
        let registry = registry();
        let mapper = RequestMapper::with_config(&registry, &AcceptAll, MapperConfig::strict());

        let err = mapper.map("Loose", &json!({"values": []})).unwrap_err();
        assert_eq!(err.as_mapping(), Some(&MappingError::MissingField { path: "other".into() }));
    }
}
