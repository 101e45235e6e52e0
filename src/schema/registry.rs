//! Static registry of mapped types
//!
//! - Types are registered once, at initialization time
//! - A registered type is immutable; re-registering a name is an error
//! - Types may be declared in code or loaded from `*.json` files, one type per file
//! - Lookups are read-only and may run concurrently from many mapping calls

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::MappedType;
use crate::mapper::RequestObject;
use crate::observability::{log_event_with_fields, Event};

/// Registry of mapped types indexed by type name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    types: HashMap<String, Arc<MappedType>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type definition.
    pub fn register(&mut self, mapped: MappedType) -> SchemaResult<()> {
        mapped
            .validate_structure()
            .map_err(|reason| SchemaError::invalid(&mapped.name, reason))?;

        if self.types.contains_key(&mapped.name) {
            return Err(SchemaError::Immutable(mapped.name));
        }

        log_event_with_fields(
            Event::SchemaRegistered,
            &[
                ("type", mapped.name.as_str()),
                ("fields", mapped.fields.len().to_string().as_str()),
            ],
        );
        self.types.insert(mapped.name.clone(), Arc::new(mapped));
        Ok(())
    }

    /// Registers the schema declared by a [`RequestObject`] implementation.
    pub fn register_type<T: RequestObject>(&mut self) -> SchemaResult<()> {
        let mapped = T::schema();
        if mapped.name != T::TYPE_NAME {
            return Err(SchemaError::invalid(
                T::TYPE_NAME,
                format!("schema() declares the name '{}'", mapped.name),
            ));
        }
        self.register(mapped)
    }

    /// Loads every `*.json` file in `dir` as one mapped type.
    ///
    /// Files are loaded in path order. Returns the number of types loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", paths.len().to_string().as_str()),
                ("dir", dir.display().to_string().as_str()),
            ],
        );
        Ok(paths.len())
    }

    /// Loads a single schema file.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let mapped: MappedType = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.register(mapped)
    }

    /// Verifies that every type referenced by a field is registered.
    pub fn check_references(&self) -> SchemaResult<()> {
        let mut names: Vec<&String> = self.types.keys().collect();
        names.sort();

        for name in names {
            let mapped = &self.types[name];
            for field in &mapped.fields {
                if let Some(missing) = field.referenced_types().find(|r| !self.contains(r)) {
                    return Err(SchemaError::UnknownReference {
                        type_name: mapped.name.clone(),
                        field: field.name.clone(),
                        missing: missing.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Gets a type by name.
    pub fn get(&self, name: &str) -> Option<&Arc<MappedType>> {
        self.types.get(name)
    }

    /// The mapped-type capability check: is `name` a registered mapped type?
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
