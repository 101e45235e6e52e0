//! Mapping counters
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters shared by every mapping call made through one mapper.
///
/// Uses Relaxed ordering; counters are informational only.
#[derive(Debug, Default)]
pub struct MapperMetrics {
    mappings_completed: AtomicU64,
    validation_failures: AtomicU64,
    mapping_errors: AtomicU64,
    nested_objects: AtomicU64,
}

impl MapperMetrics {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment top-level mappings that produced an instance
    pub fn increment_mappings_completed(&self) {
        self.mappings_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rule-engine rejections
    pub fn increment_validation_failures(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment structural mapping errors
    pub fn increment_mapping_errors(&self) {
        self.mapping_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment nested instances built (object fields and array elements)
    pub fn increment_nested_objects(&self) {
        self.nested_objects.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent-enough snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            mappings_completed: self.mappings_completed.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            mapping_errors: self.mapping_errors.load(Ordering::Relaxed),
            nested_objects: self.nested_objects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`MapperMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub mappings_completed: u64,
    pub validation_failures: u64,
    pub mapping_errors: u64,
    pub nested_objects: u64,
}
