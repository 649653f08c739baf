//! Registry mapping block kinds to measurer functions.
//!
//! Dispatch goes through this registry instead of a match over kind
//! strings so callers can register measurers for their own block kinds
//! without touching the engine.

use std::collections::HashMap;

use colflow_core::{Block, RenderContext, TypeRule};

use crate::measurers;

/// A height heuristic for one block kind. Must be total: any block shape
/// yields a finite candidate height (the estimator clamps afterwards).
pub type Measurer = fn(&Block, &RenderContext, &TypeRule) -> f64;

/// A registry of measurers with a fallback for unknown kinds.
#[derive(Debug, Clone)]
pub struct MeasurerRegistry {
    measurers: HashMap<String, Measurer>,
    fallback: Measurer,
}

impl MeasurerRegistry {
    /// Create an empty registry with the given fallback.
    pub fn empty(fallback: Measurer) -> Self {
        Self {
            measurers: HashMap::new(),
            fallback,
        }
    }

    /// The built-in registry covering the standard block kinds.
    pub fn builtin() -> Self {
        let mut registry = Self::empty(measurers::default_measurer);
        registry.register("paragraph", measurers::paragraph);
        registry.register("heading", measurers::heading);
        registry.register("list", measurers::list);
        registry.register("image", measurers::image);
        registry.register("code", measurers::code);
        registry.register("table", measurers::table);
        registry.register("embed", measurers::embed);
        registry
    }

    /// Register a measurer for a kind.
    pub fn register(&mut self, kind: &str, measurer: Measurer) {
        self.measurers.insert(kind.to_string(), measurer);
    }

    /// Get the measurer for a kind, falling back to the default.
    pub fn get(&self, kind: &str) -> Measurer {
        self.measurers.get(kind).copied().unwrap_or(self.fallback)
    }

    /// Check if a kind has a dedicated measurer.
    pub fn contains(&self, kind: &str) -> bool {
        self.measurers.contains_key(kind)
    }

    /// Get all registered kinds.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.measurers.keys().map(|s| s.as_str())
    }
}

impl Default for MeasurerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
