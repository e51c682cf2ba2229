//! The aggregation catalog: the fixed set of aggregations a user can pick
//! from when generating column measures.
//!
//! The catalog is an immutable value built once (from the built-in table or
//! from configuration) and passed explicitly to the planner — it is never
//! process-global mutable state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by catalog lookup and construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The requested aggregation key is not in the catalog.
    #[error("unknown aggregation: '{0}'")]
    NotFound(String),

    /// Two catalog entries share the same key. Keys are case-sensitive.
    #[error("duplicate aggregation key: '{0}'")]
    DuplicateKey(String),
}

/// One selectable aggregation: a DAX function key, the human-readable label
/// used in generated names and descriptions, and the expression template the
/// planner renders with `[key, column reference]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub key: String,
    pub label: String,
    pub expression_template: String,
}

/// Ordered, immutable registry of [`AggregationSpec`]s.
///
/// Iteration order is definition order (used to populate selection prompts),
/// never sorted. Keys are case-sensitive and unique.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationCatalog {
    specs: Vec<AggregationSpec>,
}

/// Expression template shared by every built-in aggregation.
const BUILTIN_EXPRESSION_TEMPLATE: &str = "{0} ( {1} )";

const BUILTIN_AGGREGATIONS: &[(&str, &str)] = &[
    ("AVERAGE", "Average"),
    ("DISTINCTCOUNT", "Distinct Count"),
    ("MAX", "Max"),
    ("MEDIAN", "Median"),
    ("MIN", "Min"),
    ("SUM", "Sum"),
];

impl AggregationCatalog {
    /// The built-in catalog of standard DAX aggregations.
    pub fn builtin() -> Self {
        let specs = BUILTIN_AGGREGATIONS
            .iter()
            .map(|(key, label)| AggregationSpec {
                key: (*key).to_string(),
                label: (*label).to_string(),
                expression_template: BUILTIN_EXPRESSION_TEMPLATE.to_string(),
            })
            .collect();
        Self { specs }
    }

    /// Build a catalog from explicit specs, rejecting duplicate keys.
    pub fn from_specs(specs: Vec<AggregationSpec>) -> CatalogResult<Self> {
        let mut catalog = Self { specs: Vec::with_capacity(specs.len()) };
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    /// Append a spec, failing on a (case-sensitive) key collision.
    pub fn insert(&mut self, spec: AggregationSpec) -> CatalogResult<()> {
        if self.specs.iter().any(|s| s.key == spec.key) {
            return Err(CatalogError::DuplicateKey(spec.key));
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Look up a spec by its exact key.
    pub fn lookup(&self, key: &str) -> CatalogResult<&AggregationSpec> {
        self.specs
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    /// Keys in definition order, for populating a selection prompt.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.key.as_str())
    }

    /// All specs in definition order.
    pub fn specs(&self) -> &[AggregationSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for AggregationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
