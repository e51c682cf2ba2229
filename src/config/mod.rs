//! TOML-based configuration.
//!
//! Supports an optional config file (measureforge.toml) that extends or
//! replaces the built-in aggregation catalog and overrides the planner's
//! string templates.
//!
//! Example configuration:
//! ```toml
//! [catalog]
//! replace = false
//!
//! [[catalog.aggregations]]
//! key = "COUNT"
//! label = "Count"
//!
//! [[catalog.aggregations]]
//! key = "SUMX"
//! label = "Sum Over Rows"
//! expression_template = "SUMX ( VALUES ( {1} ), {1} )"
//!
//! [templates]
//! measure_name = "{1} ({0})"
//! records_format = "#,0"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{AggregationCatalog, AggregationSpec, CatalogError};
use crate::planner::Templates;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub catalog: CatalogSection,
    pub templates: TemplateSection,
}

/// Aggregation catalog configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSection {
    /// When true, the configured aggregations replace the built-in catalog
    /// instead of extending it.
    pub replace: bool,
    pub aggregations: Vec<AggregationEntry>,
}

/// One configured aggregation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregationEntry {
    pub key: String,
    pub label: String,
    /// Rendered with `{0}` = aggregation key, `{1}` = column reference.
    #[serde(default = "default_expression_template")]
    pub expression_template: String,
}

fn default_expression_template() -> String {
    "{0} ( {1} )".to_string()
}

/// Per-template overrides; unset fields keep the built-in template.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateSection {
    pub measure_name: Option<String>,
    pub description: Option<String>,
    pub records_name: Option<String>,
    pub records_expression: Option<String>,
    pub records_description: Option<String>,
    pub records_format: Option<String>,
    pub rollup_name: Option<String>,
    pub rollup_description: Option<String>,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the aggregation catalog: the built-in catalog extended by the
    /// configured entries, or only the configured entries when
    /// `catalog.replace` is set. Duplicate keys are a configuration error.
    pub fn build_catalog(&self) -> Result<AggregationCatalog, ConfigError> {
        let mut catalog = if self.catalog.replace {
            AggregationCatalog::from_specs(Vec::new())?
        } else {
            AggregationCatalog::builtin()
        };
        for entry in &self.catalog.aggregations {
            catalog.insert(AggregationSpec {
                key: entry.key.clone(),
                label: entry.label.clone(),
                expression_template: entry.expression_template.clone(),
            })?;
        }
        Ok(catalog)
    }

    /// The planner templates with any configured overrides applied.
    pub fn build_templates(&self) -> Templates {
        let mut templates = Templates::default();
        let overrides = &self.templates;
        if let Some(v) = &overrides.measure_name {
            templates.measure_name = v.clone();
        }
        if let Some(v) = &overrides.description {
            templates.description = v.clone();
        }
        if let Some(v) = &overrides.records_name {
            templates.records_name = v.clone();
        }
        if let Some(v) = &overrides.records_expression {
            templates.records_expression = v.clone();
        }
        if let Some(v) = &overrides.records_description {
            templates.records_description = v.clone();
        }
        if let Some(v) = &overrides.records_format {
            templates.records_format = v.clone();
        }
        if let Some(v) = &overrides.rollup_name {
            templates.rollup_name = v.clone();
        }
        if let Some(v) = &overrides.rollup_description {
            templates.rollup_description = v.clone();
        }
        templates
    }
}
