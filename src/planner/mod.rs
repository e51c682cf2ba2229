//! Batch planning of generated measures.
//!
//! Planning is pure: given read-only column/table views and an aggregation
//! spec, the planner produces a [`MeasureBatch`] and touches nothing. All
//! side effects live in [`crate::apply`].

pub mod calc_group;

pub use calc_group::CalculationGroupPlanner;

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::catalog::AggregationSpec;
use crate::model::{ColumnRef, MeasureBatch, MeasurePlan, TableRef};
use crate::template::{self, TemplateError};

/// Result type for planning operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors raised during batch planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Nothing to plan: no columns selected, or no tables survived filtering.
    /// Checked before any prompt or mutation.
    #[error("empty selection: {0}")]
    EmptySelection(&'static str),

    /// Two plans in the batch would create the same measure name in the same
    /// table. Surfaced at planning time, never a silent overwrite.
    #[error("duplicate measure name '{name}' in table '{table}'")]
    NameCollision { table: String, name: String },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Substrings marking Power BI's auto-generated hidden date tables.
///
/// This is a heuristic, not a capability flag: a legitimately named table
/// containing one of these substrings is silently skipped.
const DATE_TABLE_MARKERS: &[&str] = &["LocalDateTable", "DateTableTemplate"];

/// The string templates the planner renders plans from.
///
/// Positional slots are documented per field; see [`crate::template`].
#[derive(Debug, Clone, PartialEq)]
pub struct Templates {
    /// Column-measure name: `{0}` = aggregation label, `{1}` = column name.
    pub measure_name: String,
    /// Column-measure description: `{0}` = lower-cased label, `{1}` = column
    /// name, `{2}` = table name.
    pub description: String,
    /// Row-count measure name: `{0}` = table name.
    pub records_name: String,
    /// Row-count expression: `{0}` = table qualified reference.
    pub records_expression: String,
    /// Row-count description: `{0}` = table qualified reference.
    pub records_description: String,
    /// Format string applied to row-count measures and the roll-up.
    pub records_format: String,
    /// Name of the roll-up measure appended to a row-count batch.
    pub rollup_name: String,
    pub rollup_description: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            measure_name: "{0} of {1}".to_string(),
            description: "This measure is the {0} of column [{1}] from table [{2}]".to_string(),
            records_name: "Records ({0})".to_string(),
            records_expression: "COUNTROWS ( {0} )".to_string(),
            records_description: "Count of records in {0}".to_string(),
            records_format: "#,#".to_string(),
            rollup_name: "Total Records".to_string(),
            rollup_description: "Count of records in all selected tables".to_string(),
        }
    }
}

/// Plans batches of measures from column selections or table lists.
#[derive(Debug, Clone, Default)]
pub struct MeasureBatchPlanner {
    templates: Templates,
}

impl MeasureBatchPlanner {
    pub fn new(templates: Templates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Plan one measure per selected column, in input order.
    ///
    /// Each measure targets the column's own table and inherits the column's
    /// format string and display folder. The aggregation label keeps its
    /// original casing in the measure name and is lower-cased in the
    /// description prose.
    pub fn plan_from_columns(
        &self,
        columns: &[ColumnRef],
        agg: &AggregationSpec,
    ) -> PlanResult<MeasureBatch> {
        if columns.is_empty() {
            return Err(PlanError::EmptySelection("no columns selected"));
        }

        let label_lower = agg.label.to_lowercase();
        let mut seen = HashSet::new();
        let mut plans = Vec::with_capacity(columns.len());
        for column in columns {
            let plan = MeasurePlan {
                target_table_name: column.table_name.clone(),
                name: template::render(
                    &self.templates.measure_name,
                    &[agg.label.as_str(), column.column_name.as_str()],
                )?,
                expression: template::render(
                    &agg.expression_template,
                    &[agg.key.as_str(), column.qualified_reference.as_str()],
                )?,
                format_string: column.format_string.clone(),
                description: template::render(
                    &self.templates.description,
                    &[
                        label_lower.as_str(),
                        column.column_name.as_str(),
                        column.table_name.as_str(),
                    ],
                )?,
                display_folder: column.display_folder.clone(),
            };
            check_unique(&mut seen, &plan)?;
            plans.push(plan);
        }

        debug!(
            aggregation = %agg.key,
            count = plans.len(),
            "planned column measures"
        );
        Ok(MeasureBatch::new(plans))
    }

    /// Plan one row-count (COUNTROWS) measure per qualifying table, plus a
    /// roll-up measure summing them all.
    ///
    /// A table qualifies when its name is not (case-insensitively) the
    /// measure-storage table, it is not a calculation group, it is not
    /// hidden/system, and its name does not contain an auto date-table
    /// marker substring. All measures target `measure_table_name` and land
    /// in `folder_name`.
    pub fn plan_from_tables(
        &self,
        tables: &[TableRef],
        measure_table_name: &str,
        folder_name: &str,
    ) -> PlanResult<MeasureBatch> {
        let exclude = measure_table_name.to_lowercase();
        let included: Vec<&TableRef> = tables
            .iter()
            .filter(|t| {
                t.name.to_lowercase() != exclude
                    && !t.is_calculation_group
                    && !t.is_system_or_hidden
                    && !DATE_TABLE_MARKERS.iter().any(|m| t.name.contains(m))
            })
            .collect();

        if included.is_empty() {
            return Err(PlanError::EmptySelection(
                "no tables qualify for row-count measures",
            ));
        }

        let mut seen = HashSet::new();
        let mut plans = Vec::with_capacity(included.len());
        for table in &included {
            let plan = MeasurePlan {
                target_table_name: measure_table_name.to_string(),
                name: template::render(&self.templates.records_name, &[table.name.as_str()])?,
                expression: template::render(
                    &self.templates.records_expression,
                    &[table.qualified_reference.as_str()],
                )?,
                format_string: self.templates.records_format.clone(),
                description: template::render(
                    &self.templates.records_description,
                    &[table.qualified_reference.as_str()],
                )?,
                display_folder: folder_name.to_string(),
            };
            check_unique(&mut seen, &plan)?;
            plans.push(plan);
        }

        let rollup = MeasurePlan {
            target_table_name: measure_table_name.to_string(),
            name: self.templates.rollup_name.clone(),
            expression: plans
                .iter()
                .map(MeasurePlan::qualified_reference)
                .collect::<Vec<_>>()
                .join(" + "),
            format_string: self.templates.records_format.clone(),
            description: self.templates.rollup_description.clone(),
            display_folder: folder_name.to_string(),
        };
        check_unique(&mut seen, &rollup)?;

        debug!(
            tables = plans.len(),
            skipped = tables.len() - plans.len(),
            "planned row-count measures"
        );
        Ok(MeasureBatch {
            plans,
            rollup: Some(rollup),
        })
    }
}

/// Measure names are unique per target table, matching the host model's
/// case-insensitive name semantics.
fn check_unique(seen: &mut HashSet<(String, String)>, plan: &MeasurePlan) -> PlanResult<()> {
    let key = (
        plan.target_table_name.to_lowercase(),
        plan.name.to_lowercase(),
    );
    if !seen.insert(key) {
        return Err(PlanError::NameCollision {
            table: plan.target_table_name.clone(),
            name: plan.name.clone(),
        });
    }
    Ok(())
}
