//! Data model for measure generation.
//!
//! [`ColumnRef`] and [`TableRef`] are read-only views of objects owned by the
//! host model; the engine never mutates them. [`MeasurePlan`] and
//! [`CalculationItemPlan`] are produced by the planners and consumed exactly
//! once by the apply engine; they are never mutated after creation.

use serde::{Deserialize, Serialize};

/// Read-only view of a column in the host model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Name of the table the column belongs to.
    pub table_name: String,
    pub column_name: String,
    /// Fully-qualified reference usable inside a DAX expression,
    /// e.g. `'Sales'[Amount]`.
    pub qualified_reference: String,
    #[serde(default)]
    pub display_folder: String,
    #[serde(default)]
    pub format_string: String,
}

/// Read-only view of a table in the host model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    /// Fully-qualified reference usable inside a DAX expression, e.g. `'Sales'`.
    pub qualified_reference: String,
    #[serde(default)]
    pub is_system_or_hidden: bool,
    #[serde(default)]
    pub is_calculation_group: bool,
}

/// A planned measure: everything the apply engine needs to materialize one
/// measure in the host model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurePlan {
    /// Table the measure will be created in.
    pub target_table_name: String,
    pub name: String,
    pub expression: String,
    pub format_string: String,
    pub description: String,
    pub display_folder: String,
}

impl MeasurePlan {
    /// The measure's own qualified reference, as used by roll-up and
    /// calculation-item expressions.
    pub fn qualified_reference(&self) -> String {
        format!("'{}'", self.name)
    }
}

/// A planned calculation item referencing a measure from the same batch.
///
/// Items are planned only after the referenced measure plan exists, so a
/// batch's items always resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationItemPlan {
    pub group_name: String,
    pub item_name: String,
    pub expression: String,
}

/// A planned calculation group: the group itself plus its items.
///
/// The host model's built-in grouping column is renamed to
/// `grouping_column_name` when the group is materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationGroupPlan {
    pub name: String,
    pub grouping_column_name: String,
    pub precedence: i32,
    pub items: Vec<CalculationItemPlan>,
}

/// An ordered batch of measure plans, with an optional roll-up measure whose
/// expression sums the qualified references of every other plan in the batch.
///
/// Insertion order is processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureBatch {
    pub plans: Vec<MeasurePlan>,
    pub rollup: Option<MeasurePlan>,
}

impl MeasureBatch {
    pub fn new(plans: Vec<MeasurePlan>) -> Self {
        Self { plans, rollup: None }
    }

    /// All plans in apply order: non-rollup plans first, roll-up last.
    pub fn iter(&self) -> impl Iterator<Item = &MeasurePlan> {
        self.plans.iter().chain(self.rollup.iter())
    }

    /// Total number of measures in the batch, roll-up included.
    pub fn len(&self) -> usize {
        self.plans.len() + usize::from(self.rollup.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty() && self.rollup.is_none()
    }
}
