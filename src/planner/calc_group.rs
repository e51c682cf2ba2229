//! Planning of a companion calculation group for a row-count batch.

use tracing::debug;

use crate::model::{CalculationGroupPlan, CalculationItemPlan, MeasureBatch};

/// Name given to the group's built-in grouping column.
pub const DEFAULT_GROUPING_COLUMN: &str = "Table Name";

/// Precedence assigned to generated calculation groups.
pub const DEFAULT_PRECEDENCE: i32 = 1;

/// Plans a calculation group whose items select between the measures of a
/// batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculationGroupPlanner;

impl CalculationGroupPlanner {
    /// One item per non-rollup measure, in batch order. The roll-up measure
    /// is never wrapped in an item: it already spans every table and would
    /// be meaningless as a selector.
    ///
    /// Items reference their measure by qualified name, so they may only be
    /// applied together with the batch that produced them.
    pub fn plan(batch: &MeasureBatch, group_name: &str) -> CalculationGroupPlan {
        let items: Vec<CalculationItemPlan> = batch
            .plans
            .iter()
            .map(|measure| CalculationItemPlan {
                group_name: group_name.to_string(),
                item_name: measure.name.clone(),
                expression: measure.qualified_reference(),
            })
            .collect();

        debug!(group = group_name, items = items.len(), "planned calculation group");
        CalculationGroupPlan {
            name: group_name.to_string(),
            grouping_column_name: DEFAULT_GROUPING_COLUMN.to_string(),
            precedence: DEFAULT_PRECEDENCE,
            items,
        }
    }
}
