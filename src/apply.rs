//! Materializing a planned batch against the host model.
//!
//! The apply engine is the only component with side effects. It walks the
//! batch sequentially and fail-fast: the first host-write failure aborts the
//! run, leaving whatever prefix was already created in place. There is no
//! rollback — re-applying the same batch collides on names at the host
//! boundary.

use thiserror::Error;
use tracing::{debug, info};

use crate::host::{HostError, ModelWriter};
use crate::model::{CalculationGroupPlan, MeasureBatch};

/// Result type for apply operations.
pub type ApplyResult<T> = Result<T, ApplyError>;

/// A host-write failure, reporting which plan could not be materialized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("failed to create measure '{name}': {source}")]
    Measure {
        name: String,
        #[source]
        source: HostError,
    },

    #[error("failed to create calculation group '{name}': {source}")]
    Group {
        name: String,
        #[source]
        source: HostError,
    },

    #[error("failed to create calculation item '{name}': {source}")]
    CalculationItem {
        name: String,
        #[source]
        source: HostError,
    },
}

/// Counts of objects created by a successful apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyStats {
    pub measures_created: usize,
    pub calc_items_created: usize,
    pub groups_created: usize,
}

/// Executes measure batches against a [`ModelWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyEngine;

impl ApplyEngine {
    /// Materialize `batch` (and the optional calculation group) in the host
    /// model.
    ///
    /// Creation order matches the authoring workflow the batch was planned
    /// for: the calculation group first, then each non-rollup measure
    /// followed immediately by its calculation item, then the roll-up
    /// measure. Calculation items reference measures by qualified name, so
    /// `group` must have been planned from this same `batch`.
    pub fn apply(
        writer: &mut dyn ModelWriter,
        batch: &MeasureBatch,
        group: Option<&CalculationGroupPlan>,
    ) -> ApplyResult<ApplyStats> {
        let mut stats = ApplyStats::default();

        if let Some(group) = group {
            writer
                .add_calculation_group(&group.name, &group.grouping_column_name, group.precedence)
                .map_err(|source| ApplyError::Group {
                    name: group.name.clone(),
                    source,
                })?;
            stats.groups_created += 1;
            debug!(group = %group.name, "created calculation group");
        }

        for (index, plan) in batch.plans.iter().enumerate() {
            writer.add_measure(plan).map_err(|source| ApplyError::Measure {
                name: plan.name.clone(),
                source,
            })?;
            stats.measures_created += 1;
            debug!(measure = %plan.name, table = %plan.target_table_name, "created measure");

            if let Some(item) = group.and_then(|g| g.items.get(index)) {
                writer
                    .add_calculation_item(item)
                    .map_err(|source| ApplyError::CalculationItem {
                        name: item.item_name.clone(),
                        source,
                    })?;
                stats.calc_items_created += 1;
            }
        }

        if let Some(rollup) = &batch.rollup {
            writer
                .add_measure(rollup)
                .map_err(|source| ApplyError::Measure {
                    name: rollup.name.clone(),
                    source,
                })?;
            stats.measures_created += 1;
            debug!(measure = %rollup.name, "created roll-up measure");
        }

        info!(
            measures = stats.measures_created,
            calc_items = stats.calc_items_created,
            groups = stats.groups_created,
            "batch applied"
        );
        Ok(stats)
    }
}
