//! # measureforge
//!
//! A declarative measure-generation engine for tabular semantic models.
//!
//! ## Architecture
//!
//! Planning is pure; only the apply step mutates the host model:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        User choices (aggregation, table, folder)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [catalog lookup]
//! ┌─────────────────────────────────────────────────────────┐
//! │   AggregationSpec + ColumnRef/TableRef (read-only)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │   MeasureBatch (+ optional CalculationGroupPlan)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [apply engine]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Host model mutation (sequential, fail-fast)       │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod apply;
pub mod catalog;
pub mod config;
pub mod host;
pub mod model;
pub mod planner;
pub mod run;
pub mod template;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::apply::{ApplyEngine, ApplyError, ApplyStats};
    pub use crate::catalog::{AggregationCatalog, AggregationSpec, CatalogError};
    pub use crate::host::{
        HostError, MemoryModel, ModelReader, ModelWriter, Prompt, PromptOutcome,
    };
    pub use crate::model::{
        CalculationGroupPlan, CalculationItemPlan, ColumnRef, MeasureBatch, MeasurePlan, TableRef,
    };
    pub use crate::planner::{CalculationGroupPlanner, MeasureBatchPlanner, PlanError, Templates};
    pub use crate::run::{
        run_column_measures, run_row_count_measures, ColumnRunOptions, GroupChoice,
        RowCountRunOptions, RunError, RunOutcome, RunSummary,
    };
    pub use crate::template::TemplateError;
}

// Also export the core types at the crate root for convenience
pub use catalog::{AggregationCatalog, AggregationSpec};
pub use model::{
    CalculationGroupPlan, CalculationItemPlan, ColumnRef, MeasureBatch, MeasurePlan, TableRef,
};
pub use planner::{CalculationGroupPlanner, MeasureBatchPlanner, Templates};
