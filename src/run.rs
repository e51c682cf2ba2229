//! End-to-end runs: collect choices, plan, apply, summarize.
//!
//! Two workflows are provided, one per authoring task:
//!
//! - [`run_column_measures`]: one aggregation measure per selected column,
//!   created in the column's own table.
//! - [`run_row_count_measures`]: one COUNTROWS measure per model table plus a
//!   roll-up total, created in a dedicated measure-storage table, optionally
//!   wrapped in a calculation group.
//!
//! Both check their inputs and every prompt outcome before planning, and only
//! then mutate the host. A dismissed prompt aborts silently with no side
//! effects.

use thiserror::Error;

use crate::apply::{ApplyEngine, ApplyError, ApplyStats};
use crate::catalog::{AggregationCatalog, CatalogError};
use crate::host::{ModelReader, ModelWriter, Prompt, PromptOutcome};
use crate::model::{CalculationGroupPlan, MeasureBatch};
use crate::planner::{CalculationGroupPlanner, MeasureBatchPlanner, PlanError};

/// Errors that can end a run. Prompt dismissal is not an error; it surfaces
/// as [`RunOutcome::Cancelled`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// The named measure-storage table is not in the model. Checked before
    /// any further prompting.
    #[error("table '{0}' does not exist in the model")]
    UnknownTable(String),
}

pub type RunResult<T> = Result<T, RunError>;

/// How a run ended: either with work done (or planned, for dry runs) or with
/// a silent user cancellation.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    Cancelled,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// The end-of-run notification text shown to the user.
    pub message: String,
    pub stats: ApplyStats,
    pub batch: MeasureBatch,
    pub group: Option<CalculationGroupPlan>,
}

/// Options for the column-measure workflow.
#[derive(Debug, Clone)]
pub struct ColumnRunOptions {
    /// Pre-chosen aggregation key; when `None` the user is prompted.
    pub aggregation: Option<String>,
    /// Default selection offered by the aggregation prompt.
    pub default_aggregation: String,
    /// Plan only; do not mutate the host.
    pub dry_run: bool,
}

impl Default for ColumnRunOptions {
    fn default() -> Self {
        Self {
            aggregation: None,
            default_aggregation: "SUM".to_string(),
            dry_run: false,
        }
    }
}

/// Whether the row-count workflow creates a companion calculation group.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GroupChoice {
    /// Ask the user.
    #[default]
    Prompt,
    Skip,
    Named(String),
}

/// Options for the row-count workflow.
#[derive(Debug, Clone, Default)]
pub struct RowCountRunOptions {
    /// Pre-chosen measure-storage table; when `None` the user is prompted.
    pub measure_table: Option<String>,
    /// Pre-chosen display folder; when `None` the user is prompted.
    pub folder: Option<String>,
    pub group: GroupChoice,
    /// Plan only; do not mutate the host.
    pub dry_run: bool,
}

const AGGREGATION_PROMPT: &str =
    "Select the type of calculation that will be used to create a DAX measure \
     based on the selected column(s)";
const MEASURE_TABLE_PROMPT: &str = "Name of the table where measures will be created";
const FOLDER_PROMPT: &str = "Name of the folder where the measures will be located";
const GROUP_CONFIRM_PROMPT: &str = "Create calculation group with table measures?";
const GROUP_NAME_PROMPT: &str = "Enter a name for the calculation group";

/// Create one aggregation measure per selected column.
pub fn run_column_measures<H: ModelReader + ModelWriter>(
    host: &mut H,
    prompt: &mut dyn Prompt,
    catalog: &AggregationCatalog,
    planner: &MeasureBatchPlanner,
    options: &ColumnRunOptions,
) -> RunResult<RunOutcome> {
    // Fail fast on an empty selection, before showing any prompt.
    let columns = host.list_selected_columns();
    if columns.is_empty() {
        return Err(PlanError::EmptySelection("no columns selected").into());
    }

    let key = match &options.aggregation {
        Some(key) => key.clone(),
        None => {
            let choices: Vec<&str> = catalog.keys().collect();
            match prompt.choose(AGGREGATION_PROMPT, &choices, &options.default_aggregation) {
                PromptOutcome::Selected(key) => key,
                PromptOutcome::Cancelled => return Ok(RunOutcome::Cancelled),
            }
        }
    };
    let agg = catalog.lookup(&key)?;

    let batch = planner.plan_from_columns(&columns, agg)?;

    if options.dry_run {
        let message = format!("(dry run) {} measure plan(s) produced", batch.len());
        return Ok(RunOutcome::Completed(RunSummary {
            message,
            stats: ApplyStats::default(),
            batch,
            group: None,
        }));
    }

    let stats = ApplyEngine::apply(host, &batch, None)?;
    let message = column_summary(stats.measures_created, &agg.key);
    Ok(RunOutcome::Completed(RunSummary {
        message,
        stats,
        batch,
        group: None,
    }))
}

/// Create a COUNTROWS measure per model table plus a roll-up total,
/// optionally with a companion calculation group.
pub fn run_row_count_measures<H: ModelReader + ModelWriter>(
    host: &mut H,
    prompt: &mut dyn Prompt,
    planner: &MeasureBatchPlanner,
    options: &RowCountRunOptions,
) -> RunResult<RunOutcome> {
    let measure_table = match &options.measure_table {
        Some(name) => name.clone(),
        None => match prompt.text(MEASURE_TABLE_PROMPT) {
            PromptOutcome::Selected(name) => name,
            PromptOutcome::Cancelled => return Ok(RunOutcome::Cancelled),
        },
    };

    // The storage table must exist before anything else is asked for.
    let tables = host.list_tables();
    if !tables
        .iter()
        .any(|t| t.name.to_lowercase() == measure_table.to_lowercase())
    {
        return Err(RunError::UnknownTable(measure_table));
    }

    let folder = match &options.folder {
        Some(folder) => folder.clone(),
        None => match prompt.text(FOLDER_PROMPT) {
            PromptOutcome::Selected(folder) => folder,
            PromptOutcome::Cancelled => return Ok(RunOutcome::Cancelled),
        },
    };

    let group_name = match &options.group {
        GroupChoice::Named(name) => Some(name.clone()),
        GroupChoice::Skip => None,
        GroupChoice::Prompt => match prompt.confirm(GROUP_CONFIRM_PROMPT) {
            PromptOutcome::Selected(true) => match prompt.text(GROUP_NAME_PROMPT) {
                PromptOutcome::Selected(name) => Some(name),
                PromptOutcome::Cancelled => return Ok(RunOutcome::Cancelled),
            },
            PromptOutcome::Selected(false) => None,
            PromptOutcome::Cancelled => return Ok(RunOutcome::Cancelled),
        },
    };

    let batch = planner.plan_from_tables(&tables, &measure_table, &folder)?;
    let group = group_name.map(|name| CalculationGroupPlanner::plan(&batch, &name));

    if options.dry_run {
        let message = format!("(dry run) {} measure plan(s) produced", batch.len());
        return Ok(RunOutcome::Completed(RunSummary {
            message,
            stats: ApplyStats::default(),
            batch,
            group,
        }));
    }

    let stats = ApplyEngine::apply(host, &batch, group.as_ref())?;
    let message = row_count_summary(&stats);
    Ok(RunOutcome::Completed(RunSummary {
        message,
        stats,
        batch,
        group,
    }))
}

fn column_summary(count: usize, key: &str) -> String {
    let suffix = if count == 1 {
        "measure has"
    } else {
        "measures have"
    };
    format!("({}) {} {} been created.", count, key, suffix)
}

fn row_count_summary(stats: &ApplyStats) -> String {
    if stats.groups_created > 0 {
        format!(
            "{} measures and 1 calculation group created",
            stats.measures_created
        )
    } else {
        format!("{} measures created", stats.measures_created)
    }
}
