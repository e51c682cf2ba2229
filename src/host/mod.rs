//! Ports onto the host semantic model and the surrounding UI.
//!
//! The engine never talks to a real authoring tool directly. It reads the
//! model through [`ModelReader`], mutates it through [`ModelWriter`], and
//! collects user choices through [`Prompt`]. Hosts own all persistence; the
//! engine assumes nothing about host objects beyond these calls.

pub mod memory;

pub use memory::MemoryModel;

use thiserror::Error;

use crate::model::{CalculationItemPlan, ColumnRef, MeasurePlan, TableRef};

/// Result type for host-model mutations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors the host model can raise at the write boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// A measure or calculation item with this name already exists in the
    /// containing object.
    #[error("'{name}' already exists in '{container}'")]
    DuplicateName { container: String, name: String },

    /// A calculation group with this name already exists in the model.
    #[error("calculation group '{0}' already exists")]
    DuplicateGroup(String),

    /// The target table does not exist in the model.
    #[error("table '{0}' does not exist in the model")]
    UnknownTable(String),

    /// The target calculation group does not exist in the model.
    #[error("calculation group '{0}' does not exist in the model")]
    UnknownGroup(String),
}

/// Read access to the host model.
pub trait ModelReader {
    /// All tables in the model.
    fn list_tables(&self) -> Vec<TableRef>;

    /// The columns the user currently has selected. An empty list is a
    /// valid return that callers must check.
    fn list_selected_columns(&self) -> Vec<ColumnRef>;
}

/// Write access to the host model. Every call mutates the host immediately;
/// there is no transaction or rollback.
pub trait ModelWriter {
    fn add_measure(&mut self, plan: &MeasurePlan) -> HostResult<()>;

    fn add_calculation_group(
        &mut self,
        name: &str,
        grouping_column_name: &str,
        precedence: i32,
    ) -> HostResult<()>;

    fn add_calculation_item(&mut self, item: &CalculationItemPlan) -> HostResult<()>;
}

/// Outcome of a synchronous prompt: either a value or a dismissal.
///
/// A dismissal aborts the run silently, with no side effects and no error
/// dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome<T> {
    Selected(T),
    Cancelled,
}

impl<T> PromptOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PromptOutcome::Cancelled)
    }
}

/// Synchronous user-input collection.
///
/// Rendering (dialogs, terminals) belongs to the host; the engine only sees
/// the returned outcome, and checks it before any planning proceeds.
pub trait Prompt {
    /// Pick one of `options`, with `default` pre-selected.
    fn choose(&mut self, label: &str, options: &[&str], default: &str) -> PromptOutcome<String>;

    /// Free-form text entry.
    fn text(&mut self, label: &str) -> PromptOutcome<String>;

    /// A yes/no question.
    fn confirm(&mut self, label: &str) -> PromptOutcome<bool>;
}
