//! In-memory host model.
//!
//! Backs the CLI (models loaded from and saved to JSON) and the integration
//! tests. Mutation semantics mirror a real authoring host: duplicate names
//! are rejected at the write boundary, which is also what makes re-applying
//! the same batch observably non-idempotent.

use serde::{Deserialize, Serialize};

use super::{HostError, HostResult, ModelReader, ModelWriter};
use crate::model::{CalculationItemPlan, ColumnRef, MeasurePlan, TableRef};

/// A whole semantic model held in memory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryModel {
    #[serde(default)]
    pub tables: Vec<MemoryTable>,
    #[serde(default)]
    pub calculation_groups: Vec<MemoryCalculationGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTable {
    pub name: String,
    /// Filled from `name` when absent in the source JSON.
    #[serde(default)]
    pub qualified_reference: String,
    #[serde(default)]
    pub is_system_or_hidden: bool,
    #[serde(default)]
    pub is_calculation_group: bool,
    #[serde(default)]
    pub columns: Vec<MemoryColumn>,
    #[serde(default)]
    pub measures: Vec<StoredMeasure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryColumn {
    pub name: String,
    /// Filled from the table and column names when absent in the source JSON.
    #[serde(default)]
    pub qualified_reference: String,
    #[serde(default)]
    pub display_folder: String,
    #[serde(default)]
    pub format_string: String,
    /// Whether the column is part of the user's current selection.
    #[serde(default)]
    pub selected: bool,
}

/// A measure as stored in the host model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMeasure {
    pub name: String,
    pub expression: String,
    #[serde(default)]
    pub format_string: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_folder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCalculationGroup {
    pub name: String,
    pub grouping_column_name: String,
    pub precedence: i32,
    #[serde(default)]
    pub items: Vec<StoredCalculationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCalculationItem {
    pub name: String,
    pub expression: String,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let qualified_reference = format!("'{}'", name);
        Self {
            name,
            qualified_reference,
            is_system_or_hidden: false,
            is_calculation_group: false,
            columns: Vec::new(),
            measures: Vec::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, selected: bool) -> Self {
        let name = name.into();
        let qualified_reference = format!("{}[{}]", self.qualified_reference, name);
        self.columns.push(MemoryColumn {
            name,
            qualified_reference,
            display_folder: String::new(),
            format_string: String::new(),
            selected,
        });
        self
    }
}

impl MemoryModel {
    pub fn new(tables: Vec<MemoryTable>) -> Self {
        Self {
            tables,
            calculation_groups: Vec::new(),
        }
    }

    /// Parse a model from JSON, filling in any missing qualified references
    /// from table and column names.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut model: Self = serde_json::from_str(json)?;
        model.normalize();
        Ok(model)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn normalize(&mut self) {
        for table in &mut self.tables {
            if table.qualified_reference.is_empty() {
                table.qualified_reference = format!("'{}'", table.name);
            }
            for column in &mut table.columns {
                if column.qualified_reference.is_empty() {
                    column.qualified_reference =
                        format!("{}[{}]", table.qualified_reference, column.name);
                }
            }
        }
    }

    /// Case-insensitive table lookup, matching host-model name semantics.
    pub fn table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut MemoryTable> {
        self.tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

impl ModelReader for MemoryModel {
    fn list_tables(&self) -> Vec<TableRef> {
        self.tables
            .iter()
            .map(|t| TableRef {
                name: t.name.clone(),
                qualified_reference: t.qualified_reference.clone(),
                is_system_or_hidden: t.is_system_or_hidden,
                is_calculation_group: t.is_calculation_group,
            })
            .collect()
    }

    fn list_selected_columns(&self) -> Vec<ColumnRef> {
        self.tables
            .iter()
            .flat_map(|t| {
                t.columns.iter().filter(|c| c.selected).map(|c| ColumnRef {
                    table_name: t.name.clone(),
                    column_name: c.name.clone(),
                    qualified_reference: c.qualified_reference.clone(),
                    display_folder: c.display_folder.clone(),
                    format_string: c.format_string.clone(),
                })
            })
            .collect()
    }
}

impl ModelWriter for MemoryModel {
    fn add_measure(&mut self, plan: &MeasurePlan) -> HostResult<()> {
        let table = self
            .table_mut(&plan.target_table_name)
            .ok_or_else(|| HostError::UnknownTable(plan.target_table_name.clone()))?;

        if table
            .measures
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(&plan.name))
        {
            return Err(HostError::DuplicateName {
                container: table.name.clone(),
                name: plan.name.clone(),
            });
        }

        table.measures.push(StoredMeasure {
            name: plan.name.clone(),
            expression: plan.expression.clone(),
            format_string: plan.format_string.clone(),
            description: plan.description.clone(),
            display_folder: plan.display_folder.clone(),
        });
        Ok(())
    }

    fn add_calculation_group(
        &mut self,
        name: &str,
        grouping_column_name: &str,
        precedence: i32,
    ) -> HostResult<()> {
        if self
            .calculation_groups
            .iter()
            .any(|g| g.name.eq_ignore_ascii_case(name))
        {
            return Err(HostError::DuplicateGroup(name.to_string()));
        }

        self.calculation_groups.push(MemoryCalculationGroup {
            name: name.to_string(),
            grouping_column_name: grouping_column_name.to_string(),
            precedence,
            items: Vec::new(),
        });
        Ok(())
    }

    fn add_calculation_item(&mut self, item: &CalculationItemPlan) -> HostResult<()> {
        let group = self
            .calculation_groups
            .iter_mut()
            .find(|g| g.name.eq_ignore_ascii_case(&item.group_name))
            .ok_or_else(|| HostError::UnknownGroup(item.group_name.clone()))?;

        if group
            .items
            .iter()
            .any(|i| i.name.eq_ignore_ascii_case(&item.item_name))
        {
            return Err(HostError::DuplicateName {
                container: group.name.clone(),
                name: item.item_name.clone(),
            });
        }

        group.items.push(StoredCalculationItem {
            name: item.item_name.clone(),
            expression: item.expression.clone(),
        });
        Ok(())
    }
}
