//! Decision table model: column definitions plus rows of persisted cells.
//!
//! The table doubles as the [`TypeOracle`] for its own columns. Condition and
//! action columns are classified from their fact binding in the fact schema;
//! a value list declared on the column takes precedence over enumerations.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    cell::LegacyCellValue,
    column::{ColumnDescriptor, ConstraintKind},
    error::CellError,
    facts::FactSchema,
    oracle::{CompletionEngine, FieldType, TypeOracle},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    #[serde(default)]
    pub name: String,
    /// `strftime` pattern for date cells; the converter default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "FactSchema::is_empty")]
    pub facts: FactSchema,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub rows: Vec<Vec<LegacyCellValue>>,
}

impl DecisionTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_facts(mut self, facts: FactSchema) -> Self {
        self.facts = facts;
        self
    }

    pub fn with_column(mut self, column: impl Into<ColumnDescriptor>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Appends a row seeded from each column's default value.
    ///
    /// Cells start in text form and are typed on first materialization.
    pub fn append_row(&mut self) -> usize {
        let row = self
            .columns
            .iter()
            .map(|column| {
                LegacyCellValue::from_string(column.default_value().map(str::to_string))
            })
            .collect();
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn validate(&self) -> Result<(), CellError> {
        let expected = self.columns.len();
        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(CellError::RowWidthMismatch {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening decision table {path:?}"))?;
        let reader = BufReader::new(file);
        let table: DecisionTable = if is_json(path) {
            serde_json::from_reader(reader)
                .with_context(|| format!("Parsing JSON decision table {path:?}"))?
        } else {
            serde_yaml::from_reader(reader)
                .with_context(|| format!("Parsing YAML decision table {path:?}"))?
        };
        table
            .validate()
            .with_context(|| format!("Validating decision table {path:?}"))?;
        debug!(
            "Loaded table '{}' with {} column(s) and {} row(s)",
            table.name,
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating decision table {path:?}"))?;
        let mut writer = BufWriter::new(file);
        if is_json(path) {
            serde_json::to_writer_pretty(&mut writer, self)
                .with_context(|| format!("Writing JSON decision table {path:?}"))?;
            writeln!(writer)?;
        } else {
            serde_yaml::to_writer(&mut writer, self)
                .with_context(|| format!("Writing YAML decision table {path:?}"))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Fact type and field a condition or action column is bound to.
    fn binding<'a>(&'a self, column: &'a ColumnDescriptor) -> Option<(&'a str, &'a str)> {
        match column {
            ColumnDescriptor::Condition(col) => {
                Some((col.fact_type.as_str(), col.fact_field.as_str()))
            }
            ColumnDescriptor::ActionInsertFact(col) => {
                Some((col.fact_type.as_str(), col.fact_field.as_str()))
            }
            ColumnDescriptor::ActionSetField(col) => self
                .bound_fact_type(&col.bound_name)
                .map(|fact_type| (fact_type, col.fact_field.as_str())),
            _ => None,
        }
    }

    /// Resolves a pattern binding to its fact type.
    pub fn bound_fact_type(&self, bound_name: &str) -> Option<&str> {
        self.columns.iter().find_map(|column| match column {
            ColumnDescriptor::Condition(col) if col.bound_name == bound_name => {
                Some(col.fact_type.as_str())
            }
            ColumnDescriptor::ActionInsertFact(col) if col.bound_name == bound_name => {
                Some(col.fact_type.as_str())
            }
            _ => None,
        })
    }

    fn field_type(
        &self,
        column: &ColumnDescriptor,
        completions: &dyn CompletionEngine,
    ) -> Option<FieldType> {
        if matches!(column, ColumnDescriptor::Condition(col) if col.constraint != ConstraintKind::Literal)
        {
            return None;
        }
        let (fact_type, field) = self.binding(column)?;
        completions.field_type(fact_type, field)
    }
}

impl TypeOracle for DecisionTable {
    fn value_list(
        &self,
        column: &ColumnDescriptor,
        completions: &dyn CompletionEngine,
    ) -> Vec<String> {
        if let Some(list) = column.declared_value_list() {
            let values = split_value_list(list);
            if !values.is_empty() {
                return values;
            }
        }
        match self.binding(column) {
            Some((fact_type, field)) => completions.enum_values(fact_type, field),
            None => Vec::new(),
        }
    }

    fn is_numeric(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool {
        self.field_type(column, completions) == Some(FieldType::Numeric)
    }

    fn is_boolean(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool {
        self.field_type(column, completions) == Some(FieldType::Boolean)
    }

    fn is_date(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool {
        self.field_type(column, completions) == Some(FieldType::Date)
    }
}

pub fn split_value_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
