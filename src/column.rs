//! Column descriptors and the data types cells are resolved to.
//!
//! A decision table column is exactly one of the [`ColumnDescriptor`] variants.
//! Condition and action columns carry the fact type/field binding the model needs
//! to answer [`TypeOracle`](crate::oracle::TypeOracle) queries; attribute columns
//! carry the rule attribute name plus the salience row-number flags.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::attribute;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    #[default]
    String,
    Numeric,
    Boolean,
    Date,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Numeric => "NUMERIC",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["STRING", "NUMERIC", "BOOLEAN", "DATE"]
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "STRING" | "TEXT" => Ok(DataType::String),
            "NUMERIC" | "NUMBER" => Ok(DataType::Numeric),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "DATE" => Ok(DataType::Date),
            other => Err(anyhow!(
                "Unknown data type '{other}'. Supported types: {}",
                DataType::variants().join(", ")
            )),
        }
    }
}

/// Presentation settings shared by every column kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeColumn {
    pub attribute: String,
    /// Use the row position instead of the stored value for salience.
    #[serde(default)]
    pub use_row_number: bool,
    /// Carried for rule generation (descending salience); does not change cell values.
    #[serde(default)]
    pub reverse_order: bool,
    #[serde(flatten)]
    pub config: ColumnConfig,
}

impl AttributeColumn {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            ..Self::default()
        }
    }

    pub fn with_row_number(mut self, use_row_number: bool) -> Self {
        self.use_row_number = use_row_number;
        self
    }

    pub fn is_salience(&self) -> bool {
        self.attribute == attribute::SALIENCE
    }

    pub fn is_dialect(&self) -> bool {
        self.attribute == attribute::DIALECT
    }

    /// Salience that mirrors the row number rather than a stored value.
    pub fn salience_from_row_number(&self) -> bool {
        self.is_salience() && self.use_row_number
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintKind {
    #[default]
    Literal,
    Predicate,
    ReturnValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionColumn {
    pub bound_name: String,
    pub fact_type: String,
    pub fact_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default)]
    pub constraint: ConstraintKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<String>,
    #[serde(flatten)]
    pub config: ColumnConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSetFieldColumn {
    pub bound_name: String,
    pub fact_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<String>,
    /// Notify the engine of the modification (`modify` rather than plain set).
    #[serde(default)]
    pub update: bool,
    #[serde(flatten)]
    pub config: ColumnConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInsertFactColumn {
    pub fact_type: String,
    pub bound_name: String,
    pub fact_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<String>,
    #[serde(default)]
    pub logical: bool,
    #[serde(flatten)]
    pub config: ColumnConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataColumn {
    pub metadata: String,
    #[serde(flatten)]
    pub config: ColumnConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ColumnDescriptor {
    RowNumber,
    Description(ColumnConfig),
    Metadata(MetadataColumn),
    Attribute(AttributeColumn),
    Condition(ConditionColumn),
    ActionSetField(ActionSetFieldColumn),
    ActionInsertFact(ActionInsertFactColumn),
}

impl ColumnDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnDescriptor::RowNumber => "row-number",
            ColumnDescriptor::Description(_) => "description",
            ColumnDescriptor::Metadata(_) => "metadata",
            ColumnDescriptor::Attribute(_) => "attribute",
            ColumnDescriptor::Condition(_) => "condition",
            ColumnDescriptor::ActionSetField(_) => "action-set-field",
            ColumnDescriptor::ActionInsertFact(_) => "action-insert-fact",
        }
    }

    pub fn config(&self) -> Option<&ColumnConfig> {
        match self {
            ColumnDescriptor::RowNumber => None,
            ColumnDescriptor::Description(config) => Some(config),
            ColumnDescriptor::Metadata(col) => Some(&col.config),
            ColumnDescriptor::Attribute(col) => Some(&col.config),
            ColumnDescriptor::Condition(col) => Some(&col.config),
            ColumnDescriptor::ActionSetField(col) => Some(&col.config),
            ColumnDescriptor::ActionInsertFact(col) => Some(&col.config),
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        self.config()
            .and_then(|config| config.default_value.as_deref())
    }

    /// Header text shown above the column in the grid.
    pub fn header(&self) -> String {
        if let Some(header) = self.config().and_then(|config| config.header.as_deref()) {
            return header.to_string();
        }
        match self {
            ColumnDescriptor::RowNumber => "#".to_string(),
            ColumnDescriptor::Description(_) => "Description".to_string(),
            ColumnDescriptor::Metadata(col) => col.metadata.clone(),
            ColumnDescriptor::Attribute(col) => col.attribute.clone(),
            ColumnDescriptor::Condition(col) => format!("{}.{}", col.bound_name, col.fact_field),
            ColumnDescriptor::ActionSetField(col) => {
                format!("{}.{}", col.bound_name, col.fact_field)
            }
            ColumnDescriptor::ActionInsertFact(col) => {
                format!("{}.{}", col.fact_type, col.fact_field)
            }
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeColumn> {
        match self {
            ColumnDescriptor::Attribute(col) => Some(col),
            _ => None,
        }
    }

    /// Comma separated value list declared directly on the column, if any.
    pub fn declared_value_list(&self) -> Option<&str> {
        match self {
            ColumnDescriptor::Condition(col) => col.value_list.as_deref(),
            ColumnDescriptor::ActionSetField(col) => col.value_list.as_deref(),
            ColumnDescriptor::ActionInsertFact(col) => col.value_list.as_deref(),
            _ => None,
        }
    }
}

impl From<AttributeColumn> for ColumnDescriptor {
    fn from(column: AttributeColumn) -> Self {
        ColumnDescriptor::Attribute(column)
    }
}

impl From<ConditionColumn> for ColumnDescriptor {
    fn from(column: ConditionColumn) -> Self {
        ColumnDescriptor::Condition(column)
    }
}

impl From<ActionSetFieldColumn> for ColumnDescriptor {
    fn from(column: ActionSetFieldColumn) -> Self {
        ColumnDescriptor::ActionSetField(column)
    }
}

impl From<ActionInsertFactColumn> for ColumnDescriptor {
    fn from(column: ActionInsertFactColumn) -> Self {
        ColumnDescriptor::ActionInsertFact(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_parses_aliases() {
        assert_eq!("numeric".parse::<DataType>().unwrap(), DataType::Numeric);
        assert_eq!(" bool ".parse::<DataType>().unwrap(), DataType::Boolean);
        assert!("decimal".parse::<DataType>().is_err());
    }

    #[test]
    fn attribute_columns_compare_flags() {
        let plain = AttributeColumn::new("salience");
        let by_row = AttributeColumn::new("salience").with_row_number(true);
        assert_ne!(plain, by_row);
        assert_eq!(by_row.clone(), by_row);
        assert!(by_row.salience_from_row_number());
        assert!(!plain.salience_from_row_number());
    }

    #[test]
    fn header_falls_back_to_binding() {
        let column = ColumnDescriptor::Condition(ConditionColumn {
            bound_name: "d".to_string(),
            fact_type: "Driver".to_string(),
            fact_field: "age".to_string(),
            ..ConditionColumn::default()
        });
        assert_eq!(column.header(), "d.age");
        assert_eq!(ColumnDescriptor::RowNumber.header(), "#");
    }

    #[test]
    fn columns_deserialize_from_tagged_yaml() {
        let yaml = "- kind: row-number\n- kind: attribute\n  attribute: salience\n  use_row_number: true\n  header: Priority\n";
        let columns: Vec<ColumnDescriptor> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(columns[0], ColumnDescriptor::RowNumber);
        let attribute = columns[1].as_attribute().unwrap();
        assert!(attribute.use_row_number);
        assert_eq!(columns[1].header(), "Priority");
    }
}
