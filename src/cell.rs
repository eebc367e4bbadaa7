//! Cell representations on both sides of the grid.
//!
//! [`LegacyCellValue`] is the persisted model form: a string slot plus typed
//! slots, with a tag naming the authoritative one. Tables migrated from the
//! text-only format hold everything in the string slot until upgraded.
//!
//! [`GridCell`] is the typed, coordinate-tagged value the grid edits. Grid cells
//! are created on demand and never persisted.

use chrono::NaiveDate;
use log::warn;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::{attribute, column::DataType, date_converter::DateConverter};

pub const OTHERWISE_LABEL: &str = "<otherwise>";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCellValue {
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_value: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub otherwise: bool,
}

impl LegacyCellValue {
    pub fn from_string(value: Option<String>) -> Self {
        Self {
            data_type: DataType::String,
            string_value: value,
            ..Self::default()
        }
    }

    pub fn from_boolean(value: Option<bool>) -> Self {
        Self {
            data_type: DataType::Boolean,
            boolean_value: value,
            ..Self::default()
        }
    }

    pub fn from_date(value: Option<NaiveDate>) -> Self {
        Self {
            data_type: DataType::Date,
            date_value: value,
            ..Self::default()
        }
    }

    pub fn from_numeric(value: Option<BigDecimal>) -> Self {
        Self {
            data_type: DataType::Numeric,
            numeric_value: value,
            ..Self::default()
        }
    }

    /// Text-only cell as written by the legacy format.
    pub fn legacy(text: impl Into<String>) -> Self {
        Self::from_string(Some(text.into()))
    }

    pub fn with_otherwise(mut self, otherwise: bool) -> Self {
        self.otherwise = otherwise;
        self
    }

    pub fn set_string_value(&mut self, value: Option<String>) {
        self.string_value = value;
        self.data_type = DataType::String;
    }

    pub fn set_boolean_value(&mut self, value: Option<bool>) {
        self.boolean_value = value;
        self.data_type = DataType::Boolean;
    }

    pub fn set_date_value(&mut self, value: Option<NaiveDate>) {
        self.date_value = value;
        self.data_type = DataType::Date;
    }

    pub fn set_numeric_value(&mut self, value: Option<BigDecimal>) {
        self.numeric_value = value;
        self.data_type = DataType::Numeric;
    }

    /// Renders the authoritative slot. Dates fall back to ISO format without a converter.
    pub fn display_text(&self, dates: Option<&dyn DateConverter>) -> String {
        match self.data_type {
            DataType::String => self.string_value.clone().unwrap_or_default(),
            DataType::Boolean => self
                .boolean_value
                .map(|b| b.to_string())
                .unwrap_or_default(),
            DataType::Numeric => self
                .numeric_value
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            DataType::Date => match (self.date_value, dates) {
                (Some(date), Some(converter)) => converter.format(&date),
                (Some(date), None) => date.format("%Y-%m-%d").to_string(),
                (None, _) => String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridValue {
    Boolean(Option<bool>),
    Date(Option<NaiveDate>),
    Numeric(Option<BigDecimal>),
    Text(Option<String>),
    /// One-based row position; derived and read-only.
    RowNumber(BigDecimal),
    /// Rule dialect, chosen from [`attribute::DIALECTS`]. Absent shows as the default.
    Dialect(Option<String>),
}

impl GridValue {
    pub fn variant_name(&self) -> &'static str {
        match self {
            GridValue::Boolean(_) => "boolean",
            GridValue::Date(_) => "date",
            GridValue::Numeric(_) => "numeric",
            GridValue::Text(_) => "text",
            GridValue::RowNumber(_) => "row-number",
            GridValue::Dialect(_) => "dialect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub value: GridValue,
    pub otherwise: bool,
}

impl GridCell {
    pub fn new(row: usize, col: usize, value: GridValue) -> Self {
        Self {
            row,
            col,
            value,
            otherwise: false,
        }
    }

    /// Rows are zero-based internally and one-based on screen.
    pub fn row_number(row: usize, col: usize) -> Self {
        Self::new(row, col, GridValue::RowNumber(BigDecimal::from(row as u64 + 1)))
    }

    /// Keeps the stored value as is, so an absent dialect stays absent in the model.
    pub fn dialect(row: usize, col: usize, value: Option<String>) -> Self {
        let unknown = value
            .as_deref()
            .filter(|text| !text.trim().is_empty() && !attribute::is_known_dialect(text));
        if let Some(text) = unknown {
            warn!(
                "Cell ({row}, {col}) holds unknown dialect '{text}'; expected one of {:?}",
                attribute::DIALECTS
            );
        }
        Self::new(row, col, GridValue::Dialect(value))
    }

    pub fn with_otherwise(mut self, otherwise: bool) -> Self {
        self.otherwise = otherwise;
        self
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.value, GridValue::RowNumber(_))
    }

    /// Choices offered by the editor, if the cell is a closed choice.
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self.value {
            GridValue::Dialect(_) => Some(attribute::DIALECTS),
            _ => None,
        }
    }

    pub fn display_text(&self, dates: Option<&dyn DateConverter>) -> String {
        if self.otherwise {
            return OTHERWISE_LABEL.to_string();
        }
        match &self.value {
            GridValue::Boolean(value) => value.map(|b| b.to_string()).unwrap_or_default(),
            GridValue::Date(Some(date)) => match dates {
                Some(converter) => converter.format(date),
                None => date.format("%Y-%m-%d").to_string(),
            },
            GridValue::Date(None) => String::new(),
            GridValue::Numeric(value) => value
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            GridValue::Text(value) => value.clone().unwrap_or_default(),
            GridValue::RowNumber(n) => n.to_string(),
            GridValue::Dialect(value) => match value.as_deref() {
                Some(text) if !text.trim().is_empty() => text.to_string(),
                _ => attribute::DEFAULT_DIALECT.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_update_the_type_tag() {
        let mut cell = LegacyCellValue::legacy("12");
        assert_eq!(cell.data_type, DataType::String);
        cell.set_numeric_value(Some(BigDecimal::from(12)));
        assert_eq!(cell.data_type, DataType::Numeric);
        assert_eq!(cell.string_value.as_deref(), Some("12"));
    }

    #[test]
    fn row_number_cells_are_one_based() {
        let cell = GridCell::row_number(0, 0);
        assert_eq!(cell.value, GridValue::RowNumber(BigDecimal::from(1)));
        assert!(cell.is_read_only());
    }

    #[test]
    fn absent_dialect_is_kept_but_displays_as_java() {
        let cell = GridCell::dialect(2, 1, None);
        assert_eq!(cell.value, GridValue::Dialect(None));
        assert_eq!(cell.display_text(None), "java");
        assert_eq!(cell.choices(), Some(attribute::DIALECTS));

        let blank = GridCell::dialect(2, 1, Some("  ".to_string()));
        assert_eq!(blank.value, GridValue::Dialect(Some("  ".to_string())));
        assert_eq!(blank.display_text(None), "java");

        let unknown = GridCell::dialect(2, 1, Some("groovy".to_string()));
        assert_eq!(unknown.value, GridValue::Dialect(Some("groovy".to_string())));
        assert_eq!(unknown.display_text(None), "groovy");
    }

    #[test]
    fn wide_numerics_display_without_rounding() {
        let value: BigDecimal = "123456789012345678901234567890.000000000000000000001"
            .parse()
            .unwrap();
        let cell = LegacyCellValue::from_numeric(Some(value.clone()));
        assert_eq!(cell.display_text(None).parse::<BigDecimal>().unwrap(), value);
    }

    #[test]
    fn otherwise_cells_display_label() {
        let cell = GridCell::new(0, 0, GridValue::Text(Some("x".to_string()))).with_otherwise(true);
        assert_eq!(cell.display_text(None), OTHERWISE_LABEL);
    }

    #[test]
    fn legacy_cells_omit_absent_slots_when_serialized() {
        let cell = LegacyCellValue::from_boolean(Some(true));
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, r#"{"data_type":"BOOLEAN","boolean_value":true}"#);
    }
}
