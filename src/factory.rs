//! Column type resolution and cell coercion.
//!
//! [`CellValueFactory`] turns persisted [`LegacyCellValue`]s into typed
//! [`GridCell`]s and back. The column's [`DataType`] is resolved from the column
//! kind: row numbers are numeric, attributes follow the fixed attribute table,
//! and condition/action columns ask the model. Legacy cells are upgraded to the
//! resolved type the first time they are materialized.

use std::{str::FromStr, sync::Arc};

use log::{debug, trace, warn};
use bigdecimal::BigDecimal;

use crate::{
    attribute,
    cell::{GridCell, GridValue, LegacyCellValue},
    column::{ColumnDescriptor, DataType},
    date_converter::{self, DateConverter},
    error::{CellError, CellResult},
    facts::FactSchema,
    model::DecisionTable,
    oracle::{CompletionEngine, TypeOracle},
};

static NO_COMPLETIONS: FactSchema = FactSchema::new();

pub struct CellValueFactory<'a> {
    model: &'a dyn TypeOracle,
    completions: &'a dyn CompletionEngine,
    date_converter: Option<Arc<dyn DateConverter>>,
}

impl<'a> CellValueFactory<'a> {
    pub fn new(model: &'a dyn TypeOracle, completions: &'a dyn CompletionEngine) -> Self {
        Self {
            model,
            completions,
            date_converter: None,
        }
    }

    /// Factory whose model and completions are the table and its fact schema.
    pub fn for_table(table: &'a DecisionTable) -> Self {
        Self::new(table, &table.facts)
    }

    pub fn builder() -> CellValueFactoryBuilder<'a> {
        CellValueFactoryBuilder::default()
    }

    pub fn with_date_converter(mut self, converter: Arc<dyn DateConverter>) -> Self {
        self.date_converter = Some(converter);
        self
    }

    /// Injected converter first, then the process-wide one.
    pub fn date_converter(&self) -> CellResult<Arc<dyn DateConverter>> {
        self.date_converter
            .clone()
            .or_else(date_converter::installed)
            .ok_or(CellError::DateConverterNotConfigured)
    }

    pub fn data_type(&self, column: &ColumnDescriptor) -> DataType {
        let data_type = match column {
            ColumnDescriptor::RowNumber => DataType::Numeric,
            ColumnDescriptor::Attribute(col) => attribute::attribute_data_type(&col.attribute),
            ColumnDescriptor::Condition(_)
            | ColumnDescriptor::ActionSetField(_)
            | ColumnDescriptor::ActionInsertFact(_) => self.derive_data_type(column),
            ColumnDescriptor::Description(_) | ColumnDescriptor::Metadata(_) => DataType::String,
        };
        trace!("Column '{}' resolves to {data_type}", column.header());
        data_type
    }

    // Enumerated columns are always text; otherwise numeric > boolean > date.
    fn derive_data_type(&self, column: &ColumnDescriptor) -> DataType {
        if !self.model.value_list(column, self.completions).is_empty() {
            return DataType::String;
        }
        if self.model.is_numeric(column, self.completions) {
            DataType::Numeric
        } else if self.model.is_boolean(column, self.completions) {
            DataType::Boolean
        } else if self.model.is_date(column, self.completions) {
            DataType::Date
        } else {
            DataType::String
        }
    }

    /// Populates the typed slot matching `data_type` from the cell's text.
    ///
    /// Unparseable text leaves the slot empty. Only a missing date converter is an error.
    pub fn assert_typed_value(
        &self,
        data_type: DataType,
        cell: &mut LegacyCellValue,
    ) -> CellResult<()> {
        if cell.data_type == data_type {
            return Ok(());
        }
        let text = cell.string_value.as_deref();
        match data_type {
            DataType::Boolean => {
                cell.set_boolean_value(parse_boolean(text));
            }
            DataType::Date => {
                let converter = self.date_converter()?;
                let date = text.filter(|t| !t.trim().is_empty()).and_then(|t| {
                    converter
                        .parse(t)
                        .inspect_err(|err| warn!("Dropping malformed date cell: {err}"))
                        .ok()
                });
                cell.set_date_value(date);
            }
            DataType::Numeric => {
                let numeric = text.filter(|t| !t.trim().is_empty()).and_then(|t| {
                    let parsed = parse_numeric(t);
                    if parsed.is_none() {
                        warn!("Dropping malformed numeric cell '{t}'");
                    }
                    parsed
                });
                cell.set_numeric_value(numeric);
            }
            DataType::String => {}
        }
        Ok(())
    }

    pub fn make_cell_value(
        &self,
        column: &ColumnDescriptor,
        row: usize,
        col: usize,
        cell: &mut LegacyCellValue,
    ) -> CellResult<GridCell> {
        let data_type = self.data_type(column);
        self.assert_typed_value(data_type, cell)?;

        let grid = match data_type {
            DataType::Boolean => GridCell::new(row, col, GridValue::Boolean(cell.boolean_value)),
            DataType::Date => GridCell::new(row, col, GridValue::Date(cell.date_value)),
            DataType::Numeric => match column {
                ColumnDescriptor::RowNumber => GridCell::row_number(row, col),
                ColumnDescriptor::Attribute(attr) if attr.salience_from_row_number() => {
                    GridCell::row_number(row, col)
                }
                _ => GridCell::new(row, col, GridValue::Numeric(cell.numeric_value.clone())),
            },
            DataType::String => match column {
                ColumnDescriptor::Attribute(attr) if attr.is_dialect() => {
                    GridCell::dialect(row, col, cell.string_value.clone())
                }
                _ => GridCell::new(row, col, GridValue::Text(cell.string_value.clone())),
            },
        };
        Ok(grid.with_otherwise(cell.otherwise))
    }

    /// Builds the persisted form of a grid cell, trusting the cell's typed value.
    pub fn convert_to_model_cell(
        &self,
        column: &ColumnDescriptor,
        cell: &GridCell,
    ) -> CellResult<LegacyCellValue> {
        let data_type = self.data_type(column);
        let converted = match (data_type, &cell.value) {
            (DataType::Boolean, GridValue::Boolean(value)) => LegacyCellValue::from_boolean(*value),
            (DataType::Date, GridValue::Date(value)) => LegacyCellValue::from_date(*value),
            (DataType::Numeric, GridValue::Numeric(value)) => {
                LegacyCellValue::from_numeric(value.clone())
            }
            (DataType::Numeric, GridValue::RowNumber(value)) => {
                LegacyCellValue::from_numeric(Some(value.clone()))
            }
            (DataType::String, GridValue::Text(value)) => LegacyCellValue::from_string(value.clone()),
            (DataType::String, GridValue::Dialect(value)) => {
                LegacyCellValue::from_string(value.clone())
            }
            (expected, other) => {
                return Err(CellError::ValueTypeMismatch {
                    expected,
                    found: other.variant_name(),
                });
            }
        };
        Ok(converted.with_otherwise(cell.otherwise))
    }

    /// Upgrades every cell in `rows` in place; returns how many changed.
    pub fn upgrade_rows(
        &self,
        columns: &[ColumnDescriptor],
        rows: &mut [Vec<LegacyCellValue>],
    ) -> CellResult<usize> {
        let data_types = columns
            .iter()
            .map(|column| self.data_type(column))
            .collect::<Vec<_>>();
        let mut upgraded = 0;
        for cells in rows.iter_mut() {
            for (cell, data_type) in cells.iter_mut().zip(&data_types) {
                let before = cell.data_type;
                self.assert_typed_value(*data_type, cell)?;
                if cell.data_type != before {
                    upgraded += 1;
                }
            }
        }
        Ok(upgraded)
    }

    pub fn materialize_rows(
        &self,
        columns: &[ColumnDescriptor],
        rows: &mut [Vec<LegacyCellValue>],
    ) -> CellResult<Vec<Vec<GridCell>>> {
        rows.iter_mut()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter_mut()
                    .zip(columns)
                    .enumerate()
                    .map(|(col, (cell, column))| self.make_cell_value(column, row, col, cell))
                    .collect::<CellResult<Vec<_>>>()
            })
            .collect()
    }
}

#[derive(Default)]
pub struct CellValueFactoryBuilder<'a> {
    model: Option<&'a dyn TypeOracle>,
    completions: Option<&'a dyn CompletionEngine>,
    date_converter: Option<Arc<dyn DateConverter>>,
}

impl<'a> CellValueFactoryBuilder<'a> {
    pub fn model(mut self, model: &'a dyn TypeOracle) -> Self {
        self.model = Some(model);
        self
    }

    pub fn completions(mut self, completions: &'a dyn CompletionEngine) -> Self {
        self.completions = Some(completions);
        self
    }

    pub fn date_converter(mut self, converter: Arc<dyn DateConverter>) -> Self {
        self.date_converter = Some(converter);
        self
    }

    pub fn build(self) -> CellResult<CellValueFactory<'a>> {
        let model = self.model.ok_or(CellError::MissingModel)?;
        let completions = self.completions.unwrap_or(&NO_COMPLETIONS);
        Ok(CellValueFactory {
            model,
            completions,
            date_converter: self.date_converter,
        })
    }
}

/// Upgrades every legacy cell of `table` to its column's resolved type.
pub fn upgrade_table(
    table: &mut DecisionTable,
    dates: Option<Arc<dyn DateConverter>>,
) -> CellResult<usize> {
    let mut rows = std::mem::take(&mut table.rows);
    let result = factory_for(table, dates).upgrade_rows(&table.columns, &mut rows);
    table.rows = rows;
    let upgraded = result?;
    debug!("Upgraded {upgraded} cell(s) in table '{}'", table.name);
    Ok(upgraded)
}

/// Materializes the whole table for display, upgrading legacy cells on the way.
pub fn materialize_table(
    table: &mut DecisionTable,
    dates: Option<Arc<dyn DateConverter>>,
) -> CellResult<Vec<Vec<GridCell>>> {
    let mut rows = std::mem::take(&mut table.rows);
    let result = factory_for(table, dates).materialize_rows(&table.columns, &mut rows);
    table.rows = rows;
    result
}

fn factory_for(
    table: &DecisionTable,
    dates: Option<Arc<dyn DateConverter>>,
) -> CellValueFactory<'_> {
    let factory = CellValueFactory::for_table(table);
    match dates {
        Some(converter) => factory.with_date_converter(converter),
        None => factory,
    }
}

/// Exactly `true` (any case, no padding) is true, other text is false, empty is absent.
pub fn parse_boolean(text: Option<&str>) -> Option<bool> {
    match text {
        None => None,
        Some(t) if t.is_empty() => None,
        Some(t) => Some(t.eq_ignore_ascii_case("true")),
    }
}

/// Plain or scientific notation, at full precision.
pub fn parse_numeric(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(text.trim()).ok()
}

#[cfg(test)]
mod tests {
    use bigdecimal::num_bigint::BigInt;

    use super::*;

    #[test]
    fn parse_boolean_is_permissive() {
        assert_eq!(parse_boolean(None), None);
        assert_eq!(parse_boolean(Some("")), None);
        assert_eq!(parse_boolean(Some("TRUE")), Some(true));
        assert_eq!(parse_boolean(Some("yes")), Some(false));
    }

    #[test]
    fn parse_boolean_does_not_trim() {
        assert_eq!(parse_boolean(Some(" true")), Some(false));
        assert_eq!(parse_boolean(Some("true ")), Some(false));
        assert_eq!(parse_boolean(Some(" ")), Some(false));
    }

    #[test]
    fn parse_numeric_accepts_decimal_and_scientific() {
        assert_eq!(parse_numeric("12.50"), Some(BigDecimal::new(BigInt::from(1250), 2)));
        assert_eq!(parse_numeric("1e3"), Some(BigDecimal::from(1000)));
        assert_eq!(parse_numeric("abc"), None);
    }

    #[test]
    fn parse_numeric_keeps_full_precision() {
        let wide = parse_numeric("123456789012345678901234567890").unwrap();
        assert_eq!(wide.to_string(), "123456789012345678901234567890");

        let huge = parse_numeric("1e40").unwrap();
        assert_eq!(huge, BigDecimal::new(BigInt::from(1), -40));

        let tiny = parse_numeric("1E-30").unwrap();
        assert_eq!(tiny, BigDecimal::new(BigInt::from(1), 30));

        let fraction = parse_numeric("0.1234567890123456789012345678901234").unwrap();
        assert_eq!(
            fraction,
            BigDecimal::new(BigInt::from(1_234_567_890_123_456_789_012_345_678_901_234_i128), 34)
        );
    }

    #[test]
    fn builder_requires_model() {
        assert!(matches!(
            CellValueFactory::builder().build(),
            Err(CellError::MissingModel)
        ));
    }
}
