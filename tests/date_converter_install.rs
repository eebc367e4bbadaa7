use std::sync::Arc;

use chrono::NaiveDate;
use dtable_cells::cell::LegacyCellValue;
use dtable_cells::column::DataType;
use dtable_cells::date_converter::{self, ChronoDateConverter};
use dtable_cells::error::CellError;
use dtable_cells::factory::CellValueFactory;
use dtable_cells::model::DecisionTable;

// Installing is process-wide, so this binary holds the only install test.
#[test]
fn installed_converter_backs_factories_without_injection() {
    let table = DecisionTable::new("install");
    let factory = CellValueFactory::for_table(&table);
    let mut cell = LegacyCellValue::legacy("2024/07/01");
    assert_eq!(
        factory.assert_typed_value(DataType::Date, &mut cell),
        Err(CellError::DateConverterNotConfigured)
    );

    let converter = Arc::new(ChronoDateConverter::new("%Y/%m/%d").expect("valid pattern"));
    date_converter::install(converter.clone()).expect("first install");
    assert_eq!(
        date_converter::install(converter),
        Err(CellError::ConverterAlreadyInstalled)
    );

    factory
        .assert_typed_value(DataType::Date, &mut cell)
        .expect("installed converter");
    assert_eq!(cell.date_value, NaiveDate::from_ymd_opt(2024, 7, 1));

    let injected = CellValueFactory::for_table(&table)
        .with_date_converter(Arc::new(ChronoDateConverter::default()));
    let mut cell = LegacyCellValue::legacy("01-Jul-2024");
    injected
        .assert_typed_value(DataType::Date, &mut cell)
        .expect("injected converter");
    assert_eq!(cell.date_value, NaiveDate::from_ymd_opt(2024, 7, 1));
}
