use std::sync::Arc;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use dtable_cells::cell::LegacyCellValue;
use dtable_cells::column::{AttributeColumn, ColumnDescriptor, ConditionColumn};
use dtable_cells::date_converter::ChronoDateConverter;
use dtable_cells::factory;
use dtable_cells::facts::{FactSchema, FieldSpec};
use dtable_cells::model::DecisionTable;
use dtable_cells::oracle::FieldType;

fn legacy_table(rows: usize) -> DecisionTable {
    let mut table = DecisionTable::new("bench")
        .with_facts(
            FactSchema::new()
                .with_field("Order", "total", FieldSpec::typed(FieldType::Numeric))
                .with_field("Order", "status", FieldSpec::enumerated(["open", "shipped"])),
        )
        .with_column(ColumnDescriptor::RowNumber)
        .with_column(AttributeColumn::new("salience").with_row_number(true))
        .with_column(AttributeColumn::new("date-effective"))
        .with_column(ConditionColumn {
            bound_name: "o".to_string(),
            fact_type: "Order".to_string(),
            fact_field: "total".to_string(),
            ..ConditionColumn::default()
        })
        .with_column(ConditionColumn {
            bound_name: "o".to_string(),
            fact_type: "Order".to_string(),
            fact_field: "status".to_string(),
            ..ConditionColumn::default()
        });
    for i in 0..rows {
        let day = (i % 28) + 1;
        table.rows.push(vec![
            LegacyCellValue::default(),
            LegacyCellValue::legacy(i.to_string()),
            LegacyCellValue::legacy(format!("{day:02}-Jan-2024")),
            LegacyCellValue::legacy(format!("{}.50", i % 500)),
            LegacyCellValue::legacy(if i % 2 == 0 { "open" } else { "shipped" }),
        ]);
    }
    table
}

fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_table");
    group.sample_size(20);
    let converter = Arc::new(ChronoDateConverter::default());
    group.bench_function("legacy_10k_rows", |b| {
        b.iter_batched(
            || legacy_table(10_000),
            |mut table| {
                factory::materialize_table(&mut table, Some(converter.clone()))
                    .expect("materialize")
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_materialize);
criterion_main!(benches);
