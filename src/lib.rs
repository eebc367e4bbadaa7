pub mod attribute;
pub mod cell;
pub mod cli;
pub mod column;
pub mod date_converter;
pub mod error;
pub mod factory;
pub mod facts;
pub mod model;
pub mod oracle;
pub mod table;

use std::{env, io, sync::Arc, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, RenderFormat},
    column::DataType,
    date_converter::{ChronoDateConverter, DateConverter},
    factory::CellValueFactory,
    model::DecisionTable,
    oracle::TypeOracle,
    table::Alignment,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("dtable_cells", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args),
        Commands::Render(args) => handle_render(&args),
        Commands::Upgrade(args) => handle_upgrade(&args),
    }
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let table = DecisionTable::load(&args.table)
        .with_context(|| format!("Loading decision table {:?}", args.table))?;
    let factory = CellValueFactory::for_table(&table);
    let rows = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.kind().to_string(),
                column.header(),
                factory.data_type(column).to_string(),
                table.value_list(column, &table.facts).iter().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "kind", "header", "type", "values"]
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let mut alignments = vec![Alignment::Left; headers.len()];
    alignments[0] = Alignment::Right;
    print!("{}", table::render_grid(&headers, &alignments, &rows));
    info!(
        "Resolved {} column(s) for table '{}'",
        table.columns.len(),
        table.name
    );
    Ok(())
}

fn handle_render(args: &cli::RenderArgs) -> Result<()> {
    let mut table = DecisionTable::load(&args.table)
        .with_context(|| format!("Loading decision table {:?}", args.table))?;
    let converter = date_converter_for(&table, args.date_format.as_deref())?;
    let grid = factory::materialize_table(&mut table, Some(converter.clone()))
        .with_context(|| format!("Materializing cells of {:?}", args.table))?;

    let factory = CellValueFactory::for_table(&table);
    let visible = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| args.all || !column.config().is_some_and(|c| c.hidden))
        .map(|(idx, column)| (idx, column, factory.data_type(column)))
        .collect::<Vec<_>>();
    debug!(
        "Rendering {} of {} column(s)",
        visible.len(),
        table.columns.len()
    );

    let headers = visible
        .iter()
        .map(|(_, column, _)| column.header())
        .collect::<Vec<_>>();
    let rows = grid
        .iter()
        .map(|cells| {
            visible
                .iter()
                .map(|(idx, _, _)| cells[*idx].display_text(Some(converter.as_ref())))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    match args.format {
        RenderFormat::Table => {
            let alignments = visible
                .iter()
                .map(|(_, _, data_type)| match data_type {
                    DataType::Numeric => Alignment::Right,
                    _ => Alignment::Left,
                })
                .collect::<Vec<_>>();
            print!("{}", table::render_grid(&headers, &alignments, &rows));
        }
        RenderFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(&headers)?;
            for row in &rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
    }
    info!("Rendered {} row(s) from {:?}", rows.len(), args.table);
    Ok(())
}

fn handle_upgrade(args: &cli::UpgradeArgs) -> Result<()> {
    let mut table = DecisionTable::load(&args.table)
        .with_context(|| format!("Loading decision table {:?}", args.table))?;
    let converter = date_converter_for(&table, args.date_format.as_deref())?;
    let upgraded = factory::upgrade_table(&mut table, Some(converter))
        .with_context(|| format!("Upgrading cells of {:?}", args.table))?;
    table
        .save(&args.output)
        .with_context(|| format!("Writing decision table to {:?}", args.output))?;
    info!(
        "Upgraded {} cell(s) across {} row(s); written to {:?}",
        upgraded,
        table.row_count(),
        args.output
    );
    Ok(())
}

fn date_converter_for(
    table: &DecisionTable,
    override_format: Option<&str>,
) -> Result<Arc<dyn DateConverter>> {
    let converter = match override_format.or(table.date_format.as_deref()) {
        Some(pattern) => ChronoDateConverter::new(pattern)
            .with_context(|| format!("Configuring date format for table '{}'", table.name))?,
        None => ChronoDateConverter::default(),
    };
    debug!("Using date format '{}'", converter.pattern());
    Ok(Arc::new(converter))
}
