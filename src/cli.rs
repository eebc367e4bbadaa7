use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Resolve and coerce decision table cell types", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the columns of a decision table with their resolved data types
    Columns(ColumnsArgs),
    /// Materialize every cell of a decision table and print it
    Render(RenderArgs),
    /// Upgrade legacy text cells to typed cells and write the table back out
    Upgrade(UpgradeArgs),
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Decision table file (.yaml or .json)
    #[arg(short, long)]
    pub table: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    #[default]
    Table,
    Csv,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Decision table file (.yaml or .json)
    #[arg(short, long)]
    pub table: PathBuf,
    /// Output layout
    #[arg(long, value_enum, default_value_t = RenderFormat::Table)]
    pub format: RenderFormat,
    /// strftime pattern for date cells (overrides the table's date_format)
    #[arg(long = "date-format")]
    pub date_format: Option<String>,
    /// Include hidden columns
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct UpgradeArgs {
    /// Decision table file (.yaml or .json)
    #[arg(short, long)]
    pub table: PathBuf,
    /// Destination file; `.json` writes JSON, anything else YAML
    #[arg(short, long)]
    pub output: PathBuf,
    /// strftime pattern for date cells (overrides the table's date_format)
    #[arg(long = "date-format")]
    pub date_format: Option<String>,
}
