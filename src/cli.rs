use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Ingest, summarize, and export supply order tracking uploads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute summary metrics for an upload, after optional filters
    Metrics(MetricsArgs),
    /// Export the filtered projection as CSV or XLSX
    Export(ExportArgs),
    /// Preview the first rows of the normalized table
    Preview(PreviewArgs),
    /// List the upload's columns and the normalization policy applied to each
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// Input file (.csv, .xls, or .xlsx)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Equality filters such as `StatusAtual=Entregue` (repeatable)
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
    /// Keep rows with DataPedido on or after this date (day-first or ISO)
    #[arg(long)]
    pub since: Option<String>,
    /// Keep rows with DataPedido on or before this date (day-first or ISO)
    #[arg(long)]
    pub until: Option<String>,
    /// Emit the snapshot as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Input file (.csv, .xls, or .xlsx)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file; extension selects the format (.csv or .xlsx)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Equality filters such as `StatusAtual=Entregue` (repeatable)
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
    /// Keep rows with DataPedido on or after this date (day-first or ISO)
    #[arg(long)]
    pub since: Option<String>,
    /// Keep rows with DataPedido on or before this date (day-first or ISO)
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input file (.csv, .xls, or .xlsx)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(short = 'n', long = "rows", default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Input file (.csv, .xls, or .xlsx)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}
