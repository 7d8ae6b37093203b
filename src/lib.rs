pub mod cache;
pub mod cli;
pub mod data;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod render;
pub mod schema;
pub mod table;

use std::{env, fs, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    data::parse_day_first_date,
    filter::DateRange,
    table::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("supply_board", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Metrics(args) => handle_metrics(&args),
        Commands::Export(args) => handle_export(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_metrics(args: &cli::MetricsArgs) -> Result<()> {
    let filtered = load_filtered(
        &args.input,
        &args.filters,
        args.since.as_deref(),
        args.until.as_deref(),
    )?;
    let snapshot = metrics::compute(&filtered);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let headers = vec!["metric".to_string(), "value".to_string()];
        let rows = vec![
            vec![
                "total_pedidos".to_string(),
                snapshot.total_pedidos.to_string(),
            ],
            vec![
                "pedidos_entregues".to_string(),
                snapshot.pedidos_entregues.to_string(),
            ],
            vec![
                "pedidos_pendentes".to_string(),
                snapshot.pedidos_pendentes.to_string(),
            ],
            vec![
                "quantidade_total".to_string(),
                snapshot.quantidade_total.to_string(),
            ],
            vec![
                "taxa_entrega".to_string(),
                format!("{:.1}%", snapshot.taxa_entrega),
            ],
        ];
        render::print_table(&headers, &rows);
    }
    info!(
        "Computed metrics over {} filtered row(s)",
        snapshot.total_pedidos
    );
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let filtered = load_filtered(
        &args.input,
        &args.filters,
        args.since.as_deref(),
        args.until.as_deref(),
    )?;
    let projected = export::project(&filtered);

    let extension = args
        .output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let bytes = match extension.as_str() {
        "csv" => export::to_csv_bytes(&projected)?,
        "xls" | "xlsx" => export::to_xlsx_bytes(&projected)?,
        other => {
            return Err(anyhow!(
                "Unsupported export format '{other}': use .csv or .xlsx"
            ));
        }
    };
    fs::write(&args.output, bytes)
        .with_context(|| format!("Writing export to {:?}", args.output))?;
    info!(
        "Exported {} row(s) across {} column(s) to {:?}",
        projected.row_count(),
        projected.columns().len(),
        args.output
    );
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let (bytes, filename) = read_upload(&args.input)?;
    let mut cache = cache::LoadCache::new();
    let table = cache.load(&bytes, &filename);

    let rows = table
        .rows()
        .iter()
        .take(args.rows)
        .map(|row| row.iter().map(|cell| cell.as_display()).collect())
        .collect::<Vec<Vec<String>>>();
    render::print_table(table.columns(), &rows);
    info!(
        "Previewed {} of {} row(s) from '{filename}'",
        rows.len(),
        table.row_count()
    );
    Ok(())
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let (bytes, filename) = read_upload(&args.input)?;
    let mut cache = cache::LoadCache::new();
    let table = cache.load(&bytes, &filename);

    let headers = vec![
        "#".to_string(),
        "column".to_string(),
        "handling".to_string(),
    ];
    let rows = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            vec![
                (idx + 1).to_string(),
                name.clone(),
                schema::semantic_of(name).describe().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    info!("Listed {} column(s) from '{filename}'", rows.len());
    Ok(())
}

fn load_filtered(
    input: &Path,
    filters: &[String],
    since: Option<&str>,
    until: Option<&str>,
) -> Result<Table> {
    let (bytes, filename) = read_upload(input)?;
    let mut cache = cache::LoadCache::new();
    let table = cache.load(&bytes, &filename);

    let equals = filter::parse_equals_filters(filters)?;
    let range = parse_date_range(since, until)?;
    filter::apply(&table, &equals, range)
}

fn read_upload(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = fs::read(path).with_context(|| format!("Reading upload {path:?}"))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());
    Ok((bytes, filename))
}

fn parse_date_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
    let since = since
        .map(|value| {
            parse_day_first_date(value).with_context(|| format!("Parsing --since '{value}'"))
        })
        .transpose()?;
    let until = until
        .map(|value| {
            parse_day_first_date(value).with_context(|| format!("Parsing --until '{value}'"))
        })
        .transpose()?;
    Ok(DateRange { since, until })
}
