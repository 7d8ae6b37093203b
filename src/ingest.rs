//! Upload decoding: extension dispatch, encoding fallback, workbook parsing.
//!
//! `decode` turns raw upload bytes plus the declared filename into a raw
//! [`Table`]. CSV uploads are `;`-delimited and of unknown provenance, so
//! decoding walks a fixed, ordered list of encodings (UTF-8 first, then the
//! legacy single-byte ones) and takes the first attempt that both decodes and
//! parses. Spreadsheets go through `calamine`.
//!
//! `load_table` is the boundary wrapper the rest of the pipeline uses: every
//! ingest failure is reported and collapsed into an empty table, so
//! downstream consumers see "no data loaded" rather than a fault.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType as _, Reader as _, open_workbook_auto_from_rs};
use encoding_rs::Encoding;
use log::{debug, error, info};
use thiserror::Error;

use crate::{data::Cell, normalize, table::Table};

pub const CSV_DELIMITER: u8 = b';';

/// Encoding fallback order for CSV uploads. Tried first to last; the labels
/// mirror what upload sources actually declare, even though `encoding_rs`
/// resolves the latin-1 family to the same windows-1252 decoder.
const ENCODING_LABELS: [&str; 4] = ["utf-8", "latin-1", "iso-8859-1", "windows-1252"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file format '{extension}': expected .csv, .xls, or .xlsx")]
    UnsupportedFormat { extension: String },
    #[error("no encoding succeeded for '{filename}'")]
    NoEncodingSucceeded { filename: String },
    #[error("spreadsheet parse failed: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("workbook contains no worksheets")]
    EmptyWorkbook,
}

/// Decodes upload bytes into a raw (un-normalized) table, dispatching on the
/// declared filename's extension.
pub fn decode(bytes: &[u8], filename: &str) -> Result<Table, IngestError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => decode_csv(bytes, filename),
        "xls" | "xlsx" => decode_workbook(bytes),
        _ => Err(IngestError::UnsupportedFormat { extension }),
    }
}

/// Boundary wrapper: decode plus normalize, with every failure reported and
/// converted into an empty table.
pub fn load_table(bytes: &[u8], filename: &str) -> Table {
    match decode(bytes, filename) {
        Ok(table) => {
            info!(
                "Loaded '{filename}': {} row(s), {} column(s)",
                table.row_count(),
                table.columns().len()
            );
            normalize::normalize(table)
        }
        Err(err) => {
            error!("Failed to load '{filename}': {err}");
            Table::empty()
        }
    }
}

fn decode_csv(bytes: &[u8], filename: &str) -> Result<Table, IngestError> {
    for label in ENCODING_LABELS {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            continue;
        };
        let Some(text) = decode_bytes(bytes, encoding) else {
            debug!("Encoding {} rejected '{filename}'", encoding.name());
            continue;
        };
        match parse_csv_text(&text) {
            Ok(table) => {
                debug!("Decoded '{filename}' under encoding {}", encoding.name());
                return Ok(table);
            }
            Err(err) => {
                debug!(
                    "CSV parse of '{filename}' under {} failed: {err}",
                    encoding.name()
                );
            }
        }
    }
    Err(IngestError::NoEncodingSucceeded {
        filename: filename.to_string(),
    })
}

fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

fn parse_csv_text(text: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(CSV_DELIMITER)
        .double_quote(true)
        .flexible(false)
        .from_reader(Cursor::new(text.as_bytes()));
    let columns = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Missing
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Table::new(columns, rows))
}

fn decode_workbook(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::empty());
    };
    let columns = header_row
        .iter()
        .map(|cell| cell.as_string().unwrap_or_else(|| cell.to_string()))
        .collect();
    let body = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();
    Ok(Table::new(columns, body))
}

fn workbook_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Missing,
        Data::String(s) if s.is_empty() => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::Missing,
        },
        Data::Error(_) | Data::DurationIso(_) => Cell::Missing,
    }
}
