//! Filtered-data export: fixed projection to `;`-delimited CSV or XLSX.
//!
//! The projection is restricted to whichever declared columns the table
//! actually has, in declared order; a missing column is silently omitted
//! rather than failing. Values are emitted from their normalized form, dates
//! formatted as ISO.

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use rust_xlsxwriter::Workbook;

use crate::{data::Cell, ingest::CSV_DELIMITER, schema, table::Table};

/// Restricts a table to the declared export columns.
pub fn project(table: &Table) -> Table {
    table.project(&schema::EXPORT_COLUMNS)
}

pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    if table.columns().is_empty() {
        // Nothing was loaded; an export with zero columns has no header to
        // write.
        return Ok(Vec::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("Writing CSV export header")?;
    for (row_idx, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(Cell::as_display))
            .with_context(|| format!("Writing CSV export row {}", row_idx + 1))?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow!("Finalizing CSV export: {err}"))
}

pub fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .with_context(|| format!("Writing XLSX header '{name}'"))?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let target_row = (row_idx + 1) as u32;
            match cell {
                Cell::Number(n) => {
                    worksheet.write_number(target_row, col as u16, *n)?;
                }
                other => {
                    worksheet.write_string(target_row, col as u16, other.as_display())?;
                }
            }
        }
    }
    workbook
        .save_to_buffer()
        .context("Serializing XLSX export")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Table {
        Table::new(
            vec![
                "NumeroPedido".to_string(),
                "QuantidadeProduto".to_string(),
                "Entregue".to_string(),
                "EstadoEntrega".to_string(),
            ],
            vec![vec![
                Cell::Text("P-1".to_string()),
                Cell::Number(10.0),
                Cell::Date(NaiveDate::from_ymd_opt(2024, 4, 3).unwrap()),
                Cell::Text("SP".to_string()),
            ]],
        )
    }

    #[test]
    fn projection_keeps_declared_order_and_drops_extras() {
        let projected = project(&sample());
        // EstadoEntrega is not part of the export list; OrdemServico and the
        // rest are absent from the source and silently omitted.
        assert_eq!(
            projected.columns(),
            ["NumeroPedido", "QuantidadeProduto", "Entregue"]
        );
    }

    #[test]
    fn csv_export_is_semicolon_delimited_with_formatted_dates() {
        let bytes = to_csv_bytes(&project(&sample())).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "NumeroPedido;QuantidadeProduto;Entregue\nP-1;10;2024-04-03\n"
        );
    }

    #[test]
    fn xlsx_export_produces_a_zip_container() {
        let bytes = to_xlsx_bytes(&project(&sample())).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
