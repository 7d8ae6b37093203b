//! Known-column normalization.
//!
//! Applies the fixed per-column policy after decoding:
//!
//! - date columns (`DataPedido`, `PrevisaoEntrega`, `Entregue`) are parsed
//!   day-first; unparsable cells become absent rather than erroring,
//! - `QuantidadeProduto` becomes a non-negative number; failures and missing
//!   cells become 0,
//! - every other column keeps its values but has missing cells filled with
//!   the placeholder text.
//!
//! Columns absent from the upload are skipped; normalization never adds a
//! column the source did not have.

use crate::{
    data::{Cell, parse_day_first_date, parse_quantity},
    schema::{self, Semantic},
    table::Table,
};

pub fn normalize(mut table: Table) -> Table {
    let semantics = table
        .columns()
        .iter()
        .map(|name| schema::semantic_of(name))
        .collect::<Vec<_>>();

    for (idx, semantic) in semantics.into_iter().enumerate() {
        match semantic {
            Semantic::Date(_) => table.map_column(idx, normalize_date_cell),
            Semantic::Quantity => table.map_column(idx, normalize_quantity_cell),
            Semantic::Text => table.map_column(idx, fill_missing_text),
        }
    }
    table
}

fn normalize_date_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Date(d) => Cell::Date(d),
        Cell::Text(s) => match parse_day_first_date(&s) {
            Ok(d) => Cell::Date(d),
            Err(_) => Cell::Missing,
        },
        Cell::Number(_) | Cell::Missing => Cell::Missing,
    }
}

fn normalize_quantity_cell(cell: Cell) -> Cell {
    let value = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) => parse_quantity(&s).unwrap_or(0.0),
        Cell::Date(_) | Cell::Missing => 0.0,
    };
    Cell::Number(value.max(0.0))
}

fn fill_missing_text(cell: Cell) -> Cell {
    if cell.is_missing() {
        Cell::Text(schema::PLACEHOLDER.to_string())
    } else {
        cell
    }
}
