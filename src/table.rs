//! In-memory table model with typed column accessors.
//!
//! A [`Table`] is the normalized dataset for the current upload: header names
//! plus rows of [`Cell`]s. Known columns are reached through typed accessors
//! ([`Table::date_column`], [`Table::quantity_column`]) that return `None`
//! when the column is absent, so consumers handle partial schemas explicitly
//! instead of sprinkling name lookups.

use chrono::NaiveDate;

use crate::{
    data::{Cell, parse_day_first_date, parse_quantity},
    schema::{self, DateField},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table, padding short rows with `Missing` so every row has one
    /// cell per column.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            if row.len() < width {
                row.resize(width, Cell::Missing);
            } else {
                row.truncate(width);
            }
        }
        Table { columns, rows }
    }

    pub fn empty() -> Self {
        Table::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Rewrites every cell of one column in place.
    pub(crate) fn map_column<F>(&mut self, column: usize, mut f: F)
    where
        F: FnMut(Cell) -> Cell,
    {
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[column], Cell::Missing);
            row[column] = f(cell);
        }
    }

    /// Typed accessor for a known date column. `None` when the column is not
    /// present; otherwise one entry per row, `None` for absent dates. Text
    /// cells are reparsed day-first so the accessor stays safe on tables that
    /// skipped normalization.
    pub fn date_column(&self, field: DateField) -> Option<Vec<Option<NaiveDate>>> {
        let idx = self.column_index(field.name())?;
        let values = self
            .rows
            .iter()
            .map(|row| match &row[idx] {
                Cell::Date(d) => Some(*d),
                Cell::Text(s) => parse_day_first_date(s).ok(),
                Cell::Number(_) | Cell::Missing => None,
            })
            .collect();
        Some(values)
    }

    /// Typed accessor for the quantity column. `None` when absent; otherwise
    /// one non-negative number per row, with non-numeric cells coerced to 0.
    pub fn quantity_column(&self) -> Option<Vec<f64>> {
        let idx = self.column_index(schema::QUANTITY_COLUMN)?;
        let values = self
            .rows
            .iter()
            .map(|row| match &row[idx] {
                Cell::Number(n) => n.max(0.0),
                Cell::Text(s) => parse_quantity(s).unwrap_or(0.0).max(0.0),
                Cell::Date(_) | Cell::Missing => 0.0,
            })
            .collect();
        Some(values)
    }

    /// Returns a new table containing the rows whose flag is `true`. The flag
    /// slice must have one entry per row.
    pub fn retain_rows(&self, keep: &[bool]) -> Table {
        debug_assert_eq!(keep.len(), self.rows.len());
        let rows = self
            .rows
            .iter()
            .zip(keep)
            .filter(|(_, keep)| **keep)
            .map(|(row, _)| row.clone())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Projects onto the named columns, keeping declared order and silently
    /// omitting names the table does not have.
    pub fn project(&self, names: &[&str]) -> Table {
        let indices = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect::<Vec<_>>();
        let columns = indices
            .iter()
            .map(|&idx| self.columns[idx].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Table { columns, rows }
    }
}
