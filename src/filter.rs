//! Row-subset filters applied before metrics computation and export.
//!
//! Mirrors the dashboard's sidebar controls: repeatable `Column=Value`
//! equality predicates plus an optional inclusive date range over
//! `DataPedido`. Filtering produces a fresh table; the loaded table is never
//! mutated.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::{schema::DateField, table::Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsFilter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }
}

/// Parses `Column=Value` filter specs.
pub fn parse_equals_filters(specs: &[String]) -> Result<Vec<EqualsFilter>> {
    specs
        .iter()
        .map(|spec| {
            let (column, value) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("Filter '{spec}' must have the form Column=Value"))?;
            let column = column.trim();
            if column.is_empty() {
                return Err(anyhow!("Filter '{spec}' is missing a column name"));
            }
            Ok(EqualsFilter {
                column: column.to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// Applies equality filters and the `DataPedido` date range, returning the
/// surviving rows. Filtering on a column the table does not have is an
/// error; rows without a valid `DataPedido` are excluded whenever a range is
/// given.
pub fn apply(table: &Table, equals: &[EqualsFilter], range: DateRange) -> Result<Table> {
    let mut keep = vec![true; table.row_count()];

    for filter in equals {
        let idx = table
            .column_index(&filter.column)
            .ok_or_else(|| anyhow!("Column '{}' not found for filter", filter.column))?;
        for (row_idx, row) in table.rows().iter().enumerate() {
            if keep[row_idx] && row[idx].as_display() != filter.value {
                keep[row_idx] = false;
            }
        }
    }

    if !range.is_unbounded() {
        let dates = table
            .date_column(DateField::DataPedido)
            .ok_or_else(|| anyhow!("Column 'DataPedido' not found for date range filter"))?;
        for (row_idx, date) in dates.iter().enumerate() {
            match date {
                Some(date) if range.contains(*date) => {}
                _ => keep[row_idx] = false,
            }
        }
    }

    Ok(table.retain_rows(&keep))
}
