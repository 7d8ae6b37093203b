use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single cell of an uploaded table.
///
/// Uploads are heterogeneous: CSV fields arrive as text, spreadsheet cells
/// arrive already typed. `Missing` covers empty fields and blank cells so
/// normalization can apply its fill policy per column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Parses a date under the day-first convention: `03/04/2024` is 3 April,
/// not March 4. ISO dates are accepted unchanged since they are unambiguous.
pub fn parse_day_first_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%d/%m/%y", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &[
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed.date());
        }
    }
    Err(anyhow!("Failed to parse '{value}' as day-first date"))
}

/// Parses a quantity field. Returns `None` for anything non-numeric so the
/// caller can apply the coerce-to-zero policy.
pub fn parse_quantity(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn day_first_date_puts_day_before_month() {
        let expected = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        assert_eq!(parse_day_first_date("03/04/2024").unwrap(), expected);
        assert_eq!(parse_day_first_date("03-04-2024").unwrap(), expected);
    }

    #[test]
    fn iso_dates_parse_unchanged() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_day_first_date("2024-03-01").unwrap(), expected);
        assert_eq!(
            parse_day_first_date("2024-03-01 00:00:00").unwrap(),
            expected
        );
    }

    #[test]
    fn unparsable_dates_error() {
        assert!(parse_day_first_date("not a date").is_err());
        assert!(parse_day_first_date("").is_err());
        assert!(parse_day_first_date("32/13/2024").is_err());
    }

    #[test]
    fn quantity_accepts_integers_and_decimals() {
        assert_eq!(parse_quantity("10"), Some(10.0));
        assert_eq!(parse_quantity(" 5.5 "), Some(5.5));
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("NaN"), None);
    }

    #[test]
    fn cell_display_drops_trailing_zero_fraction() {
        assert_eq!(Cell::Number(10.0).as_display(), "10");
        assert_eq!(Cell::Number(5.5).as_display(), "5.5");
        assert_eq!(Cell::Missing.as_display(), "");
    }
}
