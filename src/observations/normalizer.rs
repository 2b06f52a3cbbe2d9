use crate::observations::error::ObservationError;
use crate::types::observation::{DATE_COLUMN, NUMERIC_COLUMNS};
use chrono::NaiveDate;
use polars::prelude::*;

/// Date format used by the SIMEPAR sheet's `Data` column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub(crate) const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => panic!("invalid epoch"),
};

/// Converts the raw all-string CSV frame into the observation table.
///
/// The `Data` column is parsed strictly as `%d/%m/%Y`; a single bad date cell
/// fails the whole load, since every downstream operation keys on dates. The
/// numeric columns get `,` replaced by `.` and are parsed as `f64`; cells that
/// still fail to parse become nulls rather than errors (lenient policy).
///
/// Output row count equals input row count. Column order is `Data` first,
/// then the seven numeric columns in table order.
pub fn normalize(raw: DataFrame) -> Result<DataFrame, ObservationError> {
    let date_values = raw
        .column(DATE_COLUMN)
        .map_err(|_| ObservationError::MissingColumn {
            column: DATE_COLUMN.to_string(),
        })?
        .str()?;

    let mut days = Vec::with_capacity(raw.height());
    for (row, value) in date_values.into_iter().enumerate() {
        let parsed = value.and_then(|v| NaiveDate::parse_from_str(v.trim(), DATE_FORMAT).ok());
        match parsed {
            Some(date) => days.push((date - EPOCH).num_days() as i32),
            None => {
                return Err(ObservationError::DateParse {
                    row,
                    value: value.unwrap_or_default().to_string(),
                })
            }
        }
    }

    let mut columns = Vec::with_capacity(1 + NUMERIC_COLUMNS.len());
    columns.push(
        Int32Chunked::from_vec(DATE_COLUMN.into(), days)
            .into_date()
            .into_series()
            .into_column(),
    );

    for name in NUMERIC_COLUMNS {
        let values = raw
            .column(name)
            .map_err(|_| ObservationError::MissingColumn {
                column: name.to_string(),
            })?
            .str()?;
        let parsed: Vec<Option<f64>> = values
            .into_iter()
            .map(|cell| cell.and_then(parse_decimal))
            .collect();
        columns.push(
            Float64Chunked::from_slice_options(name.into(), &parsed)
                .into_series()
                .into_column(),
        );
    }

    Ok(DataFrame::new(columns)?)
}

/// Parses a locale-formatted numeric cell, accepting `,` as decimal separator.
fn parse_decimal(cell: &str) -> Option<f64> {
    cell.trim().replace(',', ".").parse::<f64>().ok()
}
