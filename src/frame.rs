use crate::error::DashboardError;
use crate::types::date_range::DateRange;
use crate::types::observation::{Observation, DATE_COLUMN, NUMERIC_COLUMNS};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;

/// A wrapper around a Polars `LazyFrame` holding the observation table.
///
/// Filtering is lazy and never mutates the source: each call returns a new
/// `ObservationFrame`, so every user interaction derives a fresh view from
/// the same immutable table.
#[derive(Clone)]
pub struct ObservationFrame {
    pub frame: LazyFrame,
}

impl ObservationFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { frame: df.lazy() }
    }

    /// Applies an arbitrary Polars predicate lazily.
    pub fn filter(&self, predicate: Expr) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps only rows whose date falls within `range`, inclusive on both
    /// ends. Source order is preserved; an empty result is not an error.
    pub fn filter_range(&self, range: &DateRange) -> ObservationFrame {
        self.filter(
            col(DATE_COLUMN)
                .gt_eq(lit(range.start()))
                .and(col(DATE_COLUMN).lt_eq(lit(range.end()))),
        )
    }

    /// First `n` rows, for the dashboard's table preview.
    pub fn head(&self, n: u32) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().limit(n))
    }

    pub fn collect(&self) -> Result<DataFrame, DashboardError> {
        Ok(self.frame.clone().collect()?)
    }

    /// Materializes the view as typed rows.
    pub fn collect_observations(&self) -> Result<Vec<Observation>, DashboardError> {
        let df = self.collect()?;
        collect_observations(&df)
    }
}

fn get_opt_float(column: &Column, idx: usize) -> Option<f64> {
    column.f64().ok().and_then(|ca| ca.get(idx))
}

/// Extracts typed rows from a collected observation frame.
pub fn collect_observations(df: &DataFrame) -> Result<Vec<Observation>, DashboardError> {
    macro_rules! get_column {
        ($name:expr) => {
            df.column($name)
                .map_err(|_| DashboardError::ColumnNotFound($name.to_string()))?
        };
    }

    let date_series = get_column!(DATE_COLUMN).date()?;
    let tmax_series = get_column!(NUMERIC_COLUMNS[0]);
    let tmed_series = get_column!(NUMERIC_COLUMNS[1]);
    let tmin_series = get_column!(NUMERIC_COLUMNS[2]);
    let rain_series = get_column!(NUMERIC_COLUMNS[3]);
    let humidity_series = get_column!(NUMERIC_COLUMNS[4]);
    let wind_series = get_column!(NUMERIC_COLUMNS[5]);
    let radiation_series = get_column!(NUMERIC_COLUMNS[6]);

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let days = date_series
            .get(idx)
            .ok_or_else(|| DashboardError::ColumnNotFound(DATE_COLUMN.to_string()))?;
        rows.push(Observation {
            date: epoch_days_to_date(days),
            temp_max: get_opt_float(tmax_series, idx),
            temp_mean: get_opt_float(tmed_series, idx),
            temp_min: get_opt_float(tmin_series, idx),
            rain: get_opt_float(rain_series, idx),
            relative_humidity: get_opt_float(humidity_series, idx),
            wind_speed: get_opt_float(wind_series, idx),
            solar_radiation: get_opt_float(radiation_series, idx),
        });
    }
    Ok(rows)
}

/// Polars `Date` values are days since 1970-01-01.
pub(crate) fn epoch_days_to_date(days: i32) -> NaiveDate {
    crate::observations::normalizer::EPOCH + Duration::days(days as i64)
}
