use crate::error::DashboardError;
use polars::frame::DataFrame;

/// Running cumulative sum over a series, aligned row-for-row with its input.
///
/// Missing values contribute 0 to the running total instead of being skipped
/// or propagated. That matches the source dashboard, where the accumulated
/// rain and radiation overlays treat gaps as "no rain measured". The policy
/// lives here, in one place, rather than being an accident of coercion.
pub fn cumulative(values: &[Option<f64>]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|value| {
            total += value.unwrap_or(0.0);
            total
        })
        .collect()
}

/// Cumulative sum over a named `f64` column of a collected view.
pub fn cumulative_column(df: &DataFrame, column: &str) -> Result<Vec<f64>, DashboardError> {
    let series = df
        .column(column)
        .map_err(|_| DashboardError::ColumnNotFound(column.to_string()))?
        .f64()?;
    let values: Vec<Option<f64>> = series.into_iter().collect();
    Ok(cumulative(&values))
}
