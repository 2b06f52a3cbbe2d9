use crate::export::error::ExportError;
use crate::observations::error::ObservationError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("start date {start} cannot be after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("required column '{0}' not found in table")]
    ColumnNotFound(String),
}
