use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed writing spreadsheet archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error writing spreadsheet data")]
    Io(#[from] std::io::Error),

    #[error("Column '{column}' has type {dtype}, which the spreadsheet format cannot represent")]
    UnsupportedColumnType { column: String, dtype: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
