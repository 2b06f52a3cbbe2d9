use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body")]
    BodyRead(#[source] reqwest::Error),

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error processing observation CSV data")]
    CsvReadIo(#[source] std::io::Error),

    #[error("Parsing error processing observation CSV data")]
    CsvReadPolars(#[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Expected column '{column}' missing from source table")]
    MissingColumn { column: String },

    #[error("Unparseable date '{value}' in column 'Data' at row {row}")]
    DateParse { row: usize, value: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
