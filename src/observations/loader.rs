use crate::observations::error::ObservationError;
use crate::observations::normalizer::normalize;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

/// Published SIMEPAR sheet for Santa Helena/PR, exported as CSV.
pub const SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQABQ6C2vW_WgMOWICPPwoaUNp34JcThVJiFBgCPh2P7VvDW2PyqnkAEfdUxiesAwz5Hunuzeh5IykV/pub?gid=526963453&single=true&output=csv";

/// Fetches the raw observation CSV and turns it into the normalized table.
pub struct ObservationLoader {
    source_url: String,
    download_client: Client,
}

impl ObservationLoader {
    pub fn new() -> Self {
        Self::with_source_url(SOURCE_URL.to_string())
    }

    /// Uses a custom CSV endpoint. Lets tests point the loader at a mock server.
    pub fn with_source_url(source_url: String) -> Self {
        Self {
            source_url,
            download_client: Client::new(),
        }
    }

    /// Downloads, parses and normalizes the observation table.
    pub async fn load(&self) -> Result<DataFrame, ObservationError> {
        let raw_bytes = self.download().await?;
        let raw = Self::csv_to_dataframe(raw_bytes).await?;
        normalize(raw)
    }

    async fn download(&self) -> Result<Vec<u8>, ObservationError> {
        let url = self.source_url.clone();
        info!("Downloading observation data from {}", url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ObservationError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ObservationError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ObservationError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(ObservationError::BodyRead)?;
        info!("Downloaded {} bytes of observation data", body.len());
        Ok(body.to_vec())
    }

    /// Parses raw CSV bytes (with header row) into an all-string DataFrame
    /// using a blocking task. Type conversion is the normalizer's job.
    async fn csv_to_dataframe(bytes: Vec<u8>) -> Result<DataFrame, ObservationError> {
        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new().map_err(ObservationError::CsvReadIo)?;
            temp_file
                .write_all(&bytes)
                .map_err(ObservationError::CsvReadIo)?;
            temp_file.flush().map_err(ObservationError::CsvReadIo)?;

            let df = CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(0))
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(ObservationError::CsvReadPolars)?
                .finish()
                .map_err(ObservationError::CsvReadPolars)?;

            Ok(df)
        })
        .await?
    }
}

impl Default for ObservationLoader {
    fn default() -> Self {
        Self::new()
    }
}
