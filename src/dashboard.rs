//! Entry point tying the pipeline together: memoized load, range-filtered
//! views, snapshot computation and the Excel download artifact.

use crate::error::DashboardError;
use crate::export::xlsx::to_spreadsheet_bytes;
use crate::frame::ObservationFrame;
use crate::observations::loader::ObservationLoader;
use crate::observations::table_cache::TableCache;
use crate::snapshot::DashboardSnapshot;
use crate::types::date_range::{DateRange, DEFAULT_END, DEFAULT_START};
use bon::bon;
use chrono::NaiveDate;
use polars::frame::DataFrame;

/// The dashboard's data backend.
///
/// Holds the loader and the process-wide table cache; the observation table
/// is fetched at most once per process and treated as immutable afterwards.
/// Every user interaction derives fresh views from it through [`snapshot`]
/// and [`export_xlsx`].
///
/// [`snapshot`]: Dashboard::snapshot
/// [`export_xlsx`]: Dashboard::export_xlsx
pub struct Dashboard {
    loader: ObservationLoader,
    cache: TableCache,
}

#[bon]
impl Dashboard {
    /// Client against the production SIMEPAR sheet.
    pub fn new() -> Self {
        Self::with_loader(ObservationLoader::new())
    }

    /// Client against a custom CSV endpoint (used by tests).
    pub fn with_source_url(source_url: String) -> Self {
        Self::with_loader(ObservationLoader::with_source_url(source_url))
    }

    fn with_loader(loader: ObservationLoader) -> Self {
        Self {
            loader,
            cache: TableCache::new(),
        }
    }

    /// The full observation table, fetched on first access and memoized.
    pub async fn observations(&self) -> Result<DataFrame, DashboardError> {
        Ok(self.cache.get_or_load(&self.loader).await?)
    }

    /// The observation table as a lazy frame for ad-hoc filtering.
    pub async fn observation_frame(&self) -> Result<ObservationFrame, DashboardError> {
        Ok(ObservationFrame::from_dataframe(self.observations().await?))
    }

    /// Drops the memoized table; the next access refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }

    /// Computes one interaction cycle's dashboard state.
    ///
    /// `start`/`end` default to the dashboard's date-picker defaults
    /// (2023-01-01 and 2024-12-31). An inverted range fails with
    /// [`DashboardError::InvalidDateRange`] before anything is fetched or
    /// filtered; the client stays usable for a corrected input.
    #[builder]
    pub async fn snapshot(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DashboardSnapshot, DashboardError> {
        let range = Self::resolve_range(start, end)?;
        let table = self.observations().await?;
        DashboardSnapshot::compute(&table, &range)
    }

    /// Serializes the filtered view for the given range as XLSX bytes,
    /// ready to be offered as `dados_santa_helena.xlsx`.
    #[builder]
    pub async fn export_xlsx(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<u8>, DashboardError> {
        let range = Self::resolve_range(start, end)?;
        let view = self.observation_frame().await?.filter_range(&range);
        Ok(to_spreadsheet_bytes(&view.collect()?)?)
    }

    fn resolve_range(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange, DashboardError> {
        DateRange::new(start.unwrap_or(DEFAULT_START), end.unwrap_or(DEFAULT_END))
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::{DATE_COLUMN, NUMERIC_COLUMNS};
    use mockito::{Server, ServerGuard};

    async fn served_dashboard(rows: &[&str]) -> (ServerGuard, Dashboard) {
        let mut server = Server::new_async().await;
        let mut body = format!("{},{}\n", DATE_COLUMN, NUMERIC_COLUMNS.join(","));
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        server
            .mock("GET", "/dados.csv")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        let dashboard = Dashboard::with_source_url(server.url() + "/dados.csv");
        (server, dashboard)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn snapshot_uses_default_date_pickers() {
        let (_server, dashboard) = served_dashboard(&[
            "31/12/2022,\"1,0\",\"1,0\",\"1,0\",\"1,0\",\"1,0\",\"1,0\",\"1,0\"",
            "01/01/2023,\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\"",
            "31/12/2024,\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\"",
        ])
        .await;

        let snapshot = dashboard.snapshot().call().await.unwrap();
        // 2022-12-31 falls outside the default pickers.
        assert_eq!(snapshot.row_count, 2);
        assert_eq!(snapshot.range.start(), DEFAULT_START);
        assert_eq!(snapshot.range.end(), DEFAULT_END);
    }

    #[tokio::test]
    async fn inverted_range_short_circuits_before_any_fetch() {
        // Nothing listens on port 1; if validation didn't come first this
        // would surface a network error instead.
        let dashboard = Dashboard::with_source_url("http://127.0.0.1:1/dados.csv".into());
        let err = dashboard
            .snapshot()
            .start(date(2024, 1, 1))
            .end(date(2023, 1, 1))
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDateRange { .. }));
    }

    #[tokio::test]
    async fn dashboard_survives_an_invalid_range() {
        let (_server, dashboard) = served_dashboard(&[
            "01/01/2023,\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\"",
        ])
        .await;

        let err = dashboard
            .snapshot()
            .start(date(2024, 1, 1))
            .end(date(2023, 1, 1))
            .call()
            .await;
        assert!(err.is_err());

        // The next, corrected interaction works.
        let snapshot = dashboard.snapshot().call().await.unwrap();
        assert_eq!(snapshot.row_count, 1);
    }

    #[tokio::test]
    async fn export_contains_exactly_the_filtered_rows() {
        use calamine::{Reader, Xlsx};
        use std::io::Cursor;

        let (_server, dashboard) = served_dashboard(&[
            "01/01/2023,\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\"",
            "02/01/2023,\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\",\"3,0\"",
            "05/06/2024,\"4,0\",\"4,0\",\"4,0\",\"4,0\",\"4,0\",\"4,0\",\"4,0\"",
        ])
        .await;

        let bytes = dashboard
            .export_xlsx()
            .start(date(2023, 1, 1))
            .end(date(2023, 12, 31))
            .call()
            .await
            .unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook
            .worksheet_range(crate::export::xlsx::SHEET_NAME)
            .unwrap();
        assert_eq!(range.height(), 3); // header + the two 2023 rows
    }

    #[tokio::test]
    async fn repeated_interactions_reuse_the_memoized_table() {
        let mut server = Server::new_async().await;
        let body = format!(
            "{},{}\n01/06/2023,\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\",\"2,0\"\n",
            DATE_COLUMN,
            NUMERIC_COLUMNS.join(",")
        );
        let mock = server
            .mock("GET", "/dados.csv")
            .with_status(200)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;

        let dashboard = Dashboard::with_source_url(server.url() + "/dados.csv");
        dashboard.snapshot().call().await.unwrap();
        dashboard.snapshot().call().await.unwrap();
        dashboard.export_xlsx().call().await.unwrap();

        mock.assert_async().await;
    }
}
