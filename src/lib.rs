mod aggregate;
mod dashboard;
mod error;
mod export;
mod frame;
mod observations;
mod snapshot;
mod types;

pub use error::DashboardError;

pub use aggregate::{cumulative, cumulative_column};
pub use dashboard::Dashboard;
pub use frame::{collect_observations, ObservationFrame};
pub use snapshot::{
    DashboardSnapshot, HumidityWindPanel, OverlayPanel, TemperaturePanel, PREVIEW_ROWS,
};

pub use export::error::ExportError;
pub use export::xlsx::{to_spreadsheet_bytes, SHEET_NAME, XLSX_FILE_NAME, XLSX_MIME};

pub use observations::error::ObservationError;
pub use observations::loader::{ObservationLoader, SOURCE_URL};
pub use observations::normalizer::{normalize, DATE_FORMAT};
pub use observations::table_cache::TableCache;

pub use types::date_range::{DateRange, DEFAULT_END, DEFAULT_START};
pub use types::observation::{Observation, DATE_COLUMN, NUMERIC_COLUMNS};
