use chrono::NaiveDate;
use serde::Serialize;

/// Name of the date column in the published SIMEPAR sheet.
pub const DATE_COLUMN: &str = "Data";

/// The seven numeric columns of the sheet, in table order.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "Tmax (°C)",
    "Tmed (°C)",
    "Tmin (°C)",
    "Chuva (mm)",
    "UR (%)",
    "Vel. Vento (m/s)",
    "Radiação solar (MJ/m²d)",
];

/// One day's recorded weather measurements for Santa Helena/PR.
///
/// `None` marks a cell that held no parseable number in the source sheet.
/// It is distinct from zero: aggregation decides explicitly how to treat it.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,          // Tmax (°C)
    pub temp_mean: Option<f64>,         // Tmed (°C)
    pub temp_min: Option<f64>,          // Tmin (°C)
    pub rain: Option<f64>,              // Chuva (mm)
    pub relative_humidity: Option<f64>, // UR (%)
    pub wind_speed: Option<f64>,        // Vel. Vento (m/s)
    pub solar_radiation: Option<f64>,   // Radiação solar (MJ/m²d)
}
