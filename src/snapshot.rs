use crate::aggregate::cumulative;
use crate::error::DashboardError;
use crate::frame::ObservationFrame;
use crate::types::date_range::DateRange;
use crate::types::observation::Observation;
use chrono::NaiveDate;
use polars::frame::DataFrame;
use serde::Serialize;

/// Number of rows shown in the dashboard's table preview.
pub const PREVIEW_ROWS: usize = 5;

/// Air temperature panel: three series over the same dates.
#[derive(Debug, Clone, Serialize)]
pub struct TemperaturePanel {
    pub dates: Vec<NaiveDate>,
    pub max: Vec<Option<f64>>,
    pub mean: Vec<Option<f64>>,
    pub min: Vec<Option<f64>>,
}

/// Panel with a daily series and its running total on a secondary axis
/// (rain and solar radiation in the original dashboard).
#[derive(Debug, Clone, Serialize)]
pub struct OverlayPanel {
    pub dates: Vec<NaiveDate>,
    pub daily: Vec<Option<f64>>,
    pub cumulative: Vec<f64>,
}

/// Relative humidity and wind speed on a shared date axis.
#[derive(Debug, Clone, Serialize)]
pub struct HumidityWindPanel {
    pub dates: Vec<NaiveDate>,
    pub humidity: Vec<Option<f64>>,
    pub wind_speed: Vec<Option<f64>>,
}

/// Everything one interaction cycle needs to render: preview rows and the
/// four chart panels, all derived from the immutable table and the selected
/// range. Pure data, so any presentation layer can consume it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub row_count: usize,
    pub preview: Vec<Observation>,
    pub temperature: TemperaturePanel,
    pub rain: OverlayPanel,
    pub humidity_wind: HumidityWindPanel,
    pub solar_radiation: OverlayPanel,
}

impl DashboardSnapshot {
    /// Recomputes the dashboard state for one interaction. The range is
    /// assumed valid ([`DateRange`] enforces `start <= end` on construction).
    pub fn compute(table: &DataFrame, range: &DateRange) -> Result<Self, DashboardError> {
        let view = ObservationFrame::from_dataframe(table.clone()).filter_range(range);
        let rows = view.collect_observations()?;

        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let rain: Vec<Option<f64>> = rows.iter().map(|r| r.rain).collect();
        let radiation: Vec<Option<f64>> = rows.iter().map(|r| r.solar_radiation).collect();
        let rain_cumulative = cumulative(&rain);
        let radiation_cumulative = cumulative(&radiation);

        Ok(Self {
            range: *range,
            row_count: rows.len(),
            preview: rows.iter().take(PREVIEW_ROWS).cloned().collect(),
            temperature: TemperaturePanel {
                dates: dates.clone(),
                max: rows.iter().map(|r| r.temp_max).collect(),
                mean: rows.iter().map(|r| r.temp_mean).collect(),
                min: rows.iter().map(|r| r.temp_min).collect(),
            },
            rain: OverlayPanel {
                dates: dates.clone(),
                daily: rain,
                cumulative: rain_cumulative,
            },
            humidity_wind: HumidityWindPanel {
                dates: dates.clone(),
                humidity: rows.iter().map(|r| r.relative_humidity).collect(),
                wind_speed: rows.iter().map(|r| r.wind_speed).collect(),
            },
            solar_radiation: OverlayPanel {
                dates,
                daily: radiation,
                cumulative: radiation_cumulative,
            },
        })
    }
}
