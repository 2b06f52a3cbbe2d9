//! demos/dashboard.rs
//!
//! Fetches the Santa Helena/PR observation table, renders the temperature
//! panel with `plotlars` and writes the Excel download artifact to disk.
//!
//! To run this demo:
//! cargo run --example dashboard --features plotting

use std::error::Error;

use plotlars::{Line, Plot, Rgb, Text, TimeSeriesPlot};
use santa_helena_weather::{Dashboard, DateRange, XLSX_FILE_NAME};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Fetching SIMEPAR observation data...");

    let dashboard = Dashboard::new();
    let range = DateRange::default();

    let snapshot = dashboard
        .snapshot()
        .start(range.start())
        .end(range.end())
        .call()
        .await?;
    println!(
        "Selected interval: {} ({} observations)",
        snapshot.range, snapshot.row_count
    );
    for row in &snapshot.preview {
        println!("{row:?}");
    }

    let view = dashboard
        .observation_frame()
        .await?
        .filter_range(&range)
        .collect()?;

    println!("Generating temperature plot...");
    TimeSeriesPlot::builder()
        .data(&view)
        .x("Data")
        .y("Tmax (°C)")
        .additional_series(vec!["Tmed (°C)", "Tmin (°C)"])
        .colors(vec![Rgb(235, 64, 52), Rgb(52, 168, 83), Rgb(66, 133, 244)])
        .lines(vec![Line::Dash, Line::Dash, Line::Dash])
        .plot_title(Text::from("Temperatura do ar - Santa Helena/PR").size(18))
        .x_title("Data")
        .y_title("°C")
        .build()
        .plot();

    let bytes = dashboard
        .export_xlsx()
        .start(range.start())
        .end(range.end())
        .call()
        .await?;
    std::fs::write(XLSX_FILE_NAME, &bytes)?;
    println!("Wrote {} ({} bytes).", XLSX_FILE_NAME, bytes.len());

    Ok(())
}
