use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polars::prelude::*;
use santa_helena_weather::{
    cumulative_column, normalize, DashboardSnapshot, DateRange, ObservationFrame, DATE_COLUMN,
    NUMERIC_COLUMNS,
};

fn synthetic_table(days: usize) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let dates: Vec<String> = (0..days)
        .map(|offset| {
            (start + chrono::Duration::days(offset as i64))
                .format("%d/%m/%Y")
                .to_string()
        })
        .collect();
    let values: Vec<String> = (0..days).map(|i| format!("{},{}", i % 40, i % 10)).collect();

    let mut columns = vec![Column::new(
        DATE_COLUMN.into(),
        dates.iter().map(String::as_str).collect::<Vec<_>>(),
    )];
    for name in NUMERIC_COLUMNS {
        columns.push(Column::new(
            name.into(),
            values.iter().map(String::as_str).collect::<Vec<_>>(),
        ));
    }
    normalize(DataFrame::new(columns).unwrap()).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let table = synthetic_table(2 * 365);
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
    )
    .unwrap();

    c.bench_function("filter_range", |b| {
        b.iter(|| {
            ObservationFrame::from_dataframe(black_box(table.clone()))
                .filter_range(&range)
                .collect()
                .unwrap()
        })
    });

    let view = ObservationFrame::from_dataframe(table.clone())
        .filter_range(&range)
        .collect()
        .unwrap();
    c.bench_function("cumulative_rain", |b| {
        b.iter(|| cumulative_column(black_box(&view), "Chuva (mm)").unwrap())
    });

    c.bench_function("snapshot", |b| {
        b.iter(|| DashboardSnapshot::compute(black_box(&table), &range).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
