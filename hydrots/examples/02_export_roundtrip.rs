use chrono::{TimeZone, Utc};
use hydrots::{ExportRecord, RawSeries, SeriesKind, TimeSeries};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let t = |d| Utc.with_ymd_and_hms(1998, 1, d, 0, 0, 0).unwrap();
    let raw = RawSeries::from_pairs((1..=20).map(|d| (t(d), Some(f64::from(d % 4) * 0.7))));
    let ts = TimeSeries::builder(raw)
        .name("evap-deelen")
        .kind(SeriesKind::Evaporation)
        .settings_json(json!({"normalize_policy": "mean", "tmax": "1998-02-01T00:00:00Z"}))
        .build()?;

    let json = ts.export().to_json()?;
    println!("{json}");

    let back = TimeSeries::reconstruct(ExportRecord::from_json(&json)?)?;
    assert_eq!(back.series(), ts.series());
    println!("reconstructed {} identical points", back.series().len());
    Ok(())
}
