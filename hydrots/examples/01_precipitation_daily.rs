use chrono::{TimeZone, Utc};
use hydrots::{Frequency, RawSeries, SeriesKind, TimeSeries};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Hourly rain gauge totals, read as strings the way a file reader would.
    let rows: Vec<(String, Option<f64>)> = (0..72)
        .map(|h| {
            let ts = Utc.with_ymd_and_hms(2021, 7, 13, 0, 0, 0).unwrap()
                + chrono::TimeDelta::hours(h);
            let mm = if (20..40).contains(&h) { Some(1.5) } else { Some(0.0) };
            (ts.format("%Y-%m-%d %H:%M:%S").to_string(), mm)
        })
        .collect();
    let raw = RawSeries::parse(rows)?;

    let mut ts = TimeSeries::builder(raw)
        .name("gauge-6260")
        .kind(SeriesKind::Precipitation)
        .tmin(Utc.with_ymd_and_hms(2021, 7, 10, 9, 30, 0).unwrap())
        .build()?;

    println!("inferred frequency: {:?}", ts.inferred_frequency().map(|f| f.to_string()));
    for p in ts.series().points() {
        println!("{}  {:>6.2}", p.ts.format("%Y-%m-%d %H:%M"), p.value.unwrap_or(f64::NAN));
    }

    // Switch to 6-hourly sums; the derived series is rebuilt from the raw data.
    ts.update(|s| {
        s.frequency = Some(Frequency::hours(6)?);
        s.tmin = None;
        Ok(())
    })?;
    println!("6-hourly points: {}", ts.series().len());
    Ok(())
}
