use chrono::{TimeZone, Utc};
use hydrots::{RawSeries, SeriesKind, TimeSeries};
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=debug,hydrots=trace,hydrots_core=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    // Irregular well readings with a duplicate and a gap.
    let t = |d, h| Utc.with_ymd_and_hms(2015, 3, d, h, 0, 0).unwrap();
    let raw = RawSeries::from_pairs([
        (t(1, 8), Some(12.31)),
        (t(2, 9), Some(12.28)),
        (t(2, 9), Some(12.30)),
        (t(4, 8), None),
        (t(5, 10), Some(12.19)),
        (t(9, 8), Some(12.02)),
    ]);

    let ts = TimeSeries::builder(raw)
        .name("B32C0123")
        .kind(SeriesKind::WaterLevel)
        .build()?;

    for caution in ts.cautions() {
        println!("caution: {caution}");
    }
    println!("{} derived points", ts.series().len());
    Ok(())
}
