use chrono::{DateTime, Utc};
use hydrots::{
    ExportRecord, FillEdgePolicy, FillNanPolicy, Frequency, RawSeries, SampleDownPolicy,
    SampleUpPolicy, Series, SeriesSettings, TimeSeries,
};
use proptest::prelude::*;

const HOUR: i64 = 3600;

fn ts(s: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(s, 0).unwrap()
}

// Hour-aligned observations on a 1h, 6h or daily step; some rows missing
// entirely, some present as gaps.
fn arb_raw() -> impl Strategy<Value = RawSeries> {
    (
        -2_000i64..2_000i64,
        prop::sample::select(vec![1i64, 6, 24]),
        proptest::collection::vec(
            (any::<bool>(), prop::option::weighted(0.85, -500i32..500)),
            1..150,
        ),
        any::<bool>(),
    )
        .prop_map(|(base, step, rows, shuffle)| {
            let mut pairs: Vec<(DateTime<Utc>, Option<f64>)> = rows
                .into_iter()
                .enumerate()
                .filter(|(i, (keep, _))| *keep || i % 4 != 0)
                .map(|(i, (_, v))| {
                    let k = i64::try_from(i).unwrap();
                    (ts((base + k * step) * HOUR), v.map(f64::from))
                })
                .collect();
            if shuffle {
                pairs.reverse();
            }
            // Guarantee at least one observation.
            pairs.push((ts(base * HOUR), Some(1.0)));
            RawSeries::from_pairs(pairs)
        })
}

fn arb_settings() -> impl Strategy<Value = SeriesSettings> {
    (
        prop::sample::select(vec![1800i64, 3600, 3 * 3600, 86_400, 7 * 86_400]),
        prop::sample::select(vec![
            SampleUpPolicy::BackFill,
            SampleUpPolicy::ForwardFill,
            SampleUpPolicy::Mean,
            SampleUpPolicy::Interpolate,
            SampleUpPolicy::Constant(2.5),
        ]),
        prop::sample::select(vec![
            SampleDownPolicy::Sum,
            SampleDownPolicy::Mean,
            SampleDownPolicy::Min,
            SampleDownPolicy::Max,
        ]),
        prop::sample::select(vec![
            FillNanPolicy::Interpolate,
            FillNanPolicy::Mean,
            FillNanPolicy::Constant(0.0),
        ]),
        any::<bool>(),
    )
        .prop_map(|(freq, up, down, nan, extend)| SeriesSettings {
            frequency: Some(Frequency::from_seconds(freq).unwrap()),
            sample_up_policy: Some(up),
            sample_down_policy: Some(down),
            fill_nan_policy: Some(nan),
            fill_before_policy: Some(FillEdgePolicy::Mean),
            fill_after_policy: Some(FillEdgePolicy::Constant(0.0)),
            // Off-phase bounds on purpose.
            tmin: extend.then(|| ts(-3_000 * HOUR + 1234)),
            tmax: extend.then(|| ts(8_000 * HOUR + 77)),
            ..SeriesSettings::default()
        })
}

fn bits(series: &Series) -> Vec<(i64, Option<u64>)> {
    series
        .points()
        .iter()
        .map(|p| (p.ts.timestamp(), p.value.map(f64::to_bits)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn derived_series_sits_on_the_target_grid(raw in arb_raw(), settings in arb_settings()) {
        let freq = settings.frequency.unwrap();
        let ts = TimeSeries::builder(raw).settings(settings).build().unwrap();
        let out = ts.series();
        prop_assert!(!out.is_empty());
        prop_assert!(
            out.points().windows(2).all(|w| w[1].ts - w[0].ts == freq.as_delta()),
            "spacing differs from {freq}"
        );
    }

    #[test]
    fn pipeline_is_deterministic(raw in arb_raw(), settings in arb_settings()) {
        let a = TimeSeries::builder(raw.clone()).settings(settings.clone()).build().unwrap();
        let b = TimeSeries::builder(raw).settings(settings.clone()).build().unwrap();
        prop_assert_eq!(bits(a.series()), bits(b.series()));

        let mut c = a.clone();
        c.replace_settings(a.settings().clone()).unwrap();
        prop_assert_eq!(bits(a.series()), bits(c.series()));
    }

    #[test]
    fn export_reconstructs_the_same_series(raw in arb_raw(), settings in arb_settings()) {
        let ts = TimeSeries::builder(raw).settings(settings).name("p").build().unwrap();
        let json = ts.export().to_json().unwrap();
        let back = TimeSeries::reconstruct(ExportRecord::from_json(&json).unwrap()).unwrap();
        prop_assert_eq!(bits(back.series()), bits(ts.series()));
        prop_assert_eq!(back.settings(), ts.settings());
        prop_assert_eq!(back.raw(), ts.raw());
    }
}
