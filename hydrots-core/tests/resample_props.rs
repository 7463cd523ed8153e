use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use hydrots_core::{
    Frequency, Point, SampleDownPolicy, SampleUpPolicy, Series, downsample, is_regular, upsample,
};
use proptest::prelude::*;

const HOUR: i64 = 3600;

fn ts(s: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(s, 0).unwrap()
}

// Hour-aligned, strictly increasing timestamps with integer values, so sums are exact.
fn arb_series() -> impl Strategy<Value = Series> {
    (
        -200_000i64..200_000i64,
        proptest::collection::btree_set(0i64..2_000, 1..120),
        proptest::collection::vec(-1_000i32..1_000, 120),
    )
        .prop_map(|(base_hours, offsets, values): (i64, BTreeSet<i64>, Vec<i32>)| {
            let points = offsets
                .into_iter()
                .zip(values)
                .map(|(k, v)| Point::new(ts((base_hours + k) * HOUR), Some(f64::from(v))))
                .collect();
            Series::from_points(points).unwrap()
        })
}

fn arb_target() -> impl Strategy<Value = Frequency> {
    prop::sample::select(vec![2i64, 6, 24, 72, 168]).prop_map(|h| Frequency::hours(h).unwrap())
}

proptest! {
    #[test]
    fn downsample_sum_conserves_total(series in arb_series(), target in arb_target()) {
        let mut cautions = Vec::new();
        let out = downsample(&series, target, Frequency::hours(1).ok(), Some(&SampleDownPolicy::Sum), &mut cautions);
        let total_in: f64 = series.values().into_iter().flatten().sum();
        let total_out: f64 = out.values().into_iter().flatten().sum();
        prop_assert_eq!(total_in, total_out);
        prop_assert!(cautions.is_empty());
    }

    #[test]
    fn downsample_output_is_on_target_grid(
        series in arb_series(),
        target in arb_target(),
        policy in prop::sample::select(vec!["sum", "mean", "min", "max"]),
    ) {
        let mut cautions = Vec::new();
        let policy = SampleDownPolicy::from(policy);
        let out = downsample(&series, target, Frequency::hours(1).ok(), Some(&policy), &mut cautions);
        prop_assert!(!out.is_empty());
        prop_assert!(is_regular(&out, target));
        // Every label is a whole number of target steps from a UTC midnight.
        let anchor = series.first_ts().unwrap().timestamp().div_euclid(86_400) * 86_400;
        for t in out.timestamps() {
            prop_assert_eq!((t.timestamp() - anchor).rem_euclid(target.seconds()), 0);
        }
    }

    #[test]
    fn each_observation_lands_in_the_bucket_closing_at_or_after_it(
        series in arb_series(),
        target in arb_target(),
    ) {
        let mut cautions = Vec::new();
        let out = downsample(&series, target, Frequency::hours(1).ok(), Some(&SampleDownPolicy::Max), &mut cautions);
        for p in series.points() {
            let label = out
                .timestamps()
                .into_iter()
                .find(|l| *l >= p.ts)
                .unwrap();
            prop_assert!(label - p.ts < target.as_delta());
            let bucket_max = out.get(label).flatten().unwrap();
            prop_assert!(bucket_max >= p.value.unwrap());
        }
    }

    #[test]
    fn upsample_is_regular_and_keeps_on_grid_values(
        series in arb_series(),
        policy in prop::sample::select(vec!["bfill", "ffill", "mean", "interpolate"]),
    ) {
        let mut cautions = Vec::new();
        let target = Frequency::minutes(30).unwrap();
        let policy = SampleUpPolicy::from(policy);
        let out = upsample(&series, target, Some(&policy), &mut cautions);
        prop_assert!(is_regular(&out, target));
        prop_assert_eq!(out.first_ts(), series.first_ts());
        prop_assert_eq!(out.last_ts(), series.last_ts());
        for p in series.points() {
            prop_assert_eq!(out.get(p.ts), Some(p.value));
        }
        prop_assert_eq!(out.gap_count(), 0);
    }

    #[test]
    fn resampling_is_deterministic(series in arb_series(), target in arb_target()) {
        let mut cautions = Vec::new();
        let a = downsample(&series, target, None, Some(&SampleDownPolicy::Mean), &mut cautions);
        let b = downsample(&series, target, None, Some(&SampleDownPolicy::Mean), &mut cautions);
        prop_assert_eq!(a, b);
    }
}

#[test]
fn twelve_hourly_sum_to_daily_closes_on_the_right() {
    let s = Series::from_points(vec![
        Point::new(ts(0), Some(1.0)),
        Point::new(ts(12 * HOUR), Some(2.0)),
        Point::new(ts(24 * HOUR), Some(4.0)),
        Point::new(ts(24 * HOUR + 1), Some(8.0)),
    ])
    .unwrap();
    let mut cautions = Vec::new();
    let out = downsample(&s, Frequency::DAILY, None, Some(&SampleDownPolicy::Sum), &mut cautions);
    assert_eq!(out.get(ts(24 * HOUR)), Some(Some(6.0)));
    assert_eq!(out.get(ts(48 * HOUR)), Some(Some(8.0)));
}
