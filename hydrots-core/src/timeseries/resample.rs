//! Frequency-change resampling.
//!
//! The branch is chosen by comparing the requested frequency to the source
//! frequency of the raw series: a finer target upsamples, a coarser target
//! downsamples, an equal target only re-fills internal gaps.

use chrono::{DateTime, Utc};

use crate::series::{Point, Series};
use crate::timeseries::fill::{fill_constant, fill_mean, fill_nan, interpolate_time};
use crate::timeseries::grid::{align_ceil, asfreq, grid, start_of_day};
use crate::timeseries::util::{raise, trim_edges};
use crate::{Caution, Frequency, PipelineStep, SampleDownPolicy, SampleUpPolicy, SeriesSettings};

/// Which resampling branch a frequency change takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyChange {
    /// Target interval is shorter than the source interval.
    Up,
    /// Target interval is longer than the source interval.
    Down,
    /// Intervals are equal, or one of them is unknown.
    Unchanged,
}

impl FrequencyChange {
    /// Compare a target interval against the source interval.
    #[must_use]
    pub fn classify(target: Frequency, source: Option<Frequency>) -> Self {
        match source {
            Some(source) if target < source => Self::Up,
            Some(source) if target > source => Self::Down,
            _ => Self::Unchanged,
        }
    }
}

// Value of the source point at or before / at or after `ts`, gaps included.
fn carry(source: &[Point], ts: DateTime<Utc>, forward: bool) -> Option<f64> {
    if forward {
        let idx = source.partition_point(|p| p.ts <= ts);
        idx.checked_sub(1).and_then(|i| source[i].value)
    } else {
        let idx = source.partition_point(|p| p.ts < ts);
        source.get(idx).and_then(|p| p.value)
    }
}

/// Put the series on a finer grid anchored at its first timestamp and fill
/// the new positions per `policy`.
///
/// Carry policies look up the neighbouring raw observation, so values that
/// fall between the new grid points still propagate. A missing or
/// unsupported policy leaves the new positions as gaps and raises a caution.
#[must_use]
pub fn upsample(
    series: &Series,
    target: Frequency,
    policy: Option<&SampleUpPolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    let conformed = asfreq(series, target);
    match policy {
        Some(SampleUpPolicy::BackFill | SampleUpPolicy::ForwardFill) => {
            let forward = matches!(policy, Some(SampleUpPolicy::ForwardFill));
            let points = conformed
                .points()
                .iter()
                .map(|p| Point {
                    ts: p.ts,
                    value: carry(series.points(), p.ts, forward),
                })
                .collect();
            Series::from_sorted(points)
        }
        Some(SampleUpPolicy::Mean) => fill_mean(&conformed),
        Some(SampleUpPolicy::Interpolate) => interpolate_time(&conformed),
        Some(SampleUpPolicy::Constant(v)) => fill_constant(&conformed, *v),
        Some(other @ SampleUpPolicy::Unsupported(_)) => {
            raise(cautions, Caution::unsupported(PipelineStep::SampleUp, other));
            conformed
        }
        None => {
            raise(cautions, Caution::missing_policy(PipelineStep::SampleUp));
            conformed
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketAgg {
    sum: f64,
    count: u32,
    min: Option<f64>,
    max: Option<f64>,
}

impl BucketAgg {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count = self.count.saturating_add(1);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Aggregate the series into right-closed, right-labeled buckets of `target`.
///
/// Buckets are anchored at UTC midnight of the first observation's day. An
/// observation at `ts` belongs to the bucket labeled with the first edge at
/// or after `ts`, so a value exactly on an edge closes the bucket ending
/// there.
///
/// Empty buckets sum to `0.0` and are gaps for `mean`, `min` and `max`.
/// `drop` keeps only buckets holding at least `target / source`
/// observations, valued by their mean, and removes the others. A missing or
/// unsupported policy returns the series unchanged with a caution.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::{Frequency, Point, SampleDownPolicy, Series, downsample};
///
/// let h = |n: i64| DateTime::<Utc>::from_timestamp(n * 3600, 0).unwrap();
/// let s = Series::from_points(vec![
///     Point::new(h(0), Some(1.0)),
///     Point::new(h(12), Some(2.0)),
///     Point::new(h(24), Some(3.0)),
/// ]).unwrap();
/// let mut cautions = Vec::new();
/// let daily = downsample(&s, Frequency::DAILY, Frequency::hours(12).ok(),
///     Some(&SampleDownPolicy::Sum), &mut cautions);
/// assert_eq!(daily.timestamps(), vec![h(0), h(24)]);
/// assert_eq!(daily.values(), vec![Some(1.0), Some(5.0)]);
/// ```
#[must_use]
pub fn downsample(
    series: &Series,
    target: Frequency,
    source: Option<Frequency>,
    policy: Option<&SampleDownPolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    let policy = match policy {
        Some(other @ SampleDownPolicy::Unsupported(_)) => {
            raise(cautions, Caution::unsupported(PipelineStep::SampleDown, other));
            return series.clone();
        }
        None => {
            raise(cautions, Caution::missing_policy(PipelineStep::SampleDown));
            return series.clone();
        }
        Some(policy) => policy,
    };
    let Some(anchor) = series.first_ts().and_then(start_of_day) else {
        return series.clone();
    };

    let label = |ts| align_ceil(ts, anchor, target);
    let (Some(first), Some(last)) = (
        series.first_ts().and_then(label),
        series.last_ts().and_then(label),
    ) else {
        return series.clone();
    };
    let labels = grid(first, last, target);
    let mut buckets = vec![BucketAgg::default(); labels.len()];
    for p in series.points() {
        let (Some(value), Some(edge)) = (p.value, label(p.ts)) else {
            continue;
        };
        let offset = (edge - first).num_seconds() / target.seconds();
        if let Some(bucket) = usize::try_from(offset).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.push(value);
        }
    }

    let required = source
        .map_or(1, |s| target.seconds() / s.seconds())
        .max(1);
    let points = labels
        .into_iter()
        .zip(buckets)
        .filter_map(|(ts, agg)| {
            let value = match policy {
                SampleDownPolicy::Sum => Some(agg.sum),
                SampleDownPolicy::Mean => agg.mean(),
                SampleDownPolicy::Min => agg.min,
                SampleDownPolicy::Max => agg.max,
                SampleDownPolicy::Drop => {
                    if i64::from(agg.count) < required {
                        return None;
                    }
                    agg.mean()
                }
                SampleDownPolicy::Unsupported(_) => None,
            };
            Some(Point { ts, value })
        })
        .collect();
    Series::from_sorted(points)
}

/// Rewrite a validated series onto `settings.frequency`.
///
/// Without a target frequency the series passes through. Leading and
/// trailing gaps are trimmed afterwards in every branch.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "hydrots_core::change_frequency",
        skip_all,
        fields(
            target = ?settings.frequency,
            source = ?source,
            len = series.len(),
        ),
    )
)]
#[must_use]
pub fn change_frequency(
    series: &Series,
    source: Option<Frequency>,
    settings: &SeriesSettings,
    cautions: &mut Vec<Caution>,
) -> Series {
    let Some(target) = settings.frequency else {
        return trim_edges(series.clone());
    };
    let change = FrequencyChange::classify(target, source);
    #[cfg(feature = "tracing")]
    tracing::debug!(?change, "changing frequency");
    let out = match change {
        FrequencyChange::Up => upsample(
            series,
            target,
            settings.sample_up_policy.as_ref(),
            cautions,
        ),
        FrequencyChange::Down => downsample(
            series,
            target,
            source,
            settings.sample_down_policy.as_ref(),
            cautions,
        ),
        FrequencyChange::Unchanged => fill_nan(
            series,
            source,
            settings.fill_nan_policy.as_ref(),
            cautions,
        ),
    };
    trim_edges(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(n * 3600, 0).unwrap()
    }

    fn hourly(start: i64, values: &[f64]) -> Series {
        Series::from_points(
            values
                .iter()
                .zip(start..)
                .map(|(v, i)| Point::new(h(i), Some(*v)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn classify_by_interval_length() {
        let day = Frequency::DAILY;
        let hour = Frequency::hours(1).unwrap();
        assert_eq!(FrequencyChange::classify(hour, Some(day)), FrequencyChange::Up);
        assert_eq!(FrequencyChange::classify(day, Some(hour)), FrequencyChange::Down);
        assert_eq!(FrequencyChange::classify(day, Some(day)), FrequencyChange::Unchanged);
        assert_eq!(FrequencyChange::classify(day, None), FrequencyChange::Unchanged);
    }

    #[test]
    fn downsample_edges_close_the_bucket_ending_there() {
        // 23:00 belongs to day 1, 24:00 closes day 1, 25:00 opens day 2.
        let s = hourly(23, &[1.0, 2.0, 4.0]);
        let mut cautions = Vec::new();
        let out = downsample(
            &s,
            Frequency::DAILY,
            Frequency::hours(1).ok(),
            Some(&SampleDownPolicy::Sum),
            &mut cautions,
        );
        assert_eq!(out.timestamps(), vec![h(24), h(48)]);
        assert_eq!(out.values(), vec![Some(3.0), Some(4.0)]);
    }

    #[test]
    fn downsample_aggregations() {
        let s = hourly(1, &[4.0, 1.0, 7.0]);
        let mut cautions = Vec::new();
        let run = |p: SampleDownPolicy, c: &mut Vec<Caution>| {
            downsample(&s, Frequency::DAILY, Frequency::hours(1).ok(), Some(&p), c).values()
        };
        assert_eq!(run(SampleDownPolicy::Mean, &mut cautions), vec![Some(4.0)]);
        assert_eq!(run(SampleDownPolicy::Min, &mut cautions), vec![Some(1.0)]);
        assert_eq!(run(SampleDownPolicy::Max, &mut cautions), vec![Some(7.0)]);
        assert_eq!(run(SampleDownPolicy::Sum, &mut cautions), vec![Some(12.0)]);
        assert!(cautions.is_empty());
    }

    #[test]
    fn drop_keeps_only_complete_buckets() {
        // Day one (01:00..=24:00) is complete, day two has a single value.
        let values: Vec<f64> = (1..=25).map(f64::from).collect();
        let s = hourly(1, &values);
        let mut cautions = Vec::new();
        let out = downsample(
            &s,
            Frequency::DAILY,
            Frequency::hours(1).ok(),
            Some(&SampleDownPolicy::Drop),
            &mut cautions,
        );
        assert_eq!(out.timestamps(), vec![h(24)]);
        assert_eq!(out.values(), vec![Some(12.5)]);
    }

    #[test]
    fn empty_interior_bucket_sums_to_zero() {
        let s = Series::from_points(vec![
            Point::new(h(12), Some(2.0)),
            Point::new(h(60), Some(3.0)),
        ])
        .unwrap();
        let mut cautions = Vec::new();
        let out = downsample(&s, Frequency::DAILY, None, Some(&SampleDownPolicy::Sum), &mut cautions);
        assert_eq!(out.values(), vec![Some(2.0), Some(0.0), Some(3.0)]);
        let out = downsample(&s, Frequency::DAILY, None, Some(&SampleDownPolicy::Mean), &mut cautions);
        assert_eq!(out.values(), vec![Some(2.0), None, Some(3.0)]);
    }

    #[test]
    fn unsupported_down_policy_keeps_the_series() {
        let s = hourly(0, &[1.0, 2.0, 3.0]);
        let mut cautions = Vec::new();
        let policy = SampleDownPolicy::from("median");
        let out = downsample(&s, Frequency::DAILY, Frequency::hours(1).ok(), Some(&policy), &mut cautions);
        assert_eq!(out, s);
        assert_eq!(cautions.len(), 1);
    }

    #[test]
    fn upsample_carry_policies_use_raw_neighbours() {
        // Observations every 7 hours, target 3 hours: 07:00 and 14:00 are off-grid.
        let s = Series::from_points(vec![
            Point::new(h(0), Some(0.0)),
            Point::new(h(7), Some(7.0)),
            Point::new(h(14), Some(14.0)),
        ])
        .unwrap();
        let three = Frequency::hours(3).unwrap();
        let mut cautions = Vec::new();
        let bfill = upsample(&s, three, Some(&SampleUpPolicy::BackFill), &mut cautions);
        assert_eq!(bfill.timestamps(), vec![h(0), h(3), h(6), h(9), h(12)]);
        assert_eq!(
            bfill.values(),
            vec![Some(0.0), Some(7.0), Some(7.0), Some(14.0), Some(14.0)]
        );
        let ffill = upsample(&s, three, Some(&SampleUpPolicy::ForwardFill), &mut cautions);
        assert_eq!(
            ffill.values(),
            vec![Some(0.0), Some(0.0), Some(0.0), Some(7.0), Some(7.0)]
        );
        assert!(cautions.is_empty());
    }

    #[test]
    fn upsample_interpolates_and_keeps_originals() {
        let s = Series::from_points(vec![
            Point::new(h(0), Some(0.0)),
            Point::new(h(4), Some(8.0)),
        ])
        .unwrap();
        let two = Frequency::hours(2).unwrap();
        let mut cautions = Vec::new();
        let out = upsample(&s, two, Some(&SampleUpPolicy::Interpolate), &mut cautions);
        assert_eq!(out.values(), vec![Some(0.0), Some(4.0), Some(8.0)]);
    }

    #[test]
    fn upsample_without_policy_leaves_gaps() {
        let s = hourly(0, &[1.0, 2.0]);
        let half = Frequency::minutes(30).unwrap();
        let mut cautions = Vec::new();
        let out = upsample(&s, half, None, &mut cautions);
        assert_eq!(out.values(), vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(cautions, vec![Caution::missing_policy(PipelineStep::SampleUp)]);
    }

    #[test]
    fn change_frequency_without_target_passes_through() {
        let s = hourly(0, &[1.0, 2.0, 3.0]);
        let settings = SeriesSettings {
            frequency: None,
            ..SeriesSettings::default()
        };
        let mut cautions = Vec::new();
        let out = change_frequency(&s, Frequency::hours(1).ok(), &settings, &mut cautions);
        assert_eq!(out, s);
    }
}
