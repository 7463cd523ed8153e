//! Gap-filling primitives and the constant-frequency `fill_nan` step.

use crate::series::{Point, Series};
use crate::timeseries::grid::asfreq;
use crate::timeseries::util::raise;
use crate::{Caution, FillNanPolicy, Frequency, PipelineStep};

fn map_gaps(series: &Series, mut fill: impl FnMut(usize, &Point) -> Option<f64>) -> Series {
    let points = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| match p.value {
            Some(_) => *p,
            None => Point {
                ts: p.ts,
                value: fill(i, p),
            },
        })
        .collect();
    Series::from_sorted(points)
}

/// Replace every gap with `value`.
#[must_use]
pub fn fill_constant(series: &Series, value: f64) -> Series {
    map_gaps(series, |_, _| Some(value))
}

/// Replace every gap with the mean of the observed values.
///
/// A series without any observation is returned unchanged.
#[must_use]
pub fn fill_mean(series: &Series) -> Series {
    match series.mean() {
        Some(mean) => fill_constant(series, mean),
        None => series.clone(),
    }
}

/// Carry the previous observation forward into each gap.
#[must_use]
pub fn forward_fill(series: &Series) -> Series {
    let mut last = None;
    let points = series
        .points()
        .iter()
        .map(|p| {
            if p.value.is_some() {
                last = p.value;
                *p
            } else {
                Point { ts: p.ts, value: last }
            }
        })
        .collect();
    Series::from_sorted(points)
}

/// Carry the next observation backward into each gap.
#[must_use]
pub fn back_fill(series: &Series) -> Series {
    let mut next = None;
    let mut points: Vec<Point> = series
        .points()
        .iter()
        .rev()
        .map(|p| {
            if p.value.is_some() {
                next = p.value;
                *p
            } else {
                Point { ts: p.ts, value: next }
            }
        })
        .collect();
    points.reverse();
    Series::from_sorted(points)
}

/// Linear interpolation in time between the observations around each gap.
///
/// Gaps before the first or after the last observation are left as gaps.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::{Point, Series, interpolate_time};
///
/// let t = |d: i64| DateTime::<Utc>::from_timestamp(d * 86_400, 0).unwrap();
/// let s = Series::from_points(vec![
///     Point::new(t(0), Some(1.0)),
///     Point::gap(t(1)),
///     Point::gap(t(3)),
///     Point::new(t(4), Some(9.0)),
/// ]).unwrap();
/// assert_eq!(interpolate_time(&s).values(), vec![Some(1.0), Some(3.0), Some(7.0), Some(9.0)]);
/// ```
#[must_use]
pub fn interpolate_time(series: &Series) -> Series {
    let points = series.points();
    // Index of the nearest observation at or before each position.
    let mut prev: Vec<Option<usize>> = Vec::with_capacity(points.len());
    let mut last = None;
    for (i, p) in points.iter().enumerate() {
        if p.value.is_some() {
            last = Some(i);
        }
        prev.push(last);
    }
    let mut next: Vec<Option<usize>> = vec![None; points.len()];
    let mut upcoming = None;
    for (i, p) in points.iter().enumerate().rev() {
        if p.value.is_some() {
            upcoming = Some(i);
        }
        next[i] = upcoming;
    }

    map_gaps(series, |i, p| {
        let (a, b) = (prev[i]?, next[i]?);
        let (left, right) = (&points[a], &points[b]);
        let (v0, v1) = (left.value?, right.value?);
        let span = (right.ts - left.ts).num_milliseconds();
        if span == 0 {
            return Some(v0);
        }
        #[allow(clippy::cast_precision_loss)]
        let frac = (p.ts - left.ts).num_milliseconds() as f64 / span as f64;
        Some((v1 - v0).mul_add(frac, v0))
    })
}

/// Remove gap rows.
#[must_use]
pub fn drop_gaps(series: &Series) -> Series {
    Series::from_sorted(
        series
            .points()
            .iter()
            .filter(|p| !p.is_gap())
            .copied()
            .collect(),
    )
}

/// Fill internal gaps of a series that should sit on a constant grid.
///
/// With a known `freq` the series is first conformed to that grid (so missing
/// rows become gaps too) and the gaps are then handled by `policy`. Without a
/// frequency there is no grid to interpolate on and gaps are simply dropped.
/// A missing or unsupported policy leaves the gaps in place and raises a
/// caution; a series without gaps is passed through silently.
#[must_use]
pub fn fill_nan(
    series: &Series,
    freq: Option<Frequency>,
    policy: Option<&FillNanPolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    let Some(freq) = freq else {
        return drop_gaps(series);
    };
    let conformed = asfreq(series, freq);
    let gaps = conformed.gap_count();
    if gaps == 0 {
        return conformed;
    }
    let filled = match policy {
        Some(FillNanPolicy::Drop) => drop_gaps(&conformed),
        Some(FillNanPolicy::Mean) => fill_mean(&conformed),
        Some(FillNanPolicy::Interpolate) => interpolate_time(&conformed),
        Some(FillNanPolicy::Constant(v)) => fill_constant(&conformed, *v),
        Some(other @ FillNanPolicy::Unsupported(_)) => {
            raise(cautions, Caution::unsupported(PipelineStep::FillNan, other));
            conformed
        }
        None => {
            raise(cautions, Caution::missing_policy(PipelineStep::FillNan));
            conformed
        }
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(gaps, remaining = filled.gap_count(), %freq, "filled internal gaps");
    filled
}
