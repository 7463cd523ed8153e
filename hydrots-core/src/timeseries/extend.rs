//! Window extension to a requested `tmin` / `tmax`.
//!
//! Requested bounds rarely share the series phase (a daily series at 00:00
//! asked to start at 12:00). Bounds are moved back onto the series grid
//! first, so every generated point lies on the same grid as the existing
//! ones.

use chrono::{DateTime, Utc};

use crate::series::{Point, Series};
use crate::timeseries::grid::{align_floor, grid, grid_point};
use crate::timeseries::util::raise;
use crate::{Caution, FillEdgePolicy, Frequency, PipelineStep};

fn edge_value(
    series: &Series,
    policy: Option<&FillEdgePolicy>,
    step: PipelineStep,
    cautions: &mut Vec<Caution>,
) -> Option<f64> {
    match policy {
        Some(FillEdgePolicy::Mean) => series.mean(),
        Some(FillEdgePolicy::Constant(v)) => Some(*v),
        Some(other @ FillEdgePolicy::Unsupported(_)) => {
            raise(cautions, Caution::unsupported(step, other));
            None
        }
        None => {
            raise(cautions, Caution::missing_policy(step));
            None
        }
    }
}

/// Extend the series backward so it starts at or before `tmin`.
///
/// `tmin` is moved back to the last grid point at or before it, with the
/// grid phase taken from the series' first timestamp. New positions run from
/// there up to (not including) the current start and are filled per
/// `policy`; existing values are left alone. A `tmin` at or after the
/// current start is a no-op.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hydrots_core::{FillEdgePolicy, Frequency, Point, Series, extend_before};
///
/// let day = |d| Utc.with_ymd_and_hms(1990, 1, d, 0, 0, 0).unwrap();
/// let s = Series::from_points(vec![
///     Point::new(day(3), Some(2.0)),
///     Point::new(day(4), Some(4.0)),
/// ]).unwrap();
/// let tmin = Utc.with_ymd_and_hms(1990, 1, 1, 12, 0, 0).unwrap();
/// let mut cautions = Vec::new();
/// let out = extend_before(&s, tmin, Some(Frequency::DAILY), Some(&FillEdgePolicy::Mean), &mut cautions);
/// assert_eq!(out.timestamps(), vec![day(1), day(2), day(3), day(4)]);
/// assert_eq!(out.values(), vec![Some(3.0), Some(3.0), Some(2.0), Some(4.0)]);
/// ```
#[must_use]
pub fn extend_before(
    series: &Series,
    tmin: DateTime<Utc>,
    freq: Option<Frequency>,
    policy: Option<&FillEdgePolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    let Some(first) = series.first_ts() else {
        return series.clone();
    };
    if tmin >= first {
        return series.clone();
    }
    let Some(freq) = freq else {
        raise(
            cautions,
            Caution::MissingFrequency {
                step: PipelineStep::FillBefore,
            },
        );
        return series.clone();
    };
    let (Some(start), Some(end)) = (
        align_floor(tmin, first, freq),
        grid_point(first, freq, -1),
    ) else {
        return series.clone();
    };

    let value = edge_value(series, policy, PipelineStep::FillBefore, cautions);
    let new = grid(start, end, freq);
    #[cfg(feature = "tracing")]
    tracing::debug!(%tmin, %start, added = new.len(), "extending series backward");
    let mut points: Vec<Point> = new.into_iter().map(|ts| Point { ts, value }).collect();
    points.extend_from_slice(series.points());
    Series::from_sorted(points)
}

/// Extend the series forward towards `tmax`.
///
/// `tmax` is an inclusive bound: it is moved back to the last grid point at
/// or before it, and the positions after the current end up to that point
/// are filled per `policy`. Nothing is added when no grid point fits
/// between the current end and `tmax`.
#[must_use]
pub fn extend_after(
    series: &Series,
    tmax: DateTime<Utc>,
    freq: Option<Frequency>,
    policy: Option<&FillEdgePolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    let Some(last) = series.last_ts() else {
        return series.clone();
    };
    if tmax <= last {
        return series.clone();
    }
    let Some(freq) = freq else {
        raise(
            cautions,
            Caution::MissingFrequency {
                step: PipelineStep::FillAfter,
            },
        );
        return series.clone();
    };
    let (Some(start), Some(end)) = (grid_point(last, freq, 1), align_floor(tmax, last, freq))
    else {
        return series.clone();
    };
    if end <= last {
        return series.clone();
    }

    let value = edge_value(series, policy, PipelineStep::FillAfter, cautions);
    let new = grid(start, end, freq);
    #[cfg(feature = "tracing")]
    tracing::debug!(%tmax, %end, added = new.len(), "extending series forward");
    let mut points = series.points().to_vec();
    points.extend(new.into_iter().map(|ts| Point { ts, value }));
    Series::from_sorted(points)
}
