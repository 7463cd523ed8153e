//! Frequency and phase arithmetic.
//!
//! A grid is the set `anchor + k * step` for integer `k`. Every helper here
//! works on whole seconds and keeps the anchor's sub-second part, so points
//! generated from the same anchor always share its phase.

use chrono::{DateTime, Utc};

use crate::Frequency;
use crate::series::{Point, Series};

const DAY: i64 = 86_400;

/// The `k`-th grid point counted from `anchor` (negative `k` goes back in time).
///
/// Returns `None` if the result falls outside the representable range.
#[must_use]
pub fn grid_point(anchor: DateTime<Utc>, freq: Frequency, k: i64) -> Option<DateTime<Utc>> {
    let secs = anchor
        .timestamp()
        .checked_add(k.checked_mul(freq.seconds())?)?;
    DateTime::from_timestamp(secs, anchor.timestamp_subsec_nanos())
}

/// The last grid point at or before `t`.
#[must_use]
pub fn align_floor(
    t: DateTime<Utc>,
    anchor: DateTime<Utc>,
    freq: Frequency,
) -> Option<DateTime<Utc>> {
    let k = (t.timestamp() - anchor.timestamp()).div_euclid(freq.seconds());
    let candidate = grid_point(anchor, freq, k)?;
    if candidate > t {
        grid_point(anchor, freq, k - 1)
    } else {
        Some(candidate)
    }
}

/// The first grid point at or after `t`.
#[must_use]
pub fn align_ceil(
    t: DateTime<Utc>,
    anchor: DateTime<Utc>,
    freq: Frequency,
) -> Option<DateTime<Utc>> {
    let floor = align_floor(t, anchor, freq)?;
    if floor < t {
        grid_point(floor, freq, 1)
    } else {
        Some(floor)
    }
}

/// Distance from `t` back to the grid, always in `[0, step)`.
#[must_use]
pub fn phase_offset(
    t: DateTime<Utc>,
    anchor: DateTime<Utc>,
    freq: Frequency,
) -> Option<chrono::TimeDelta> {
    align_floor(t, anchor, freq).map(|floor| t - floor)
}

/// UTC midnight of the day containing `t`.
#[must_use]
pub fn start_of_day(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let day = t.timestamp().div_euclid(DAY);
    DateTime::from_timestamp(day * DAY, 0)
}

/// Grid points from `start` up to and including `end`, anchored at `start`.
#[must_use]
pub fn grid(start: DateTime<Utc>, end: DateTime<Utc>, freq: Frequency) -> Vec<DateTime<Utc>> {
    if end < start {
        return Vec::new();
    }
    let span = (end.timestamp() - start.timestamp()) / freq.seconds();
    let mut out = Vec::with_capacity(usize::try_from(span).unwrap_or(0).saturating_add(1));
    let mut k = 0;
    while let Some(t) = grid_point(start, freq, k) {
        if t > end {
            break;
        }
        out.push(t);
        k += 1;
    }
    out
}

/// Put `series` onto `index`: timestamps present in both keep their value,
/// new timestamps become gaps and timestamps missing from `index` are dropped.
///
/// `index` must be strictly increasing.
#[must_use]
pub fn reindex(series: &Series, index: &[DateTime<Utc>]) -> Series {
    let src = series.points();
    let mut j = 0;
    let mut out = Vec::with_capacity(index.len());
    for &ts in index {
        while j < src.len() && src[j].ts < ts {
            j += 1;
        }
        let value = src.get(j).filter(|p| p.ts == ts).and_then(|p| p.value);
        out.push(Point { ts, value });
    }
    Series::from_sorted(out)
}

/// Conform the series to a regular grid at `freq` anchored at its first
/// timestamp, spanning first to last. Observations off the grid are dropped.
#[must_use]
pub fn asfreq(series: &Series, freq: Frequency) -> Series {
    match (series.first_ts(), series.last_ts()) {
        (Some(first), Some(last)) => reindex(series, &grid(first, last, freq)),
        _ => series.clone(),
    }
}

/// Returns true if consecutive timestamps are exactly `freq` apart.
#[must_use]
pub fn is_regular(series: &Series, freq: Frequency) -> bool {
    series
        .points()
        .windows(2)
        .all(|w| w[1].ts - w[0].ts == freq.as_delta())
}
