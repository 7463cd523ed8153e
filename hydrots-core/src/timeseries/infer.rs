use chrono::{DateTime, TimeDelta, Utc};

use crate::Frequency;

fn positive_deltas(timestamps: &[DateTime<Utc>]) -> Vec<TimeDelta> {
    let mut ts: Vec<DateTime<Utc>> = timestamps.to_vec();
    ts.sort();
    let mut deltas = Vec::with_capacity(ts.len().saturating_sub(1));
    for w in ts.windows(2) {
        let dt = w[1] - w[0];
        if dt > TimeDelta::zero() {
            deltas.push(dt);
        }
    }
    deltas
}

/// Infer a constant sampling interval from timestamps.
///
/// Returns `Some` only when there are at least three distinct timestamps and
/// every gap between neighbours is the same whole number of seconds. Input
/// order does not matter; repeated timestamps are ignored.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::{Frequency, infer_frequency};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// assert_eq!(infer_frequency(&[t(0), t(3600), t(7200)]), Some(Frequency::hours(1).unwrap()));
/// assert_eq!(infer_frequency(&[t(0), t(3600), t(9000)]), None);
/// assert_eq!(infer_frequency(&[t(0), t(3600)]), None);
/// ```
#[must_use]
pub fn infer_frequency(timestamps: &[DateTime<Utc>]) -> Option<Frequency> {
    let deltas = positive_deltas(timestamps);
    if deltas.len() < 2 {
        return None;
    }
    let first = deltas[0];
    if deltas.iter().any(|&d| d != first) {
        return None;
    }
    Frequency::from_delta(first).ok()
}

/// Estimate a representative step (in seconds) from positive adjacent
/// timestamp deltas.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median. Used as the last-resort fallback for irregular
/// series when no frequency is configured at all.
///
/// Unique mode (60s):
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::estimate_step_seconds;
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// // Adjacent deltas: 60,60,60,120,180  => unique mode is 60
/// let ts = vec![t(0), t(60), t(120), t(180), t(300), t(480)];
/// assert_eq!(estimate_step_seconds(&ts), Some(60));
/// ```
///
/// No unique mode: fall back to lower median (60s):
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::estimate_step_seconds;
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// // Adjacent deltas: 60,60,120,120  => lower median is 60
/// let ts = vec![t(0), t(60), t(120), t(240), t(360)];
/// assert_eq!(estimate_step_seconds(&ts), Some(60));
/// ```
///
/// Returns `None` if fewer than two distinct timestamps are present.
#[must_use]
pub fn estimate_step_seconds(timestamps: &[DateTime<Utc>]) -> Option<i64> {
    let mut deltas: Vec<i64> = positive_deltas(timestamps)
        .into_iter()
        .map(|d| d.num_seconds())
        .filter(|&d| d > 0)
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta: i64 = deltas[0];
    let mut best_count: usize = 0;
    let mut num_best_candidates: usize = 0;

    let mut cur_delta: i64 = deltas[0];
    let mut cur_count: usize = 1;
    for &d in deltas.iter().skip(1) {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        if cur_count > best_count {
            best_count = cur_count;
            best_delta = cur_delta;
            num_best_candidates = 1;
        } else if cur_count == best_count {
            num_best_candidates = num_best_candidates.saturating_add(1);
        }
        cur_delta = d;
        cur_count = 1;
    }
    if cur_count > best_count {
        best_delta = cur_delta;
        num_best_candidates = 1;
    } else if cur_count == best_count {
        num_best_candidates = num_best_candidates.saturating_add(1);
    }

    if num_best_candidates == 1 {
        return Some(best_delta);
    }

    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

/// [`estimate_step_seconds`] as a [`Frequency`].
#[must_use]
pub fn estimate_frequency(timestamps: &[DateTime<Utc>]) -> Option<Frequency> {
    estimate_step_seconds(timestamps).and_then(|s| Frequency::from_seconds(s).ok())
}
