use crate::series::{Point, Series};

/// Sort points chronologically and merge repeated timestamps.
///
/// - The sort is stable, so equal timestamps keep their input order.
/// - A repeated timestamp becomes one point holding the arithmetic mean of
///   its non-gap values; if all of them are gaps the merged point is a gap.
///
/// Returns the ordered series and the number of points that were merged away.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use hydrots_core::{Point, collapse_duplicates};
///
/// let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
/// let (series, merged) = collapse_duplicates(vec![
///     Point::new(t(60), Some(3.0)),
///     Point::new(t(0), Some(1.0)),
///     Point::new(t(60), Some(5.0)),
///     Point::new(t(60), None),
/// ]);
/// assert_eq!(merged, 2);
/// assert_eq!(series.values(), vec![Some(1.0), Some(4.0)]);
/// ```
#[must_use]
pub fn collapse_duplicates(mut points: Vec<Point>) -> (Series, usize) {
    points.sort_by_key(|p| p.ts);
    let total = points.len();

    let mut out: Vec<Point> = Vec::with_capacity(total);
    let mut iter = points.into_iter().peekable();
    while let Some(first) = iter.next() {
        let mut sum = first.value.unwrap_or(0.0);
        let mut count = u32::from(first.value.is_some());
        while let Some(next) = iter.next_if(|p| p.ts == first.ts) {
            if let Some(v) = next.value {
                sum += v;
                count = count.saturating_add(1);
            }
        }
        let value = (count > 0).then(|| sum / f64::from(count));
        out.push(Point { ts: first.ts, value });
    }

    let merged = total - out.len();
    (Series::from_sorted(out), merged)
}
