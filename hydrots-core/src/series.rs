//! Observation points, raw input series and ordered series.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SeriesError;

/// A single observation. A `None` value is a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Observation timestamp (UTC).
    pub ts: DateTime<Utc>,
    /// Observed value; `None` marks a gap.
    pub value: Option<f64>,
}

impl Point {
    /// Build a point, turning a `NaN` value into a gap.
    #[must_use]
    pub fn new(ts: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            ts,
            value: value.filter(|v| !v.is_nan()),
        }
    }

    /// Build a gap at `ts`.
    #[must_use]
    pub const fn gap(ts: DateTime<Utc>) -> Self {
        Self { ts, value: None }
    }

    /// Returns true if the point carries no value.
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        self.value.is_none()
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Coerce a timestamp string to UTC.
///
/// Accepts RFC 3339 (any offset), naive date-times (read as UTC) and plain
/// dates (midnight UTC).
///
/// # Errors
/// Returns `SeriesError::Timestamp` if no supported format matches.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, SeriesError> {
    let s = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SeriesError::timestamp(text))
}

/// Raw observations exactly as delivered by a reader.
///
/// Points may be unsorted and may repeat timestamps; [`validate`] turns them
/// into an ordered [`Series`]. A `RawSeries` is never modified by the
/// pipeline.
///
/// [`validate`]: crate::timeseries::validate::validate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSeries {
    points: Vec<Point>,
}

impl RawSeries {
    /// Wrap a list of points. `NaN` values become gaps.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into_iter().map(|p| Point::new(p.ts, p.value)).collect(),
        }
    }

    /// Build from `(timestamp, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, Option<f64>)>,
    {
        Self::new(pairs.into_iter().map(|(ts, v)| Point::new(ts, v)).collect())
    }

    /// Build from naive timestamps, interpreted as UTC.
    pub fn from_naive<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, Option<f64>)>,
    {
        Self::from_pairs(pairs.into_iter().map(|(ts, v)| (ts.and_utc(), v)))
    }

    /// Build from timestamp strings; see [`parse_timestamp`] for the formats.
    ///
    /// # Errors
    /// Returns `SeriesError::Timestamp` for the first unparseable timestamp.
    pub fn parse<I, S>(pairs: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: AsRef<str>,
    {
        let points = pairs
            .into_iter()
            .map(|(ts, v)| parse_timestamp(ts.as_ref()).map(|ts| Point::new(ts, v)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    /// The raw points in input order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of raw points, gaps included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if there are no points at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A chronologically ordered series without duplicate timestamps.
///
/// Values may still contain gaps. All pipeline stages consume and produce
/// `Series` values; none of them mutates its input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    /// Build from points that must be strictly increasing in time.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidInput` if timestamps are unsorted or repeated.
    pub fn from_points(points: Vec<Point>) -> Result<Self, SeriesError> {
        if let Some(w) = points.windows(2).find(|w| w[0].ts >= w[1].ts) {
            return Err(SeriesError::invalid_input(format!(
                "timestamps must be strictly increasing ({} then {})",
                w[0].ts, w[1].ts
            )));
        }
        Ok(Self { points })
    }

    // Callers guarantee strict ordering.
    pub(crate) const fn from_sorted(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The ordered points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the series and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of points, gaps included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest timestamp.
    #[must_use]
    pub fn first_ts(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.ts)
    }

    /// Latest timestamp.
    #[must_use]
    pub fn last_ts(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.ts)
    }

    /// All timestamps in order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.ts).collect()
    }

    /// All values in order, gaps as `None`.
    #[must_use]
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Value at `ts`: `None` if the timestamp is absent, `Some(None)` for a gap.
    #[must_use]
    pub fn get(&self, ts: DateTime<Utc>) -> Option<Option<f64>> {
        self.points
            .binary_search_by_key(&ts, |p| p.ts)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Number of gaps.
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_gap()).count()
    }

    /// Returns true if any point is a gap.
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        self.points.iter().any(Point::is_gap)
    }

    /// Arithmetic mean of the non-gap values; `None` when there are none.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .points
            .iter()
            .filter_map(|p| p.value)
            .fold((0.0_f64, 0u32), |(s, n), v| (s + v, n.saturating_add(1)));
        (count > 0).then(|| sum / f64::from(count))
    }
}

impl TryFrom<Vec<Point>> for Series {
    type Error = SeriesError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<Series> for Vec<Point> {
    fn from(series: Series) -> Self {
        series.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn nan_values_become_gaps() {
        let ts = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let raw = RawSeries::from_pairs([(ts, Some(f64::NAN))]);
        assert!(raw.points()[0].is_gap());
    }

    #[test]
    fn parses_supported_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(1990, 1, 2, 6, 30, 0).unwrap();
        assert_eq!(parse_timestamp("1990-01-02T06:30:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("1990-01-02T07:30:00+01:00").unwrap(),
            expected
        );
        assert_eq!(parse_timestamp("1990-01-02 06:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("1990-01-02 06:30").unwrap(), expected);
        assert_eq!(
            parse_timestamp("1990-01-02").unwrap(),
            Utc.with_ymd_and_hms(1990, 1, 2, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_timestamp("02/01/1990"),
            Err(SeriesError::Timestamp { .. })
        ));
    }

    #[test]
    fn series_rejects_unsorted_points() {
        let a = Utc.with_ymd_and_hms(2000, 1, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let err = Series::from_points(vec![Point::new(a, Some(1.0)), Point::new(b, Some(2.0))]);
        assert!(err.is_err());
    }

    #[test]
    fn series_json_is_checked_on_the_way_in() {
        let ok = r#"[{"ts":"2000-01-01T00:00:00Z","value":1.5},{"ts":"2000-01-02T00:00:00Z","value":null}]"#;
        let s: Series = serde_json::from_str(ok).unwrap();
        assert_eq!(s.values(), vec![Some(1.5), None]);
        assert_eq!(serde_json::to_string(&s).unwrap(), ok);

        let repeated = r#"[{"ts":"2000-01-01T00:00:00Z","value":1.0},{"ts":"2000-01-01T00:00:00Z","value":2.0}]"#;
        assert!(serde_json::from_str::<Series>(repeated).is_err());
    }

    #[test]
    fn mean_skips_gaps() {
        let t = |d| Utc.with_ymd_and_hms(2000, 1, d, 0, 0, 0).unwrap();
        let s = Series::from_points(vec![
            Point::new(t(1), Some(1.0)),
            Point::gap(t(2)),
            Point::new(t(3), Some(4.0)),
        ])
        .unwrap();
        assert_eq!(s.mean(), Some(2.5));
        assert_eq!(s.gap_count(), 1);
        assert_eq!(s.get(t(2)), Some(None));
        assert_eq!(s.get(t(4)), None);
    }
}
