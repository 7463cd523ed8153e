//! Shared helpers for series trimming and caution reporting.

use crate::Caution;
use crate::series::Series;

/// Drop leading and trailing gaps so the series starts and ends on an
/// observation. A series of gaps only becomes empty.
#[must_use]
pub fn trim_edges(series: Series) -> Series {
    let points = series.points();
    let Some(start) = points.iter().position(|p| !p.is_gap()) else {
        return Series::default();
    };
    let end = points.iter().rposition(|p| !p.is_gap()).unwrap_or(start);
    if start == 0 && end + 1 == points.len() {
        return series;
    }
    Series::from_sorted(points[start..=end].to_vec())
}

/// Record a caution and log it. A caution already recorded for the same
/// step and policy is not repeated.
pub(crate) fn raise(cautions: &mut Vec<Caution>, caution: Caution) {
    if cautions.contains(&caution) {
        return;
    }
    #[cfg(feature = "tracing")]
    tracing::warn!(%caution, "series caution");
    cautions.push(caution);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineStep;
    use crate::series::Point;
    use chrono::{DateTime, Utc};

    fn t(s: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(s * 86_400, 0).unwrap()
    }

    #[test]
    fn trims_only_the_edges() {
        let s = Series::from_points(vec![
            Point::gap(t(0)),
            Point::new(t(1), Some(1.0)),
            Point::gap(t(2)),
            Point::new(t(3), Some(3.0)),
            Point::gap(t(4)),
        ])
        .unwrap();
        let out = trim_edges(s);
        assert_eq!(out.timestamps(), vec![t(1), t(2), t(3)]);
    }

    #[test]
    fn all_gaps_trim_to_empty() {
        let s = Series::from_points(vec![Point::gap(t(0)), Point::gap(t(1))]).unwrap();
        assert!(trim_edges(s).is_empty());
    }

    #[test]
    fn repeated_cautions_are_recorded_once() {
        let mut cautions = Vec::new();
        raise(&mut cautions, Caution::unsupported(PipelineStep::FillNan, "spline"));
        raise(&mut cautions, Caution::unsupported(PipelineStep::FillNan, "spline"));
        raise(&mut cautions, Caution::missing_policy(PipelineStep::FillNan));
        assert_eq!(
            cautions,
            vec![
                Caution::unsupported(PipelineStep::FillNan, "spline"),
                Caution::missing_policy(PipelineStep::FillNan),
            ]
        );
    }
}
