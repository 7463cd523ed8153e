use crate::series::{Point, Series};
use crate::timeseries::util::raise;
use crate::{Caution, NormalizePolicy, PipelineStep};

/// Apply the final normalization step.
///
/// `None` leaves the series alone. `SubtractMean` shifts every value by the
/// mean of the series as given, so it must run after all structural steps.
#[must_use]
pub fn normalize(
    series: &Series,
    policy: Option<&NormalizePolicy>,
    cautions: &mut Vec<Caution>,
) -> Series {
    match policy {
        None => series.clone(),
        Some(NormalizePolicy::SubtractMean) => {
            let Some(mean) = series.mean() else {
                return series.clone();
            };
            let points = series
                .points()
                .iter()
                .map(|p| Point {
                    ts: p.ts,
                    value: p.value.map(|v| v - mean),
                })
                .collect();
            Series::from_sorted(points)
        }
        Some(other @ NormalizePolicy::Unsupported(_)) => {
            raise(cautions, Caution::unsupported(PipelineStep::Normalize, other));
            series.clone()
        }
    }
}
