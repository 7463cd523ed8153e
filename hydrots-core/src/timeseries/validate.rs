//! Turning raw observations into an ordered, trimmed series.

use crate::series::{RawSeries, Series};
use crate::timeseries::fill::fill_nan;
use crate::timeseries::infer::{estimate_frequency, infer_frequency};
use crate::timeseries::merge::collapse_duplicates;
use crate::timeseries::util::{raise, trim_edges};
use crate::{Caution, FillNanPolicy, Frequency, SeriesError, SeriesSettings};

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Sorted, duplicate-free series starting and ending on an observation.
    pub series: Series,
    /// Constant spacing found in the raw timestamps, if any.
    pub inferred: Option<Frequency>,
    /// Interval the raw series is treated as having: the inferred one, or
    /// the fallback for an irregular series.
    pub source_frequency: Option<Frequency>,
    /// Number of raw points merged into a point with the same timestamp.
    pub duplicates_merged: usize,
}

impl Validated {
    /// Returns true if the raw timestamps have no constant spacing.
    #[must_use]
    pub const fn is_irregular(&self) -> bool {
        self.inferred.is_none()
    }
}

/// Interval assumed for a raw series without constant spacing.
///
/// An explicit `source_frequency` wins, then the target `frequency`, then the
/// dominant spacing of the timestamps.
#[must_use]
pub fn fallback_frequency(series: &Series, settings: &SeriesSettings) -> Option<Frequency> {
    settings
        .source_frequency
        .or(settings.frequency)
        .or_else(|| estimate_frequency(&series.timestamps()))
}

/// Validate raw observations.
///
/// 1. Infinite values are rejected; `NaN` is already a gap.
/// 2. Points are sorted and repeated timestamps are merged by their mean.
/// 3. Leading and trailing gaps are dropped.
/// 4. The spacing is inferred. Without a constant spacing the fallback from
///    [`fallback_frequency`] is imposed and, unless gaps are simply dropped,
///    an [`Caution::IrregularSource`] is raised.
/// 5. Remaining internal gaps are handled by `fill_nan_policy` at the source
///    frequency.
///
/// # Errors
/// Returns `SeriesError::NonFinite` for an infinite value and
/// `SeriesError::Empty` when no observation carries a value.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "hydrots_core::validate",
        skip_all,
        fields(points = raw.len()),
        err,
    )
)]
pub fn validate(
    raw: &RawSeries,
    settings: &SeriesSettings,
    cautions: &mut Vec<Caution>,
) -> Result<Validated, SeriesError> {
    if let Some(p) = raw
        .points()
        .iter()
        .find(|p| p.value.is_some_and(f64::is_infinite))
    {
        return Err(SeriesError::NonFinite { ts: p.ts });
    }

    let (series, duplicates_merged) = collapse_duplicates(raw.points().to_vec());
    #[cfg(feature = "tracing")]
    if duplicates_merged > 0 {
        tracing::debug!(duplicates_merged, "averaged repeated timestamps");
    }
    let series = trim_edges(series);
    if series.is_empty() {
        return Err(SeriesError::Empty);
    }

    let inferred = infer_frequency(&series.timestamps());
    let source_frequency = match inferred {
        Some(freq) => {
            #[cfg(feature = "tracing")]
            tracing::info!(%freq, "inferred frequency");
            Some(freq)
        }
        None => {
            let fallback = fallback_frequency(&series, settings);
            if let Some(fallback) = fallback
                && settings.fill_nan_policy != Some(FillNanPolicy::Drop)
            {
                raise(cautions, Caution::IrregularSource { fallback });
            }
            fallback
        }
    };

    let series = if series.has_gaps() {
        fill_nan(
            &series,
            source_frequency,
            settings.fill_nan_policy.as_ref(),
            cautions,
        )
    } else {
        series
    };

    Ok(Validated {
        series,
        inferred,
        source_frequency,
        duplicates_merged,
    })
}
