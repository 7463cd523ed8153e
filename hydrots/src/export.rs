use hydrots_core::RawSeries;
use hydrots_types::{SeriesError, SeriesKind, SeriesSettings};
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild a [`TimeSeries`](crate::TimeSeries).
///
/// The derived series is left out on purpose: it follows from the raw series
/// and the settings, and [`TimeSeries::reconstruct`](crate::TimeSeries::reconstruct)
/// recomputes it bit for bit.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hydrots::{ExportRecord, RawSeries, SeriesKind, TimeSeries};
///
/// let day = |d| Utc.with_ymd_and_hms(2000, 1, d, 0, 0, 0).unwrap();
/// let raw = RawSeries::from_pairs((1..=5).map(|d| (day(d), Some(f64::from(d) / 3.0))));
/// let ts = TimeSeries::new(raw, Some("evap"), Some(SeriesKind::Evaporation))?;
///
/// let json = ts.export().to_json()?;
/// let back = TimeSeries::reconstruct(ExportRecord::from_json(&json)?)?;
/// assert_eq!(back.series(), ts.series());
/// # Ok::<(), hydrots::SeriesError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Raw observations as given at construction.
    pub raw_series: RawSeries,
    /// Resolved settings, including any recorded source frequency.
    pub settings: SeriesSettings,
    /// Series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Series kind.
    #[serde(default)]
    pub kind: Option<SeriesKind>,
}

impl ExportRecord {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `SeriesError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String, SeriesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to a JSON value.
    ///
    /// # Errors
    /// Returns `SeriesError::Serialization` if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value, SeriesError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a record written by [`to_json`](Self::to_json).
    ///
    /// # Errors
    /// Returns `SeriesError::Serialization` for malformed JSON or fields of
    /// the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, SeriesError> {
        Ok(serde_json::from_str(json)?)
    }
}
