//! hydrots turns irregular, gap-containing hydrological observation series
//! (groundwater levels, precipitation, evaporation, pumping volumes) into
//! regular series at one frequency, ready for a simulation model.
//!
//! Overview
//! - A [`TimeSeries`] owns the raw observations and the series derived from
//!   them. The raw data is never modified.
//! - Settings start from the defaults of the [`SeriesKind`] and are
//!   overridden by explicit values.
//! - Every settings change re-runs the full pipeline from the raw data:
//!   validate, change frequency, extend to `tmin`, extend to `tmax`,
//!   normalize.
//! - [`TimeSeries::export`] returns raw data and settings only;
//!   [`TimeSeries::reconstruct`] rebuilds an identical derived series.
//!
//! Key behaviors
//! - Upsampling fills new positions per `sample_up_policy`; downsampling
//!   aggregates into right-closed, right-labeled buckets per
//!   `sample_down_policy`.
//! - Extension bounds are snapped onto the series phase, so new points never
//!   form a second, shifted grid.
//! - Malformed raw data is an error at construction. Unknown or missing
//!   policies never are: the step is skipped and a [`Caution`] is recorded.
//!
//! Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use hydrots::{Frequency, RawSeries, SeriesKind, TimeSeries};
//!
//! let hour = |h| Utc.with_ymd_and_hms(2020, 5, 1, h, 0, 0).unwrap();
//! let raw = RawSeries::from_pairs((0..24).map(|h| (hour(h), Some(0.5))));
//! let ts = TimeSeries::builder(raw)
//!     .name("gauge")
//!     .kind(SeriesKind::Precipitation)
//!     .tmin(Utc.with_ymd_and_hms(2020, 4, 28, 6, 0, 0).unwrap())
//!     .build()?;
//!
//! assert_eq!(ts.inferred_frequency(), Some(Frequency::hours(1)?));
//! // Daily sums, extended back to Apr 28 with the series mean.
//! assert_eq!(ts.series().first_ts(), Some(Utc.with_ymd_and_hms(2020, 4, 28, 0, 0, 0).unwrap()));
//! assert!(ts.cautions().is_empty());
//! # Ok::<(), hydrots::SeriesError>(())
//! ```
#![warn(missing_docs)]

mod core;
mod export;
mod pipeline;

pub use crate::core::{TimeSeries, TimeSeriesBuilder};
pub use export::ExportRecord;
pub use hydrots_core::{Point, RawSeries, Series, parse_timestamp};
pub use hydrots_types::{
    Caution, FillEdgePolicy, FillNanPolicy, Frequency, NormalizePolicy, PipelineStep,
    SampleDownPolicy, SampleUpPolicy, SeriesError, SeriesKind, SeriesSettings,
};
