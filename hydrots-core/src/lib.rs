//! hydrots-core
//!
//! Pure algorithms of the hydrots pipeline. Every stage takes a [`Series`]
//! by reference and returns a new one; nothing here holds state between
//! calls.
//!
//! - `series`: observation points, raw input and ordered series.
//! - `timeseries`: validation, inference, resampling, gap filling, window
//!   extension and normalization.
//!
//! All settings, policy, caution and error types of `hydrots-types` are
//! re-exported at the crate root.
//!
//! Logging
//! -------
//! With the `tracing` feature enabled, stages emit `debug` events, inferred
//! frequencies are logged at `info` and every caution is also emitted as a
//! `warn` event.
#![warn(missing_docs)]

/// Observation points and series containers.
pub mod series;
/// Pipeline stages over ordered series.
pub mod timeseries;

pub use hydrots_types::*;
pub use series::{Point, RawSeries, Series, parse_timestamp};
pub use timeseries::extend::{extend_after, extend_before};
pub use timeseries::fill::{
    back_fill, drop_gaps, fill_constant, fill_mean, fill_nan, forward_fill, interpolate_time,
};
pub use timeseries::grid::{align_ceil, align_floor, asfreq, grid, is_regular, reindex};
pub use timeseries::infer::{estimate_frequency, estimate_step_seconds, infer_frequency};
pub use timeseries::merge::collapse_duplicates;
pub use timeseries::normalize::normalize;
pub use timeseries::resample::{FrequencyChange, change_frequency, downsample, upsample};
pub use timeseries::util::trim_edges;
pub use timeseries::validate::{Validated, fallback_frequency, validate};
