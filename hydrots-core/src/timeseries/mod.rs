//! Time-series pipeline stages.
//!
//! Modules include:
//! - `grid`: frequency and phase arithmetic, reindexing onto a regular grid
//! - `infer`: constant-spacing inference and dominant-step estimation
//! - `merge`: sorting and averaging of repeated timestamps
//! - `validate`: raw observations to an ordered, trimmed series
//! - `fill`: gap-filling primitives and constant-frequency gap filling
//! - `resample`: up- and downsampling across frequency changes
//! - `extend`: window extension with offset correction
//! - `normalize`: final normalization
/// Window extension to a requested `tmin` / `tmax`.
pub mod extend;
/// Gap filling.
pub mod fill;
pub mod grid;
/// Frequency inference helpers.
pub mod infer;
/// Duplicate-timestamp handling.
pub mod merge;
/// Final normalization step.
pub mod normalize;
pub mod resample;
/// Series trimming helpers.
pub mod util;
pub mod validate;
