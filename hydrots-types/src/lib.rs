//! Settings, policy, frequency, caution and error types shared by the hydrots
//! time-series pipeline.
#![warn(missing_docs)]

mod caution;
mod config;
mod error;
mod frequency;
mod kind;
mod policy;

pub use caution::{Caution, PipelineStep};
pub use config::SeriesSettings;
pub use error::SeriesError;
pub use frequency::Frequency;
pub use kind::SeriesKind;
pub use policy::{
    FillEdgePolicy, FillNanPolicy, NormalizePolicy, SampleDownPolicy, SampleUpPolicy,
};
