use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the hydrots workspace.
///
/// Only structural problems are errors: malformed or empty input, bad
/// timestamps, invalid frequencies and broken export records. Policy
/// problems never abort a pipeline run; they surface as
/// [`Caution`](crate::Caution) values instead.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SeriesError {
    /// The input is not a usable observation series.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The series holds no observation with a value.
    #[error("series contains no observations")]
    Empty,

    /// An observation carries an infinite value.
    #[error("non-finite value at {ts}")]
    NonFinite {
        /// Timestamp of the offending observation.
        ts: DateTime<Utc>,
    },

    /// A timestamp could not be coerced to the canonical UTC representation.
    #[error("unrecognized timestamp: {value}")]
    Timestamp {
        /// The raw timestamp text.
        value: String,
    },

    /// A frequency string or interval is not a positive whole number of seconds.
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Settings or an export record could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl SeriesError {
    /// Helper: build an `InvalidInput` error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Helper: build a `Timestamp` error for an unparseable timestamp.
    pub fn timestamp(value: impl Into<String>) -> Self {
        Self::Timestamp {
            value: value.into(),
        }
    }

    /// Helper: build an `InvalidFrequency` error.
    pub fn invalid_frequency(msg: impl Into<String>) -> Self {
        Self::InvalidFrequency(msg.into())
    }

    /// Returns true if the error was caused by the caller's data rather than
    /// by a settings or export record.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::Empty | Self::NonFinite { .. } | Self::Timestamp { .. }
        )
    }
}

impl From<serde_json::Error> for SeriesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
