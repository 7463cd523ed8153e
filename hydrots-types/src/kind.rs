use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SeriesError;

/// The recognized kinds of observational series.
///
/// The kind only selects a row of default settings; it has no other effect
/// on the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Observed heads, the series a model is calibrated against.
    Observation,
    /// Precipitation stress.
    Precipitation,
    /// Evaporation stress.
    Evaporation,
    /// Pumping/extraction volumes.
    Extraction,
    /// Surface water level stress.
    WaterLevel,
}

impl SeriesKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Observation,
        Self::Precipitation,
        Self::Evaporation,
        Self::Extraction,
        Self::WaterLevel,
    ];

    /// Canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Precipitation => "precipitation",
            Self::Evaporation => "evaporation",
            Self::Extraction => "extraction",
            Self::WaterLevel => "water_level",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SeriesError::invalid_input(format!("unknown series kind: {s}")))
    }
}
