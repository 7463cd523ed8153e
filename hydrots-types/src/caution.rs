use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Frequency;

/// Pipeline stage that raised a caution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Raw series validation.
    Validate,
    /// Filling internal gaps at constant frequency.
    FillNan,
    /// Upsampling to a finer frequency.
    SampleUp,
    /// Downsampling to a coarser frequency.
    SampleDown,
    /// Extending the series backward to `tmin`.
    FillBefore,
    /// Extending the series forward to `tmax`.
    FillAfter,
    /// Final normalization.
    Normalize,
}

impl PipelineStep {
    /// The settings key whose policy drives this step.
    #[must_use]
    pub const fn policy_key(self) -> &'static str {
        match self {
            Self::Validate | Self::FillNan => "fill_nan_policy",
            Self::SampleUp => "sample_up_policy",
            Self::SampleDown => "sample_down_policy",
            Self::FillBefore => "fill_before_policy",
            Self::FillAfter => "fill_after_policy",
            Self::Normalize => "normalize_policy",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validate => "validate",
            Self::FillNan => "fill_nan",
            Self::SampleUp => "sample_up",
            Self::SampleDown => "sample_down",
            Self::FillBefore => "fill_before",
            Self::FillAfter => "fill_after",
            Self::Normalize => "normalize",
        };
        f.write_str(s)
    }
}

/// A non-fatal condition observed while deriving a series.
///
/// The pipeline always produces a derived series; cautions are the only
/// signal that a step was skipped or that the result may be degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Caution {
    /// The configured policy is not recognized for this step (or no policy
    /// is configured although the step has work to do). The step was skipped.
    UnsupportedPolicy {
        /// Step that was skipped.
        step: PipelineStep,
        /// Display form of the offending policy, `none` when unset.
        policy: String,
    },
    /// The raw series has no constant spacing; a fallback frequency is imposed
    /// on it and values may be misaligned.
    IrregularSource {
        /// Frequency imposed on the raw series.
        fallback: Frequency,
    },
    /// A step needs a regular grid but no working frequency is known.
    MissingFrequency {
        /// Step that was skipped.
        step: PipelineStep,
    },
}

impl Caution {
    /// Helper: build an `UnsupportedPolicy` caution.
    pub fn unsupported(step: PipelineStep, policy: impl fmt::Display) -> Self {
        Self::UnsupportedPolicy {
            step,
            policy: policy.to_string(),
        }
    }

    /// Helper: build an `UnsupportedPolicy` caution for a step with no policy.
    #[must_use]
    pub fn missing_policy(step: PipelineStep) -> Self {
        Self::unsupported(step, "none")
    }
}

impl fmt::Display for Caution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPolicy { step, policy } => write!(
                f,
                "{} {policy:?} is not supported for {step}; step skipped",
                step.policy_key()
            ),
            Self::IrregularSource { fallback } => write!(
                f,
                "no constant frequency found in the raw series; imposing {fallback}, values may be misaligned"
            ),
            Self::MissingFrequency { step } => {
                write!(f, "{step} needs a frequency but none is configured")
            }
        }
    }
}
