//! Closed policy enums, one per pipeline axis.
//!
//! Each enum is built from a name (`"mean"`, `"interpolate"`, ...) or a
//! number. Names that are not recognized for an axis, and numbers on axes
//! that take no constant, land in the `Unsupported` variant. The pipeline
//! passes the series through untouched for `Unsupported` and reports a
//! caution, so a bad value never aborts a run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire shape shared by every policy: a bare name or a bare number.
#[doc(hidden)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyRepr {
    /// A numeric constant.
    Number(f64),
    /// A policy name.
    Name(String),
}

fn normalized(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn constant_or_unsupported<T>(
    value: f64,
    constant: impl FnOnce(f64) -> T,
    unsupported: impl FnOnce(String) -> T,
) -> T {
    if value.is_finite() {
        constant(value)
    } else {
        unsupported(value.to_string())
    }
}

macro_rules! policy_conversions {
    ($ty:ident) => {
        impl From<PolicyRepr> for $ty {
            fn from(repr: PolicyRepr) -> Self {
                match repr {
                    PolicyRepr::Name(name) => Self::from_name(&name),
                    PolicyRepr::Number(value) => Self::from_number(value),
                }
            }
        }

        impl From<$ty> for PolicyRepr {
            fn from(policy: $ty) -> Self {
                policy.repr()
            }
        }

        impl FromStr for $ty {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from_name(s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.repr() {
                    PolicyRepr::Name(name) => f.write_str(&name),
                    PolicyRepr::Number(value) => write!(f, "{value}"),
                }
            }
        }

        impl From<f64> for $ty {
            fn from(value: f64) -> Self {
                Self::from_number(value)
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self::from_name(name)
            }
        }
    };
}

/// How new grid positions are filled when the frequency increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum SampleUpPolicy {
    /// Carry the next observation backward (`bfill`, `backfill`).
    BackFill,
    /// Carry the previous observation forward (`ffill`, `pad`).
    ForwardFill,
    /// Fill with the mean of the series (`mean`).
    Mean,
    /// Linear interpolation in time (`interpolate`).
    Interpolate,
    /// Fill with a fixed value.
    Constant(f64),
    /// Anything else; the raw value is kept for reporting.
    Unsupported(String),
}

impl SampleUpPolicy {
    fn from_name(name: &str) -> Self {
        match normalized(name).as_str() {
            "bfill" | "backfill" => Self::BackFill,
            "ffill" | "pad" => Self::ForwardFill,
            "mean" => Self::Mean,
            "interpolate" => Self::Interpolate,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    fn from_number(value: f64) -> Self {
        constant_or_unsupported(value, Self::Constant, Self::Unsupported)
    }

    fn repr(&self) -> PolicyRepr {
        match self {
            Self::BackFill => PolicyRepr::Name("bfill".into()),
            Self::ForwardFill => PolicyRepr::Name("ffill".into()),
            Self::Mean => PolicyRepr::Name("mean".into()),
            Self::Interpolate => PolicyRepr::Name("interpolate".into()),
            Self::Constant(v) => PolicyRepr::Number(*v),
            Self::Unsupported(raw) => PolicyRepr::Name(raw.clone()),
        }
    }
}

policy_conversions!(SampleUpPolicy);

/// How observations are aggregated into buckets when the frequency decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum SampleDownPolicy {
    /// Bucket mean.
    Mean,
    /// Bucket sum; an empty bucket sums to zero.
    Sum,
    /// Bucket minimum.
    Min,
    /// Bucket maximum.
    Max,
    /// Keep only buckets that are fully observed (valued by their mean).
    Drop,
    /// Anything else; the raw value is kept for reporting.
    Unsupported(String),
}

impl SampleDownPolicy {
    fn from_name(name: &str) -> Self {
        match normalized(name).as_str() {
            "mean" => Self::Mean,
            "sum" => Self::Sum,
            "min" => Self::Min,
            "max" => Self::Max,
            "drop" => Self::Drop,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    fn from_number(value: f64) -> Self {
        Self::Unsupported(value.to_string())
    }

    fn repr(&self) -> PolicyRepr {
        let name = match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Drop => "drop",
            Self::Unsupported(raw) => return PolicyRepr::Name(raw.clone()),
        };
        PolicyRepr::Name(name.into())
    }
}

policy_conversions!(SampleDownPolicy);

/// How internal gaps of a constant-frequency series are handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum FillNanPolicy {
    /// Remove gap rows.
    Drop,
    /// Fill with the mean of the series.
    Mean,
    /// Linear interpolation in time.
    Interpolate,
    /// Fill with a fixed value.
    Constant(f64),
    /// Anything else; the raw value is kept for reporting.
    Unsupported(String),
}

impl FillNanPolicy {
    fn from_name(name: &str) -> Self {
        match normalized(name).as_str() {
            "drop" => Self::Drop,
            "mean" => Self::Mean,
            "interpolate" => Self::Interpolate,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    fn from_number(value: f64) -> Self {
        constant_or_unsupported(value, Self::Constant, Self::Unsupported)
    }

    fn repr(&self) -> PolicyRepr {
        match self {
            Self::Drop => PolicyRepr::Name("drop".into()),
            Self::Mean => PolicyRepr::Name("mean".into()),
            Self::Interpolate => PolicyRepr::Name("interpolate".into()),
            Self::Constant(v) => PolicyRepr::Number(*v),
            Self::Unsupported(raw) => PolicyRepr::Name(raw.clone()),
        }
    }
}

policy_conversions!(FillNanPolicy);

/// How positions created by extending the series to `tmin`/`tmax` are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum FillEdgePolicy {
    /// Fill with the mean of the series.
    Mean,
    /// Fill with a fixed value.
    Constant(f64),
    /// Anything else; the raw value is kept for reporting.
    Unsupported(String),
}

impl FillEdgePolicy {
    fn from_name(name: &str) -> Self {
        match normalized(name).as_str() {
            "mean" => Self::Mean,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    fn from_number(value: f64) -> Self {
        constant_or_unsupported(value, Self::Constant, Self::Unsupported)
    }

    fn repr(&self) -> PolicyRepr {
        match self {
            Self::Mean => PolicyRepr::Name("mean".into()),
            Self::Constant(v) => PolicyRepr::Number(*v),
            Self::Unsupported(raw) => PolicyRepr::Name(raw.clone()),
        }
    }
}

policy_conversions!(FillEdgePolicy);

/// Final normalization of the derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum NormalizePolicy {
    /// Subtract the mean of the finished series (`mean`).
    SubtractMean,
    /// Anything else; the raw value is kept for reporting.
    Unsupported(String),
}

impl NormalizePolicy {
    fn from_name(name: &str) -> Self {
        match normalized(name).as_str() {
            "mean" => Self::SubtractMean,
            _ => Self::Unsupported(name.to_string()),
        }
    }

    fn from_number(value: f64) -> Self {
        Self::Unsupported(value.to_string())
    }

    fn repr(&self) -> PolicyRepr {
        match self {
            Self::SubtractMean => PolicyRepr::Name("mean".into()),
            Self::Unsupported(raw) => PolicyRepr::Name(raw.clone()),
        }
    }
}

policy_conversions!(NormalizePolicy);
