//! Fixed sampling intervals.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::SeriesError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;

/// A fixed sampling interval, stored as a positive whole number of seconds.
///
/// Parses and prints pandas-like aliases: an optional multiplier followed by
/// a unit (`S`, `T`/`min`, `H`, `D`, `W`). `W` is a plain seven-day interval
/// and is not anchored to a weekday.
///
/// ```
/// use hydrots_types::Frequency;
///
/// let f: Frequency = "12H".parse().unwrap();
/// assert_eq!(f.seconds(), 43_200);
/// assert_eq!(f.to_string(), "12H");
/// assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::days(7).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    seconds: i64,
}

impl Frequency {
    /// One day, the default working frequency for every series kind.
    pub const DAILY: Self = Self { seconds: DAY };

    /// Build a frequency from a number of seconds.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidFrequency` if `seconds` is not positive.
    pub fn from_seconds(seconds: i64) -> Result<Self, SeriesError> {
        if seconds <= 0 {
            return Err(SeriesError::invalid_frequency(format!(
                "interval must be positive, got {seconds}s"
            )));
        }
        Ok(Self { seconds })
    }

    /// Build a frequency from a chrono `TimeDelta`.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidFrequency` for non-positive or sub-second intervals.
    pub fn from_delta(delta: TimeDelta) -> Result<Self, SeriesError> {
        if delta.subsec_nanos() != 0 {
            return Err(SeriesError::invalid_frequency(
                "sub-second intervals are not supported",
            ));
        }
        Self::from_seconds(delta.num_seconds())
    }

    /// `n` minutes.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidFrequency` if `n` is not positive.
    pub fn minutes(n: i64) -> Result<Self, SeriesError> {
        Self::from_seconds(n.saturating_mul(MINUTE))
    }

    /// `n` hours.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidFrequency` if `n` is not positive.
    pub fn hours(n: i64) -> Result<Self, SeriesError> {
        Self::from_seconds(n.saturating_mul(HOUR))
    }

    /// `n` days.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidFrequency` if `n` is not positive.
    pub fn days(n: i64) -> Result<Self, SeriesError> {
        Self::from_seconds(n.saturating_mul(DAY))
    }

    /// Interval length in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Interval length as a chrono `TimeDelta`.
    #[must_use]
    pub const fn as_delta(self) -> TimeDelta {
        TimeDelta::seconds(self.seconds)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % DAY == 0 {
            write!(f, "{}D", s / DAY)
        } else if s % HOUR == 0 {
            write!(f, "{}H", s / HOUR)
        } else if s % MINUTE == 0 {
            write!(f, "{}min", s / MINUTE)
        } else {
            write!(f, "{s}S")
        }
    }
}

impl FromStr for Frequency {
    type Err = SeriesError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        let multiplier: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| SeriesError::invalid_frequency(input))?
        };
        let unit_seconds = match unit {
            "S" | "s" => 1,
            "T" | "min" => MINUTE,
            "H" | "h" => HOUR,
            "D" | "d" => DAY,
            "W" | "w" => WEEK,
            "" => {
                return Err(SeriesError::invalid_frequency(format!(
                    "missing unit in {input:?}"
                )));
            }
            other => {
                return Err(SeriesError::invalid_frequency(format!(
                    "unknown unit {other:?} in {input:?}"
                )));
            }
        };
        let seconds = multiplier
            .checked_mul(unit_seconds)
            .ok_or_else(|| SeriesError::invalid_frequency(input))?;
        Self::from_seconds(seconds)
    }
}

impl TryFrom<String> for Frequency {
    type Error = SeriesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_with_and_without_multiplier() {
        assert_eq!("D".parse::<Frequency>().unwrap().seconds(), DAY);
        assert_eq!("14D".parse::<Frequency>().unwrap().seconds(), 14 * DAY);
        assert_eq!("h".parse::<Frequency>().unwrap().seconds(), HOUR);
        assert_eq!("15min".parse::<Frequency>().unwrap().seconds(), 15 * MINUTE);
        assert_eq!("15T".parse::<Frequency>().unwrap().seconds(), 15 * MINUTE);
        assert_eq!("30S".parse::<Frequency>().unwrap().seconds(), 30);
        assert_eq!("2W".parse::<Frequency>().unwrap().seconds(), 2 * WEEK);
    }

    #[test]
    fn rejects_zero_and_unknown_units() {
        assert!("0D".parse::<Frequency>().is_err());
        assert!("3M".parse::<Frequency>().is_err());
        assert!("12".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn display_picks_largest_whole_unit() {
        assert_eq!(Frequency::days(7).unwrap().to_string(), "7D");
        assert_eq!(Frequency::hours(36).unwrap().to_string(), "36H");
        assert_eq!(Frequency::minutes(90).unwrap().to_string(), "90min");
        assert_eq!(Frequency::from_seconds(45).unwrap().to_string(), "45S");
    }

    #[test]
    fn sub_second_delta_is_rejected() {
        assert!(Frequency::from_delta(TimeDelta::milliseconds(1500)).is_err());
        assert_eq!(
            Frequency::from_delta(TimeDelta::hours(2)).unwrap(),
            Frequency::hours(2).unwrap()
        );
    }
}
