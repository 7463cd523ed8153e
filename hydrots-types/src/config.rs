//! Series settings and the per-kind default table.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    FillEdgePolicy, FillNanPolicy, Frequency, NormalizePolicy, SampleDownPolicy, SampleUpPolicy,
    SeriesError, SeriesKind,
};

/// Settings that drive the derivation of a regular series from raw data.
///
/// Every field is optional. A missing policy means "nothing configured":
/// steps that need one report a caution and leave the series as is, except
/// `normalize_policy`, where `None` simply means no normalization.
///
/// Keys that are not recognized are kept in `extra` and written back
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    /// Target sampling interval of the derived series.
    pub frequency: Option<Frequency>,
    /// Interval assumed for a raw series without constant spacing.
    ///
    /// Recorded on construction when the fallback is first chosen, so that an
    /// exported record rebuilds the same series.
    pub source_frequency: Option<Frequency>,
    /// Gap-fill method used when upsampling.
    pub sample_up_policy: Option<SampleUpPolicy>,
    /// Aggregation method used when downsampling.
    pub sample_down_policy: Option<SampleDownPolicy>,
    /// Gap-fill method for internal gaps at constant frequency.
    pub fill_nan_policy: Option<FillNanPolicy>,
    /// Fill method for positions created before the series start.
    pub fill_before_policy: Option<FillEdgePolicy>,
    /// Fill method for positions created after the series end.
    pub fill_after_policy: Option<FillEdgePolicy>,
    /// Requested inclusive start of the derived series.
    pub tmin: Option<DateTime<Utc>>,
    /// Requested inclusive end of the derived series.
    pub tmax: Option<DateTime<Utc>>,
    /// Post-processing normalization.
    pub normalize_policy: Option<NormalizePolicy>,
    /// Unrecognized keys, passed through without validation.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            frequency: Some(Frequency::DAILY),
            source_frequency: None,
            sample_up_policy: None,
            sample_down_policy: None,
            fill_nan_policy: None,
            fill_before_policy: None,
            fill_after_policy: None,
            tmin: None,
            tmax: None,
            normalize_policy: None,
            extra: BTreeMap::new(),
        }
    }
}

impl SeriesSettings {
    /// Default settings for a series kind; `None` yields the base defaults.
    ///
    /// ```
    /// use hydrots_types::{FillNanPolicy, SampleDownPolicy, SeriesKind, SeriesSettings};
    ///
    /// let prec = SeriesSettings::for_kind(Some(SeriesKind::Precipitation));
    /// assert_eq!(prec.sample_down_policy, Some(SampleDownPolicy::Sum));
    /// assert_eq!(prec.fill_nan_policy, Some(FillNanPolicy::Constant(0.0)));
    /// ```
    #[must_use]
    pub fn for_kind(kind: Option<SeriesKind>) -> Self {
        let base = Self::default();
        let Some(kind) = kind else {
            return base;
        };
        match kind {
            SeriesKind::Observation => Self {
                fill_nan_policy: Some(FillNanPolicy::Drop),
                ..base
            },
            SeriesKind::Precipitation => Self {
                sample_up_policy: Some(SampleUpPolicy::Mean),
                sample_down_policy: Some(SampleDownPolicy::Sum),
                fill_nan_policy: Some(FillNanPolicy::Constant(0.0)),
                fill_before_policy: Some(FillEdgePolicy::Mean),
                fill_after_policy: Some(FillEdgePolicy::Mean),
                ..base
            },
            SeriesKind::Evaporation => Self {
                sample_up_policy: Some(SampleUpPolicy::Interpolate),
                sample_down_policy: Some(SampleDownPolicy::Sum),
                fill_nan_policy: Some(FillNanPolicy::Interpolate),
                fill_before_policy: Some(FillEdgePolicy::Mean),
                fill_after_policy: Some(FillEdgePolicy::Mean),
                ..base
            },
            SeriesKind::Extraction => Self {
                sample_up_policy: Some(SampleUpPolicy::BackFill),
                sample_down_policy: Some(SampleDownPolicy::Sum),
                fill_nan_policy: Some(FillNanPolicy::Constant(0.0)),
                fill_before_policy: Some(FillEdgePolicy::Constant(0.0)),
                fill_after_policy: Some(FillEdgePolicy::Constant(0.0)),
                ..base
            },
            SeriesKind::WaterLevel => Self {
                sample_up_policy: Some(SampleUpPolicy::Mean),
                // Levels are states, not volumes: coarser buckets average.
                sample_down_policy: Some(SampleDownPolicy::Mean),
                fill_nan_policy: Some(FillNanPolicy::Interpolate),
                fill_before_policy: Some(FillEdgePolicy::Mean),
                fill_after_policy: Some(FillEdgePolicy::Mean),
                ..base
            },
        }
    }

    /// Overlay a JSON object of settings keys onto these settings.
    ///
    /// Recognized keys replace the current value (`null` clears it); other
    /// keys are stored in `extra`.
    ///
    /// # Errors
    /// Returns `SeriesError::InvalidInput` if `patch` is not a JSON object and
    /// `SeriesError::Serialization` if a recognized key holds a value of the
    /// wrong shape (for example an unparseable frequency).
    pub fn merge_json(&mut self, patch: &Value) -> Result<(), SeriesError> {
        let Value::Object(entries) = patch else {
            return Err(SeriesError::invalid_input(
                "settings patch must be a JSON object",
            ));
        };
        let Value::Object(mut current) = serde_json::to_value(&*self)? else {
            return Err(SeriesError::Serialization(
                "settings did not serialize to an object".into(),
            ));
        };
        for (key, value) in entries {
            current.insert(key.clone(), value.clone());
        }
        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }

    /// Build settings for `kind` and overlay a JSON object of explicit keys.
    ///
    /// # Errors
    /// See [`SeriesSettings::merge_json`].
    pub fn from_json(kind: Option<SeriesKind>, overrides: &Value) -> Result<Self, SeriesError> {
        let mut settings = Self::for_kind(kind);
        settings.merge_json(overrides)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_defaults_to_daily() {
        for kind in SeriesKind::ALL {
            assert_eq!(
                SeriesSettings::for_kind(Some(kind)).frequency,
                Some(Frequency::DAILY)
            );
        }
    }

    #[test]
    fn water_levels_downsample_by_mean() {
        let s = SeriesSettings::for_kind(Some(SeriesKind::WaterLevel));
        assert_eq!(s.sample_down_policy, Some(SampleDownPolicy::Mean));
        assert_eq!(s.fill_nan_policy, Some(FillNanPolicy::Interpolate));
    }

    #[test]
    fn explicit_keys_override_kind_defaults() {
        let s = SeriesSettings::from_json(
            Some(SeriesKind::Evaporation),
            &json!({"frequency": "7D", "fill_nan_policy": "drop"}),
        )
        .unwrap();
        assert_eq!(s.frequency, Some(Frequency::days(7).unwrap()));
        assert_eq!(s.fill_nan_policy, Some(FillNanPolicy::Drop));
        assert_eq!(s.sample_up_policy, Some(SampleUpPolicy::Interpolate));
    }

    #[test]
    fn null_clears_and_unknown_keys_are_kept() {
        let mut s = SeriesSettings::for_kind(Some(SeriesKind::Precipitation));
        s.merge_json(&json!({"fill_before_policy": null, "legacy_flag": true}))
            .unwrap();
        assert_eq!(s.fill_before_policy, None);
        assert_eq!(s.extra.get("legacy_flag"), Some(&json!(true)));
    }

    #[test]
    fn bad_frequency_is_a_serialization_error() {
        let mut s = SeriesSettings::default();
        let err = s.merge_json(&json!({"frequency": "fortnightly"})).unwrap_err();
        assert!(matches!(err, SeriesError::Serialization(_)));
    }

    #[test]
    fn non_object_patch_is_rejected() {
        let mut s = SeriesSettings::default();
        assert!(s.merge_json(&json!(["frequency", "D"])).is_err());
    }
}
