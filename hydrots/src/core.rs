use chrono::{DateTime, Utc};
use hydrots_core::{
    Caution, FillEdgePolicy, FillNanPolicy, Frequency, NormalizePolicy, RawSeries,
    SampleDownPolicy, SampleUpPolicy, Series, SeriesError, SeriesKind, SeriesSettings, validate,
};
use serde_json::Value;

use crate::export::ExportRecord;
use crate::pipeline::{Derivation, derive};

/// A raw observation series together with the regular series derived from it.
///
/// The raw series is stored once and never modified. Every settings change
/// re-runs the whole pipeline from the raw data and replaces the derived
/// series, so the same raw data and settings always give the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    raw: RawSeries,
    name: Option<String>,
    kind: Option<SeriesKind>,
    settings: SeriesSettings,
    inferred: Option<Frequency>,
    source_frequency: Option<Frequency>,
    derived: Derivation,
}

/// Builder for a [`TimeSeries`].
///
/// Settings resolve in this order, later steps winning: the defaults of the
/// series kind (or a full record given via [`settings`](Self::settings)),
/// then a JSON object of keys, then the individual setters.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder {
    raw: RawSeries,
    name: Option<String>,
    kind: Option<SeriesKind>,
    settings: Option<SeriesSettings>,
    settings_json: Option<Value>,
    frequency: Option<Frequency>,
    sample_up: Option<SampleUpPolicy>,
    sample_down: Option<SampleDownPolicy>,
    fill_nan: Option<FillNanPolicy>,
    fill_before: Option<FillEdgePolicy>,
    fill_after: Option<FillEdgePolicy>,
    tmin: Option<DateTime<Utc>>,
    tmax: Option<DateTime<Utc>>,
    normalize: Option<NormalizePolicy>,
}

impl TimeSeriesBuilder {
    /// Start a builder around raw observations.
    #[must_use]
    pub const fn new(raw: RawSeries) -> Self {
        Self {
            raw,
            name: None,
            kind: None,
            settings: None,
            settings_json: None,
            frequency: None,
            sample_up: None,
            sample_down: None,
            fill_nan: None,
            fill_before: None,
            fill_after: None,
            tmin: None,
            tmax: None,
            normalize: None,
        }
    }

    /// Name of the series.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Series kind; selects the default settings.
    #[must_use]
    pub const fn kind(mut self, kind: SeriesKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Start from a complete settings record instead of the kind defaults.
    #[must_use]
    pub fn settings(mut self, settings: SeriesSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Overlay a JSON object of settings keys (see [`SeriesSettings::merge_json`]).
    #[must_use]
    pub fn settings_json(mut self, json: Value) -> Self {
        self.settings_json = Some(json);
        self
    }

    /// Target frequency of the derived series.
    #[must_use]
    pub const fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Fill method for upsampling, e.g. `"bfill"` or `0.0`.
    #[must_use]
    pub fn sample_up(mut self, policy: impl Into<SampleUpPolicy>) -> Self {
        self.sample_up = Some(policy.into());
        self
    }

    /// Aggregation method for downsampling, e.g. `"sum"`.
    #[must_use]
    pub fn sample_down(mut self, policy: impl Into<SampleDownPolicy>) -> Self {
        self.sample_down = Some(policy.into());
        self
    }

    /// Fill method for internal gaps.
    #[must_use]
    pub fn fill_nan(mut self, policy: impl Into<FillNanPolicy>) -> Self {
        self.fill_nan = Some(policy.into());
        self
    }

    /// Fill method for positions added before the series start.
    #[must_use]
    pub fn fill_before(mut self, policy: impl Into<FillEdgePolicy>) -> Self {
        self.fill_before = Some(policy.into());
        self
    }

    /// Fill method for positions added after the series end.
    #[must_use]
    pub fn fill_after(mut self, policy: impl Into<FillEdgePolicy>) -> Self {
        self.fill_after = Some(policy.into());
        self
    }

    /// Requested start of the derived series.
    #[must_use]
    pub const fn tmin(mut self, tmin: DateTime<Utc>) -> Self {
        self.tmin = Some(tmin);
        self
    }

    /// Requested end of the derived series.
    #[must_use]
    pub const fn tmax(mut self, tmax: DateTime<Utc>) -> Self {
        self.tmax = Some(tmax);
        self
    }

    /// Final normalization, e.g. `"mean"`.
    #[must_use]
    pub fn normalize(mut self, policy: impl Into<NormalizePolicy>) -> Self {
        self.normalize = Some(policy.into());
        self
    }

    fn resolve(
        settings: Option<SeriesSettings>,
        kind: Option<SeriesKind>,
        json: Option<&Value>,
    ) -> Result<SeriesSettings, SeriesError> {
        let mut settings = settings.unwrap_or_else(|| SeriesSettings::for_kind(kind));
        if let Some(json) = json {
            settings.merge_json(json)?;
        }
        Ok(settings)
    }

    /// Validate the raw series and run the pipeline.
    ///
    /// # Errors
    /// Returns an input error (`Empty`, `NonFinite`, ...) for unusable raw
    /// data and `InvalidInput` / `Serialization` for a malformed settings
    /// JSON object. Policy problems are never errors; see
    /// [`TimeSeries::cautions`].
    pub fn build(self) -> Result<TimeSeries, SeriesError> {
        let mut settings = Self::resolve(self.settings, self.kind, self.settings_json.as_ref())?;
        macro_rules! apply {
            ($($field:ident => $key:ident),* $(,)?) => {
                $(if let Some(value) = self.$field { settings.$key = Some(value); })*
            };
        }
        apply!(
            frequency => frequency,
            sample_up => sample_up_policy,
            sample_down => sample_down_policy,
            fill_nan => fill_nan_policy,
            fill_before => fill_before_policy,
            fill_after => fill_after_policy,
            tmin => tmin,
            tmax => tmax,
            normalize => normalize_policy,
        );
        TimeSeries::assemble(self.raw, self.name, self.kind, settings)
    }
}

// A regular source supplies the working frequency when none is set; an
// irregular one records the fallback it was validated with.
fn settle_frequencies(
    settings: &mut SeriesSettings,
    inferred: Option<Frequency>,
    source: Option<Frequency>,
) {
    if inferred.is_some() {
        if settings.frequency.is_none() {
            settings.frequency = inferred;
        }
    } else if settings.source_frequency.is_none() {
        settings.source_frequency = source;
    }
}

impl TimeSeries {
    /// Start building a time series around raw observations.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use hydrots::{RawSeries, SeriesKind, TimeSeries};
    ///
    /// let day = |d| Utc.with_ymd_and_hms(2000, 1, d, 0, 0, 0).unwrap();
    /// let raw = RawSeries::from_pairs([
    ///     (day(1), Some(1.0)),
    ///     (day(2), None),
    ///     (day(3), Some(3.0)),
    ///     (day(4), Some(2.0)),
    /// ]);
    /// let ts = TimeSeries::builder(raw)
    ///     .name("rain")
    ///     .kind(SeriesKind::Precipitation)
    ///     .build()?;
    /// assert_eq!(ts.series().values(), vec![Some(1.0), Some(0.0), Some(3.0), Some(2.0)]);
    /// # Ok::<(), hydrots::SeriesError>(())
    /// ```
    #[must_use]
    pub const fn builder(raw: RawSeries) -> TimeSeriesBuilder {
        TimeSeriesBuilder::new(raw)
    }

    /// Build with the defaults of `kind`.
    ///
    /// # Errors
    /// See [`TimeSeriesBuilder::build`].
    pub fn new(
        raw: RawSeries,
        name: Option<&str>,
        kind: Option<SeriesKind>,
    ) -> Result<Self, SeriesError> {
        let mut builder = Self::builder(raw);
        if let Some(name) = name {
            builder = builder.name(name);
        }
        if let Some(kind) = kind {
            builder = builder.kind(kind);
        }
        builder.build()
    }

    /// Rebuild a time series from an exported record.
    ///
    /// The stored settings are used as they are; kind defaults are not
    /// applied again.
    ///
    /// # Errors
    /// See [`TimeSeriesBuilder::build`].
    pub fn reconstruct(record: ExportRecord) -> Result<Self, SeriesError> {
        Self::assemble(
            record.raw_series,
            record.name,
            record.kind,
            record.settings,
        )
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "hydrots::TimeSeries::assemble",
            skip_all,
            fields(name = ?name, kind = ?kind),
            err,
        )
    )]
    fn assemble(
        raw: RawSeries,
        name: Option<String>,
        kind: Option<SeriesKind>,
        mut settings: SeriesSettings,
    ) -> Result<Self, SeriesError> {
        // Inference only; cautions are reported by the pipeline run below.
        let probe = validate(&raw, &settings, &mut Vec::new())?;
        settle_frequencies(&mut settings, probe.inferred, probe.source_frequency);
        let derived = derive(&raw, &settings)?;
        Ok(Self {
            raw,
            name,
            kind,
            settings,
            inferred: probe.inferred,
            source_frequency: probe.source_frequency,
            derived,
        })
    }

    /// The raw observations as given at construction.
    #[must_use]
    pub const fn raw(&self) -> &RawSeries {
        &self.raw
    }

    /// The derived regular series.
    #[must_use]
    pub const fn series(&self) -> &Series {
        &self.derived.series
    }

    /// The validated series of the latest run, before any frequency change.
    #[must_use]
    pub const fn validated(&self) -> &Series {
        &self.derived.validated.series
    }

    /// Settings used for the derived series.
    #[must_use]
    pub const fn settings(&self) -> &SeriesSettings {
        &self.settings
    }

    /// Name of the series, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Kind of the series, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<SeriesKind> {
        self.kind
    }

    /// Constant spacing of the raw timestamps, if they have one.
    #[must_use]
    pub const fn inferred_frequency(&self) -> Option<Frequency> {
        self.inferred
    }

    /// Interval the raw series is treated as having: the inferred frequency,
    /// or the fallback imposed on an irregular series.
    #[must_use]
    pub const fn source_frequency(&self) -> Option<Frequency> {
        self.source_frequency
    }

    /// Cautions raised by the latest pipeline run.
    #[must_use]
    pub fn cautions(&self) -> &[Caution] {
        &self.derived.cautions
    }

    /// Change settings in place and rebuild the derived series.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use hydrots::{Frequency, RawSeries, SampleDownPolicy, TimeSeries};
    ///
    /// let day = |d| Utc.with_ymd_and_hms(2000, 1, d, 0, 0, 0).unwrap();
    /// let raw = RawSeries::from_pairs((1..=14).map(|d| (day(d), Some(1.0))));
    /// let mut ts = TimeSeries::new(raw, Some("well"), None)?;
    /// let cautions = ts.update(|s| {
    ///     s.frequency = Some(Frequency::days(7)?);
    ///     s.sample_down_policy = Some(SampleDownPolicy::Sum);
    ///     Ok(())
    /// })?;
    /// assert!(cautions.is_empty());
    /// // Weekly buckets close on the right: (Dec 25, Jan 1], (Jan 1, Jan 8], ...
    /// assert_eq!(ts.series().values(), vec![Some(1.0), Some(7.0), Some(6.0)]);
    /// # Ok::<(), hydrots::SeriesError>(())
    /// ```
    ///
    /// # Errors
    /// Returns the error of `edit`; the time series is left unchanged in
    /// that case.
    pub fn update<F>(&mut self, edit: F) -> Result<&[Caution], SeriesError>
    where
        F: FnOnce(&mut SeriesSettings) -> Result<(), SeriesError>,
    {
        let mut settings = self.settings.clone();
        edit(&mut settings)?;
        self.replace_settings(settings)
    }

    /// Overlay a JSON object of settings keys and rebuild the derived series.
    ///
    /// # Errors
    /// Returns `InvalidInput` or `Serialization` for a malformed patch; the
    /// time series is left unchanged in that case.
    pub fn update_json(&mut self, patch: &Value) -> Result<&[Caution], SeriesError> {
        self.update(|settings| settings.merge_json(patch))
    }

    /// Replace all settings and rebuild the derived series.
    ///
    /// A missing `frequency` falls back to the inferred one, as at
    /// construction. For an irregular raw series the fallback frequency
    /// chosen at construction is kept unless `settings` names another one.
    ///
    /// # Errors
    /// Only fails if the raw series no longer validates, which cannot happen
    /// for a series that was built successfully.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "hydrots::TimeSeries::replace_settings",
            skip_all,
            fields(name = ?self.name),
            err,
        )
    )]
    pub fn replace_settings(
        &mut self,
        mut settings: SeriesSettings,
    ) -> Result<&[Caution], SeriesError> {
        settle_frequencies(&mut settings, self.inferred, self.source_frequency);
        let derived = derive(&self.raw, &settings)?;
        self.source_frequency = derived.validated.source_frequency;
        self.settings = settings;
        self.derived = derived;
        Ok(self.cautions())
    }

    /// Self-contained record from which [`reconstruct`](Self::reconstruct)
    /// rebuilds an identical time series. The derived series is not part of
    /// it.
    #[must_use]
    pub fn export(&self) -> ExportRecord {
        ExportRecord {
            raw_series: self.raw.clone(),
            settings: self.settings.clone(),
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}
