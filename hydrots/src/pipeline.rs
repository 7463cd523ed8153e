use hydrots_core::{
    Caution, RawSeries, Series, SeriesError, SeriesSettings, Validated, change_frequency,
    extend_after, extend_before, normalize, validate,
};

/// Result of one full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Derivation {
    pub validated: Validated,
    pub series: Series,
    pub cautions: Vec<Caution>,
}

/// Derive the regular series from raw observations.
///
/// Order: validate, change frequency, extend to `tmin`, extend to `tmax`,
/// normalize. The raw series is only read.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "hydrots::pipeline::derive",
        skip_all,
        fields(raw_points = raw.len(), frequency = ?settings.frequency),
        err,
    )
)]
pub(crate) fn derive(
    raw: &RawSeries,
    settings: &SeriesSettings,
) -> Result<Derivation, SeriesError> {
    let mut cautions = Vec::new();
    let validated = validate(raw, settings, &mut cautions)?;

    let mut series = change_frequency(
        &validated.series,
        validated.source_frequency,
        settings,
        &mut cautions,
    );
    if let Some(tmin) = settings.tmin {
        series = extend_before(
            &series,
            tmin,
            settings.frequency,
            settings.fill_before_policy.as_ref(),
            &mut cautions,
        );
    }
    if let Some(tmax) = settings.tmax {
        series = extend_after(
            &series,
            tmax,
            settings.frequency,
            settings.fill_after_policy.as_ref(),
            &mut cautions,
        );
    }
    let series = normalize(&series, settings.normalize_policy.as_ref(), &mut cautions);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        points = series.len(),
        gaps = series.gap_count(),
        cautions = cautions.len(),
        "derived series"
    );
    Ok(Derivation {
        validated,
        series,
        cautions,
    })
}
