use chrono::{TimeZone, Utc};
use hydrots_types::{
    Caution, FillEdgePolicy, Frequency, NormalizePolicy, PipelineStep, SampleDownPolicy,
    SeriesKind, SeriesSettings,
};
use serde_json::json;

#[test]
fn settings_roundtrip_keeps_every_field() {
    let mut cfg = SeriesSettings::for_kind(Some(SeriesKind::Extraction));
    cfg.frequency = Some(Frequency::hours(6).unwrap());
    cfg.source_frequency = Some(Frequency::DAILY);
    cfg.sample_down_policy = Some(SampleDownPolicy::Unsupported("median".into()));
    cfg.tmin = Some(Utc.with_ymd_and_hms(1989, 6, 15, 12, 0, 0).unwrap());
    cfg.normalize_policy = Some(NormalizePolicy::SubtractMean);
    cfg.extra.insert("comment".into(), json!("well 12, filter 2"));

    let text = serde_json::to_string(&cfg).expect("serialize settings");
    let de: SeriesSettings = serde_json::from_str(&text).expect("deserialize settings");

    assert_eq!(de, cfg);
}

#[test]
fn settings_json_uses_names_and_numbers() {
    let cfg = SeriesSettings::for_kind(Some(SeriesKind::Extraction));
    let v = serde_json::to_value(&cfg).unwrap();

    assert_eq!(v["frequency"], json!("1D"));
    assert_eq!(v["sample_up_policy"], json!("bfill"));
    assert_eq!(v["fill_before_policy"], json!(0.0));
    assert_eq!(v["tmin"], json!(null));
}

#[test]
fn missing_keys_fall_back_to_base_defaults() {
    let de: SeriesSettings = serde_json::from_value(json!({"fill_after_policy": 2.5})).unwrap();
    assert_eq!(de.frequency, Some(Frequency::DAILY));
    assert_eq!(de.fill_after_policy, Some(FillEdgePolicy::Constant(2.5)));
    assert!(de.extra.is_empty());
}

#[test]
fn kind_names_are_snake_case() {
    let v = serde_json::to_value(SeriesKind::WaterLevel).unwrap();
    assert_eq!(v, json!("water_level"));
    assert_eq!("Precipitation".parse::<SeriesKind>().unwrap(), SeriesKind::Precipitation);
    assert!("groundwater".parse::<SeriesKind>().is_err());
}

#[test]
fn caution_roundtrip_and_message() {
    let c = Caution::unsupported(PipelineStep::SampleDown, SampleDownPolicy::from("median"));
    let text = serde_json::to_string(&c).unwrap();
    let de: Caution = serde_json::from_str(&text).unwrap();
    assert_eq!(de, c);
    let msg = c.to_string();
    assert!(msg.contains("sample_down_policy"));
    assert!(msg.contains("median"));
}
