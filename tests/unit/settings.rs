use super::*;

#[test]
fn defaults_are_valid() {
    GenerationSettings::default().validate().unwrap();
}

#[test]
fn partial_json_loads_over_defaults() {
    let s = GenerationSettings::from_json_slice(
        br##"{"brandColor":"#112233","backgroundShape":"RECT","outputSize":512}"##,
    )
    .unwrap();
    assert_eq!(s.brand_color, "#112233");
    assert_eq!(s.background_shape, BackgroundShape::Rect);
    assert_eq!(s.output_size, 512);
    assert_eq!(s.subject_scale, 0.95);
}

#[test]
fn unknown_shape_deserializes_but_fails_validation() {
    let s: GenerationSettings =
        serde_json::from_str(r#"{"backgroundShape":"TRIANGLE"}"#).unwrap();
    assert_eq!(
        s.background_shape,
        BackgroundShape::Unknown("TRIANGLE".to_owned())
    );
    let err = s.validate().unwrap_err();
    assert!(matches!(err, PfpError::Validation(_)));

    let err = s.background_shape.ensure_known().unwrap_err();
    assert!(matches!(err, PfpError::Config(_)));
}

#[test]
fn out_of_range_values_are_rejected() {
    let s = GenerationSettings {
        background_scale: 1.6,
        ..Default::default()
    };
    assert!(s.validate().is_err());

    let s = GenerationSettings {
        output_size: 32,
        ..Default::default()
    };
    assert!(s.validate().is_err());

    let s = GenerationSettings {
        subject_rotation: f64::NAN,
        ..Default::default()
    };
    assert!(s.validate().is_err());
}

#[test]
fn enums_use_wire_names() {
    let s = GenerationSettings {
        border_layer: BorderLayer::Foreground,
        output_format: OutputFormat::Webp,
        background_shape: BackgroundShape::RoundedRect,
        ..Default::default()
    };
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["borderLayer"], "FOREGROUND");
    assert_eq!(v["outputFormat"], "webp");
    assert_eq!(v["backgroundShape"], "ROUNDEDRECT");

    let f: OutputFormat = serde_json::from_str(r#""jpg""#).unwrap();
    assert_eq!(f, OutputFormat::Jpeg);
}

#[test]
fn patch_apply_returns_new_record_and_leaves_base_untouched() {
    let base = GenerationSettings::default();
    let snapshot = base.clone();
    let patch = SettingsPatch {
        background_scale: Some(0.75),
        border: Some(true),
        brand_color: Some("rgb(1, 2, 3)".to_owned()),
        ..Default::default()
    };

    let derived = patch.apply(&base);
    assert_eq!(base, snapshot);
    assert_eq!(derived.background_scale, 0.75);
    assert!(derived.border);
    assert_eq!(derived.brand_color, "rgb(1, 2, 3)");
    assert_eq!(derived.subject_scale, base.subject_scale);
}

#[test]
fn patch_layering_prefers_later_fields() {
    let a = SettingsPatch {
        subject_scale: Some(0.9),
        border: Some(false),
        ..Default::default()
    };
    let b = SettingsPatch {
        border: Some(true),
        ..Default::default()
    };
    let merged = a.merged_with(&b);
    assert_eq!(merged.subject_scale, Some(0.9));
    assert_eq!(merged.border, Some(true));
}

#[test]
fn patch_json_only_carries_present_fields() {
    let p = SettingsPatch::from_json_slice(br#"{"subjectSaturation":0,"subjectContrast":115}"#)
        .unwrap();
    assert_eq!(p.subject_saturation, Some(0.0));
    assert_eq!(p.subject_contrast, Some(115.0));
    assert_eq!(p.brand_color, None);
}
