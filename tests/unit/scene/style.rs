use super::*;
use serde_json::json;

#[test]
fn default_reproduces_reference_constants() {
    let s = CardStyle::default();
    assert_eq!(s.single.enlarge, 1.15);
    assert_eq!(s.single.halo.offset, -20);
    assert_eq!(s.pyramid.middle_height_ratio, 0.95);
    assert_eq!(s.pyramid.side_height_ratio, 0.42);
    assert_eq!(s.glow.layers.len(), 3);
    assert_eq!(s.glow.layers[2].blur_radius, 56.0);
    assert_eq!(s.crypto_text.title_ratio, 0.15);
    assert_eq!(s.crypto_text.anchor, TextAnchorStyle::Centered);
    assert_eq!(
        s.default_text.anchor,
        TextAnchorStyle::Bottom {
            padding_ratio: 0.08
        }
    );
    assert_eq!(s.fit.max_iterations, 10);
    assert_eq!(s.palette.fallback, Rgb8::NEUTRAL_GRAY);
    s.validate().unwrap();
}

#[test]
fn partial_json_override_keeps_other_defaults() {
    let s: CardStyle = serde_json::from_value(json!({
        "pyramid": { "middle_height_ratio": 0.9 },
        "fit": { "damping": 0.9 }
    }))
    .unwrap();
    assert_eq!(s.pyramid.middle_height_ratio, 0.9);
    assert_eq!(s.pyramid.side_height_ratio, 0.42);
    assert_eq!(s.fit.damping, 0.9);
    assert_eq!(s.fit.max_iterations, 10);
    assert_eq!(s.crypto_text, TextBoxStyle::crypto());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_value::<CardStyle>(json!({ "nope": 1 })).is_err());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = CardStyle::default();
    s.fit.damping = 0.0;
    assert!(matches!(s.validate(), Err(CardError::Config(_))));

    let mut s = CardStyle::default();
    s.fit.subtitle_floor = -0.1;
    assert!(s.validate().is_err());

    let mut s = CardStyle::default();
    s.crypto_text.top_ratio = 0.99;
    assert!(s.validate().is_err());

    let mut s = CardStyle::default();
    s.single.halo.alpha = 2.0;
    assert!(s.validate().is_err());

    let mut s = CardStyle::default();
    s.blur_darken.blur_radius = f32::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn fit_iterations_are_capped() {
    let mut s = CardStyle::default();
    s.fit.max_iterations = MAX_FIT_ITERATIONS;
    s.validate().unwrap();

    for n in [0, MAX_FIT_ITERATIONS + 1, 50] {
        let mut s = CardStyle::default();
        s.fit.max_iterations = n;
        let err = s.validate().unwrap_err();
        assert!(matches!(err, CardError::Config(_)), "{n}: {err}");
        assert!(err.to_string().contains("max_iterations"));
    }
}

#[test]
fn fit_damping_stays_in_range() {
    for ok in [0.85, 0.9, 0.95] {
        let mut s = CardStyle::default();
        s.fit.damping = ok;
        s.validate().unwrap();
    }
    for bad in [0.5, 0.84, 0.96, 1.0, f64::NAN] {
        let mut s = CardStyle::default();
        s.fit.damping = bad;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("damping"), "{bad}: {err}");
    }
}

#[test]
fn json_fit_overrides_are_checked() {
    let s: CardStyle = serde_json::from_value(json!({
        "fit": { "max_iterations": 50, "damping": 1.0 }
    }))
    .unwrap();
    assert!(matches!(s.validate(), Err(CardError::Config(_))));
}

#[test]
fn subtitle_defaults() {
    let s = CardStyle::default();
    assert_eq!(s.default_text.subtitle_ratio, 0.055);
    assert_eq!(s.fit.subtitle_floor, 0.04);
}
