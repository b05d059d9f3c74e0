#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_page_layout() {
    let cfg = WidgetConfig::default();
    assert_eq!(cfg.endpoint, "/predict");
    assert_eq!((cfg.width, cfg.height), (280, 280));
    assert_eq!(cfg.stroke_width, 20.0);
    assert_eq!(cfg.default_model, "cnn");
}

#[test]
fn with_endpoint_overrides_when_present() {
    let cfg = WidgetConfig::default().with_endpoint(Some(" http://localhost:5001/predict "));
    assert_eq!(cfg.endpoint, "http://localhost:5001/predict");
}

#[test]
fn with_endpoint_ignores_blank_and_none() {
    assert_eq!(WidgetConfig::default().with_endpoint(None).endpoint, "/predict");
    assert_eq!(WidgetConfig::default().with_endpoint(Some("  ")).endpoint, "/predict");
}

#[test]
fn with_stroke_width_overrides_when_valid() {
    let cfg = WidgetConfig::default().with_stroke_width(Some(12.0));
    assert_eq!(cfg.stroke_width, 12.0);
    assert_eq!(cfg.style().width, 12.0);
}

#[test]
fn with_stroke_width_ignores_missing_and_invalid() {
    for width in [None, Some(0.0), Some(-4.0), Some(f64::NAN), Some(f64::INFINITY)] {
        assert_eq!(WidgetConfig::default().with_stroke_width(width).stroke_width, 20.0, "{width:?}");
    }
}

#[test]
fn style_uses_configured_width() {
    let cfg = WidgetConfig { stroke_width: 12.0, ..WidgetConfig::default() };
    assert_eq!(cfg.style().width, 12.0);
}

#[test]
fn resolve_model_prefers_selection() {
    let cfg = WidgetConfig::default();
    assert_eq!(cfg.resolve_model("rf"), "rf");
    assert_eq!(cfg.resolve_model(""), "cnn");
    assert_eq!(cfg.resolve_model("  "), "cnn");
}
