//! Integration tests for generator configuration files.

use approx::assert_relative_eq;
use curvestack_curves::prelude::*;

const STACK_TOML: &str = r#"
type = "additive_stack"
subtract = false

[[members]]
type = "interpolated_zero"
nodes = [1.0, 2.0, 5.0]
interpolation = { method = "linear", extrapolation = "flat" }

[[members]]
type = "spread_over_fixed"
member = { type = "constant" }
fixed = { kind = "constant", name = "basis", rate = 0.001 }
"#;

#[test]
fn test_toml_stack_generates_directly() {
    let shape = ShapeConfig::from_toml_str(STACK_TOML).unwrap().build().unwrap();
    assert_eq!(shape.kind(), "additive_stack");
    assert_eq!(shape.number_of_parameters().unwrap(), 4);

    let curve = shape.generate("USD-3M", &[0.02, 0.025, 0.03, 0.002]).unwrap();
    assert_relative_eq!(curve.zero_rate(2.0).unwrap(), 0.025 + 0.002 + 0.001, epsilon = 1e-15);
    assert_eq!(curve.number_of_parameters(), 4);
}

#[test]
fn test_json_generic_stack_finalizes_with_counts() {
    let json = r#"{
        "type": "additive_stack",
        "instrument_counts": [2, 2],
        "members": [
            {"type": "interpolated_discount", "interpolation": {"method": "log_linear"}},
            {"type": "anchored_zero"}
        ]
    }"#;
    let shape = ShapeConfig::from_json_str(json).unwrap().build().unwrap();
    assert_eq!(shape.number_of_parameters().unwrap(), 4);

    let bound = shape.finalize(&[0.5, 1.0, 2.0, 3.0], |t: &f64| *t).unwrap();
    // the anchored member keeps both of its own instruments
    assert_eq!(bound.parameter_count(), 4);

    let curve = bound
        .generate("EUR", &[0.99, 0.98, 0.001, 0.002])
        .unwrap();
    let base = curve.zero_rate(1.0).unwrap();
    assert_relative_eq!(base, -(0.98_f64.ln()), max_relative = 1e-12);
}

#[test]
fn test_meeting_date_discount_stack() {
    // short end on two instruments, a turn between meeting dates, then zero
    // rates anchored after the meetings
    let json = r#"{
        "type": "additive_stack",
        "members": [
            {
                "type": "interpolated_discount_number",
                "count": 2,
                "interpolation": {"method": "log_linear"}
            },
            {
                "type": "anchored_discount",
                "anchor": 0.2,
                "nodes": [0.3, 0.5],
                "interpolation": {"method": "log_linear"}
            },
            {"type": "anchored_zero"}
        ]
    }"#;
    let shape = ShapeConfig::from_json_str(json).unwrap().build().unwrap();
    let instruments = [0.1, 0.25, 0.4, 0.6, 1.0, 2.0];
    let bound = shape.finalize(&instruments, |t: &f64| *t).unwrap();
    assert_eq!(bound.parameter_count(), 6);

    let BoundShape::AdditiveStack { members, .. } = &bound else {
        panic!("expected a stack");
    };
    assert_eq!(members[0].kind(), "interpolated_discount");
    match &members[2] {
        BoundShape::AnchoredZero { nodes, .. } => {
            assert_eq!(nodes.anchor(), 0.6);
            assert_eq!(nodes.nodes(), &[1.0, 2.0]);
        }
        other => panic!("unexpected member {other:?}"),
    }

    let curve = bound
        .generate("EUR-ESTR", &[0.999, 0.997, 0.9995, 0.999, 0.001, 0.002])
        .unwrap();
    assert_eq!(curve.number_of_parameters(), 6);
    // both anchored members vanish at their anchors
    let short = members[0].generate("short", &[0.999, 0.997]).unwrap();
    let turn = members[1].generate("turn", &[0.9995, 0.999]).unwrap();
    assert_relative_eq!(turn.discount_factor(0.2).unwrap(), 1.0, epsilon = 1e-15);
    assert_relative_eq!(
        curve.zero_rate(0.6).unwrap(),
        short.zero_rate(0.6).unwrap() + turn.zero_rate(0.6).unwrap(),
        epsilon = 1e-14
    );
}

#[test]
fn test_zero_rate_table_as_fixed_curve() {
    let json = r#"{
        "type": "spread_over_fixed",
        "subtract": true,
        "member": {"type": "nelson_siegel"},
        "fixed": {
            "kind": "zero_rates",
            "name": "govt",
            "times": [1.0, 10.0],
            "rates": [0.01, 0.02]
        }
    }"#;
    let shape = ShapeConfig::from_json_str(json).unwrap().build().unwrap();
    let curve = shape.generate("swap-spread", &[0.03, 0.0, 0.0, 1.0]).unwrap();
    assert_relative_eq!(curve.zero_rate(10.0).unwrap(), 0.01, epsilon = 1e-15);
    assert_eq!(
        curve.underlying_curve_names(),
        vec!["swap-spread-0".to_string(), "govt".to_string()]
    );
}

#[test]
fn test_invalid_documents() {
    let err = ShapeConfig::from_toml_str("type = 3").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ShapeViolation);

    let unsorted = r#"{"type": "interpolated_zero", "nodes": [2.0, 1.0]}"#;
    let err = ShapeConfig::from_json_str(unsorted).unwrap().build().unwrap_err();
    assert!(matches!(err, CurveError::NonMonotonicNodes { .. }));

    let mismatched = r#"{
        "type": "additive_stack",
        "instrument_counts": [1],
        "members": [{"type": "constant"}, {"type": "constant"}]
    }"#;
    assert!(ShapeConfig::from_json_str(mismatched).unwrap().build().is_err());

    let empty = r#"{"type": "additive_stack", "members": []}"#;
    assert!(matches!(
        ShapeConfig::from_json_str(empty).unwrap().build(),
        Err(CurveError::Config { .. })
    ));
}
