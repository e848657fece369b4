//! Declarative generator configuration.
//!
//! A [`ShapeConfig`] describes a generator tree in JSON or TOML. Leaf
//! generators may carry their node times; those build directly into bound
//! generators, the others are finalized against instruments later.
//!
//! ```toml
//! type = "additive_stack"
//! subtract = false
//!
//! [[members]]
//! type = "interpolated_zero"
//! nodes = [1.0, 2.0, 5.0]
//!
//! [[members]]
//! type = "spread_over_fixed"
//! member = { type = "constant" }
//! fixed = { kind = "constant", name = "basis", rate = 0.001 }
//! ```

use std::sync::Arc;

use curvestack_math::interpolation::Interpolation;
use serde::{Deserialize, Serialize};

use crate::curves::{ConstantCurve, InterpolatedZeroCurve};
use crate::error::{CurveError, CurveResult};
use crate::generator::{BoundShape, CurveShape};
use crate::traits::CurveRef;

// =============================================================================
// GENERATOR CONFIGURATION
// =============================================================================

/// Serializable description of a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    /// Constant rate.
    Constant,

    /// Interpolated zero rates.
    InterpolatedZero {
        /// Interpolation on zero rates.
        #[serde(default)]
        interpolation: Interpolation,
        /// Node times; taken from instruments when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<f64>>,
    },

    /// Interpolated discount factors.
    InterpolatedDiscount {
        /// Interpolation on discount factors.
        #[serde(default)]
        interpolation: Interpolation,
        /// Node times; taken from instruments when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<f64>>,
    },

    /// Interpolated discount factors on a declared number of instruments.
    InterpolatedDiscountNumber {
        /// Number of nodes.
        count: usize,
        /// Interpolation on discount factors.
        #[serde(default)]
        interpolation: Interpolation,
    },

    /// Periodically-compounded zero rates.
    PeriodicZero {
        /// Compounding periods per year.
        periods_per_year: u32,
        /// Interpolation on periodic rates.
        #[serde(default)]
        interpolation: Interpolation,
        /// Node times; taken from instruments when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<f64>>,
    },

    /// Zero rates pinned to zero at an anchor.
    AnchoredZero {
        /// Interpolation on zero rates.
        #[serde(default)]
        interpolation: Interpolation,
        /// Anchor time, given together with `nodes`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<f64>,
        /// Real node times, given together with `anchor`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<f64>>,
    },

    /// Discount factors pinned to one at an anchor.
    AnchoredDiscount {
        /// Interpolation on discount factors.
        #[serde(default)]
        interpolation: Interpolation,
        /// Anchor time, given together with `nodes`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<f64>,
        /// Real node times, given together with `anchor`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<f64>>,
    },

    /// Nelson-Siegel.
    NelsonSiegel,

    /// Additive stack.
    AdditiveStack {
        /// Members in order.
        members: Vec<ShapeConfig>,
        /// Subtract all members but the first.
        #[serde(default)]
        subtract: bool,
        /// Instruments per member; inferred when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instrument_counts: Option<Vec<usize>>,
    },

    /// Spread over a named curve.
    SpreadOverExisting {
        /// Generator of the spread.
        member: Box<ShapeConfig>,
        /// Subtract the spread.
        #[serde(default)]
        subtract: bool,
        /// Name of the existing curve.
        existing: String,
    },

    /// Spread over a fixed curve.
    SpreadOverFixed {
        /// Generator of the spread.
        member: Box<ShapeConfig>,
        /// Subtract the fixed curve.
        #[serde(default)]
        subtract: bool,
        /// The fixed curve.
        fixed: FixedCurveConfig,
    },
}

impl ShapeConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> CurveResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CurveError::config(format!("invalid generator JSON: {e}")))
    }

    /// Parses a TOML document.
    pub fn from_toml_str(toml: &str) -> CurveResult<Self> {
        toml::from_str(toml).map_err(|e| CurveError::config(format!("invalid generator TOML: {e}")))
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> CurveResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CurveError::config(format!("cannot serialize generator: {e}")))
    }

    /// Builds the generator.
    pub fn build(&self) -> CurveResult<CurveShape> {
        let shape = match self {
            Self::Constant => CurveShape::Constant,
            Self::NelsonSiegel => CurveShape::NelsonSiegel,
            Self::InterpolatedZero {
                interpolation,
                nodes,
            } => match nodes {
                Some(nodes) => bound(BoundShape::interpolated_zero(nodes.clone(), *interpolation)?),
                None => CurveShape::interpolated_zero(*interpolation),
            },
            Self::InterpolatedDiscount {
                interpolation,
                nodes,
            } => match nodes {
                Some(nodes) => bound(BoundShape::interpolated_discount(
                    nodes.clone(),
                    *interpolation,
                )?),
                None => CurveShape::interpolated_discount(*interpolation),
            },
            Self::InterpolatedDiscountNumber { count: 0, .. } => {
                return Err(CurveError::config(
                    "interpolated_discount_number needs a count of at least 1",
                ))
            }
            Self::InterpolatedDiscountNumber {
                count,
                interpolation,
            } => CurveShape::interpolated_discount_number(*count, *interpolation),
            Self::PeriodicZero {
                periods_per_year,
                interpolation,
                nodes,
            } => match nodes {
                Some(nodes) => bound(BoundShape::periodic_zero(
                    nodes.clone(),
                    *periods_per_year,
                    *interpolation,
                )?),
                None if *periods_per_year == 0 => {
                    return Err(CurveError::config(
                        "periods_per_year must be at least 1",
                    ))
                }
                None => CurveShape::periodic_zero(*periods_per_year, *interpolation),
            },
            Self::AnchoredZero {
                interpolation,
                anchor,
                nodes,
            } => match (anchor, nodes) {
                (Some(anchor), Some(nodes)) => bound(BoundShape::anchored_zero(
                    *anchor,
                    nodes.clone(),
                    *interpolation,
                )?),
                (None, None) => CurveShape::anchored_zero(*interpolation),
                _ => return Err(half_anchored(self)),
            },
            Self::AnchoredDiscount {
                interpolation,
                anchor,
                nodes,
            } => match (anchor, nodes) {
                (Some(anchor), Some(nodes)) => bound(BoundShape::anchored_discount(
                    *anchor,
                    nodes.clone(),
                    *interpolation,
                )?),
                (None, None) => CurveShape::anchored_discount(*interpolation),
                _ => return Err(half_anchored(self)),
            },
            Self::AdditiveStack {
                members,
                subtract,
                instrument_counts,
            } => {
                if members.is_empty() {
                    return Err(CurveError::config("additive_stack has no members"));
                }
                let members = members
                    .iter()
                    .map(ShapeConfig::build)
                    .collect::<CurveResult<Vec<_>>>()?;
                match instrument_counts {
                    Some(counts) => {
                        CurveShape::additive_stack_with_counts(members, counts.clone(), *subtract)?
                    }
                    None => CurveShape::additive_stack(members, *subtract),
                }
            }
            Self::SpreadOverExisting {
                member,
                subtract,
                existing,
            } => CurveShape::spread_over_existing(member.build()?, *subtract, existing.clone()),
            Self::SpreadOverFixed {
                member,
                subtract,
                fixed,
            } => CurveShape::spread_over_fixed(member.build()?, *subtract, fixed.build()?),
        };
        Ok(shape)
    }
}

fn bound(shape: BoundShape) -> CurveShape {
    CurveShape::Bound(Box::new(shape))
}

fn half_anchored(config: &ShapeConfig) -> CurveError {
    let kind = match config {
        ShapeConfig::AnchoredDiscount { .. } => "anchored_discount",
        _ => "anchored_zero",
    };
    CurveError::config(format!("{kind} needs both `anchor` and `nodes`, or neither"))
}

// =============================================================================
// FIXED CURVES
// =============================================================================

/// Serializable description of a fixed curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixedCurveConfig {
    /// Constant continuously-compounded rate.
    Constant {
        /// Curve name.
        name: String,
        /// The rate.
        rate: f64,
    },

    /// Interpolated zero-rate table.
    ZeroRates {
        /// Curve name.
        name: String,
        /// Node times.
        times: Vec<f64>,
        /// Zero rates at the nodes.
        rates: Vec<f64>,
        /// Interpolation on zero rates.
        #[serde(default)]
        interpolation: Interpolation,
    },
}

impl FixedCurveConfig {
    /// Builds the curve.
    pub fn build(&self) -> CurveResult<CurveRef> {
        Ok(match self {
            Self::Constant { name, rate } => Arc::new(ConstantCurve::new(name.as_str(), *rate)),
            Self::ZeroRates {
                name,
                times,
                rates,
                interpolation,
            } => Arc::new(InterpolatedZeroCurve::new(
                name.as_str(),
                times.clone(),
                rates.clone(),
                *interpolation,
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::generator::CurveGenerator;

    #[test]
    fn test_generic_leaf_needs_finalization() {
        let config = ShapeConfig::from_json_str(r#"{"type": "interpolated_zero"}"#).unwrap();
        let shape = config.build().unwrap();
        assert_eq!(shape.kind(), "interpolated_zero");
        assert!(shape.number_of_parameters().is_err());
    }

    #[test]
    fn test_leaf_with_nodes_is_bound() {
        let config = ShapeConfig::from_json_str(
            r#"{"type": "interpolated_discount", "nodes": [0.5, 1.0, 2.0]}"#,
        )
        .unwrap();
        let shape = config.build().unwrap();
        assert!(matches!(shape, CurveShape::Bound(_)));
        assert_eq!(shape.number_of_parameters().unwrap(), 3);
    }

    #[test]
    fn test_half_specified_anchor_is_rejected() {
        let config =
            ShapeConfig::from_json_str(r#"{"type": "anchored_zero", "anchor": 0.5}"#).unwrap();
        let err = config.build().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeViolation);
        assert!(matches!(err, CurveError::Config { .. }));
    }

    #[test]
    fn test_discount_number_and_anchored_discount() {
        let shape = ShapeConfig::from_json_str(
            r#"{
                "type": "interpolated_discount_number",
                "count": 2,
                "interpolation": {"method": "log_linear"}
            }"#,
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(shape.number_of_parameters().unwrap(), 2);

        let zero =
            ShapeConfig::from_json_str(r#"{"type": "interpolated_discount_number", "count": 0}"#)
                .unwrap();
        assert!(matches!(zero.build(), Err(CurveError::Config { .. })));

        let anchored = ShapeConfig::from_json_str(
            r#"{"type": "anchored_discount", "anchor": 0.1, "nodes": [0.25, 0.5]}"#,
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(anchored.kind(), "anchored_discount");
        assert_eq!(anchored.number_of_parameters().unwrap(), 2);

        let half =
            ShapeConfig::from_json_str(r#"{"type": "anchored_discount", "nodes": [0.25]}"#).unwrap();
        let err = half.build().unwrap_err();
        assert!(err.to_string().contains("anchored_discount"));
    }

    #[test]
    fn test_counts_disagreeing_with_members_are_rejected() {
        let config = ShapeConfig::from_json_str(
            r#"{
                "type": "additive_stack",
                "instrument_counts": [3, 2],
                "members": [{"type": "constant"}, {"type": "interpolated_zero"}]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            config.build(),
            Err(CurveError::InstrumentCountMismatch { expected: 1, got: 3 })
        ));
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        let err = ShapeConfig::from_json_str(r#"{"type": "hermite"}"#).unwrap_err();
        assert!(matches!(err, CurveError::Config { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ShapeConfig::AdditiveStack {
            members: vec![
                ShapeConfig::Constant,
                ShapeConfig::SpreadOverExisting {
                    member: Box::new(ShapeConfig::NelsonSiegel),
                    subtract: true,
                    existing: "USD-OIS".to_string(),
                },
            ],
            subtract: false,
            instrument_counts: None,
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(ShapeConfig::from_json_str(&json).unwrap(), config);
    }
}
