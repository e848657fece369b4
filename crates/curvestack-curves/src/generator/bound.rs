//! Node-bound generators.

use std::sync::Arc;

use curvestack_math::interpolation::Interpolation;
use tracing::trace;

use super::nodes::{AnchoredNodes, NodeTimes};
use super::CurveGenerator;
use crate::curves::{
    ConstantCurve, InterpolatedDiscountCurve, InterpolatedZeroCurve, NelsonSiegelCurve,
    PeriodicZeroCurve, SpreadComponent, SpreadCurve, SpreadSign,
};
use crate::error::{CurveError, CurveResult};
use crate::traits::{CurveLookup, CurveRef};

/// A generator whose nodes are known.
///
/// Produced by [`CurveGenerator::finalize`] on a [`CurveShape`](super::CurveShape),
/// or built directly when node times are supplied up front. A bound shape
/// always knows its parameter count and can generate curves.
#[derive(Debug, Clone)]
pub enum BoundShape {
    /// One continuously-compounded rate.
    Constant,
    /// Interpolated zero rates at the nodes.
    InterpolatedZero {
        /// Node times.
        nodes: NodeTimes,
        /// Interpolation on zero rates.
        interpolation: Interpolation,
    },
    /// Interpolated discount factors at the nodes.
    InterpolatedDiscount {
        /// Node times.
        nodes: NodeTimes,
        /// Interpolation on discount factors.
        interpolation: Interpolation,
    },
    /// Interpolated periodically-compounded zero rates at the nodes.
    PeriodicZero {
        /// Node times.
        nodes: NodeTimes,
        /// Interpolation on periodic rates.
        interpolation: Interpolation,
        /// Compounding periods per year.
        periods_per_year: u32,
    },
    /// Interpolated zero rates pinned to zero at an anchor.
    AnchoredZero {
        /// Anchor and real node times.
        nodes: AnchoredNodes,
        /// Interpolation on zero rates.
        interpolation: Interpolation,
    },
    /// Interpolated discount factors pinned to one at an anchor.
    AnchoredDiscount {
        /// Anchor and real node times.
        nodes: AnchoredNodes,
        /// Interpolation on discount factors.
        interpolation: Interpolation,
    },
    /// Nelson-Siegel with parameters `[β₀, β₁, β₂, τ]`.
    NelsonSiegel,
    /// Signed sum of member curves; parameters concatenated in member order.
    AdditiveStack {
        /// Members, first one always added.
        members: Vec<BoundShape>,
        /// Subtract all members but the first.
        subtract: bool,
    },
    /// Spread over a curve looked up by name at generation time.
    SpreadOverExisting {
        /// Generator of the spread.
        member: Box<BoundShape>,
        /// Compute `existing - spread` instead of `existing + spread`.
        subtract: bool,
        /// Name of the existing curve.
        existing: String,
    },
    /// Spread over a curve supplied at construction.
    SpreadOverFixed {
        /// Generator of the spread.
        member: Box<BoundShape>,
        /// Compute `spread - fixed` instead of `spread + fixed`.
        subtract: bool,
        /// The fixed curve.
        fixed: CurveRef,
    },
}

impl BoundShape {
    /// Interpolated zero-rate generator on the given nodes.
    pub fn interpolated_zero(nodes: Vec<f64>, interpolation: Interpolation) -> CurveResult<Self> {
        Ok(Self::InterpolatedZero {
            nodes: NodeTimes::new(nodes)?,
            interpolation,
        })
    }

    /// Interpolated discount-factor generator on the given nodes.
    pub fn interpolated_discount(
        nodes: Vec<f64>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        Ok(Self::InterpolatedDiscount {
            nodes: NodeTimes::new(nodes)?,
            interpolation,
        })
    }

    /// Periodically-compounded zero-rate generator on the given nodes.
    pub fn periodic_zero(
        nodes: Vec<f64>,
        periods_per_year: u32,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        if periods_per_year == 0 {
            return Err(CurveError::invalid_input(
                "compounding periods per year must be at least 1",
            ));
        }
        Ok(Self::PeriodicZero {
            nodes: NodeTimes::new(nodes)?,
            interpolation,
            periods_per_year,
        })
    }

    /// Anchored zero-rate generator.
    pub fn anchored_zero(
        anchor: f64,
        nodes: Vec<f64>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        Ok(Self::AnchoredZero {
            nodes: AnchoredNodes::new(anchor, nodes)?,
            interpolation,
        })
    }

    /// Anchored discount-factor generator.
    pub fn anchored_discount(
        anchor: f64,
        nodes: Vec<f64>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        Ok(Self::AnchoredDiscount {
            nodes: AnchoredNodes::new(anchor, nodes)?,
            interpolation,
        })
    }

    /// Additive stack of bound members.
    pub fn additive_stack(members: Vec<BoundShape>, subtract: bool) -> CurveResult<Self> {
        if members.is_empty() {
            return Err(CurveError::invalid_input(
                "an additive stack needs at least one member",
            ));
        }
        Ok(Self::AdditiveStack { members, subtract })
    }

    /// Spread over a named existing curve.
    #[must_use]
    pub fn spread_over_existing(
        member: BoundShape,
        subtract: bool,
        existing: impl Into<String>,
    ) -> Self {
        Self::SpreadOverExisting {
            member: Box::new(member),
            subtract,
            existing: existing.into(),
        }
    }

    /// Spread over a fixed curve.
    #[must_use]
    pub fn spread_over_fixed(member: BoundShape, subtract: bool, fixed: CurveRef) -> Self {
        Self::SpreadOverFixed {
            member: Box::new(member),
            subtract,
            fixed,
        }
    }

    /// Short name of the generator kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::InterpolatedZero { .. } => "interpolated_zero",
            Self::InterpolatedDiscount { .. } => "interpolated_discount",
            Self::PeriodicZero { .. } => "periodic_zero",
            Self::AnchoredZero { .. } => "anchored_zero",
            Self::AnchoredDiscount { .. } => "anchored_discount",
            Self::NelsonSiegel => "nelson_siegel",
            Self::AdditiveStack { .. } => "additive_stack",
            Self::SpreadOverExisting { .. } => "spread_over_existing",
            Self::SpreadOverFixed { .. } => "spread_over_fixed",
        }
    }

    /// Number of parameters a generated curve takes.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        match self {
            Self::Constant => 1,
            Self::InterpolatedZero { nodes, .. }
            | Self::InterpolatedDiscount { nodes, .. }
            | Self::PeriodicZero { nodes, .. } => nodes.len(),
            Self::AnchoredZero { nodes, .. } | Self::AnchoredDiscount { nodes, .. } => {
                nodes.number_of_parameters()
            }
            Self::NelsonSiegel => curvestack_math::parametric::NelsonSiegel::PARAMETER_COUNT,
            Self::AdditiveStack { members, .. } => {
                members.iter().map(BoundShape::parameter_count).sum()
            }
            Self::SpreadOverExisting { member, .. } | Self::SpreadOverFixed { member, .. } => {
                member.parameter_count()
            }
        }
    }

    /// Generates one curve per parameter vector.
    ///
    /// Runs on the rayon thread pool when the `parallel` feature is enabled.
    pub fn generate_batch(
        &self,
        name: &str,
        parameter_sets: &[Vec<f64>],
        lookup: Option<&dyn CurveLookup>,
    ) -> CurveResult<Vec<CurveRef>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            parameter_sets
                .par_iter()
                .map(|parameters| self.generate_with(name, parameters, lookup))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            parameter_sets
                .iter()
                .map(|parameters| self.generate_with(name, parameters, lookup))
                .collect()
        }
    }

    fn generate_stack(
        name: &str,
        members: &[BoundShape],
        subtract: bool,
        parameters: &[f64],
        lookup: Option<&dyn CurveLookup>,
    ) -> CurveResult<CurveRef> {
        let components = members
            .iter()
            .zip(split(members, parameters))
            .enumerate()
            .map(|(k, (member, slice))| {
                let curve = member.generate_with(&format!("{name}-{k}"), slice, lookup)?;
                Ok(SpreadComponent::generated(
                    curve,
                    SpreadSign::for_position(k, subtract),
                ))
            })
            .collect::<CurveResult<Vec<_>>>()?;
        Ok(Arc::new(SpreadCurve::new(name, components)?))
    }
}

/// Splits `values` into consecutive slices sized by the members' parameter
/// counts. The caller checks the total length.
fn split<'a>(members: &[BoundShape], values: &'a [f64]) -> Vec<&'a [f64]> {
    let mut start = 0;
    members
        .iter()
        .map(|member| {
            let end = start + member.parameter_count();
            let slice = &values[start..end];
            start = end;
            slice
        })
        .collect()
}

impl CurveGenerator for BoundShape {
    fn number_of_parameters(&self) -> CurveResult<usize> {
        Ok(self.parameter_count())
    }

    /// Already bound: returns a copy of itself.
    fn finalize<I, F>(&self, _instruments: &[I], _node_time: F) -> CurveResult<BoundShape>
    where
        F: Fn(&I) -> f64,
    {
        Ok(self.clone())
    }

    fn generate_with(
        &self,
        name: &str,
        parameters: &[f64],
        lookup: Option<&dyn CurveLookup>,
    ) -> CurveResult<CurveRef> {
        let expected = self.parameter_count();
        if parameters.len() != expected {
            return Err(CurveError::parameter_count_mismatch(expected, parameters.len()));
        }
        trace!(name, generator = self.kind(), parameters = expected, "generating curve");

        let curve: CurveRef = match self {
            Self::Constant => Arc::new(ConstantCurve::new(name, parameters[0])),
            Self::InterpolatedZero {
                nodes,
                interpolation,
            } => Arc::new(InterpolatedZeroCurve::new(
                name,
                nodes.as_slice().to_vec(),
                parameters.to_vec(),
                *interpolation,
            )?),
            Self::InterpolatedDiscount {
                nodes,
                interpolation,
            } => Arc::new(InterpolatedDiscountCurve::new(
                name,
                nodes.as_slice().to_vec(),
                parameters.to_vec(),
                *interpolation,
            )?),
            Self::PeriodicZero {
                nodes,
                interpolation,
                periods_per_year,
            } => Arc::new(PeriodicZeroCurve::new(
                name,
                nodes.as_slice().to_vec(),
                parameters.to_vec(),
                *periods_per_year,
                *interpolation,
            )?),
            Self::AnchoredZero {
                nodes,
                interpolation,
            } => Arc::new(InterpolatedZeroCurve::anchored(
                name,
                nodes.anchor(),
                nodes.nodes(),
                parameters,
                *interpolation,
            )?),
            Self::AnchoredDiscount {
                nodes,
                interpolation,
            } => Arc::new(InterpolatedDiscountCurve::anchored(
                name,
                nodes.anchor(),
                nodes.nodes(),
                parameters,
                *interpolation,
            )?),
            Self::NelsonSiegel => Arc::new(NelsonSiegelCurve::from_parameters(name, parameters)?),
            Self::AdditiveStack { members, subtract } => {
                Self::generate_stack(name, members, *subtract, parameters, lookup)?
            }
            Self::SpreadOverExisting {
                member,
                subtract,
                existing,
            } => {
                let lookup = lookup.ok_or_else(|| {
                    CurveError::unsupported(
                        "generate",
                        format!("spread over existing curve '{existing}' needs a curve lookup"),
                    )
                })?;
                let base = lookup.lookup_curve(existing).ok_or_else(|| {
                    CurveError::unsupported(
                        "generate",
                        format!("existing curve '{existing}' is not available from the lookup"),
                    )
                })?;
                let spread = member.generate_with(&format!("{name}-0"), parameters, Some(lookup))?;
                Arc::new(SpreadCurve::new(
                    name,
                    vec![
                        SpreadComponent::frozen(base, SpreadSign::Add),
                        SpreadComponent::generated(spread, SpreadSign::for_position(1, *subtract)),
                    ],
                )?)
            }
            Self::SpreadOverFixed {
                member,
                subtract,
                fixed,
            } => {
                let spread = member.generate_with(&format!("{name}-0"), parameters, lookup)?;
                Arc::new(SpreadCurve::new(
                    name,
                    vec![
                        SpreadComponent::generated(spread, SpreadSign::Add),
                        SpreadComponent::frozen(
                            Arc::clone(fixed),
                            SpreadSign::for_position(1, *subtract),
                        ),
                    ],
                )?)
            }
        };
        Ok(curve)
    }

    fn initial_guess(&self, market_rates: &[f64]) -> CurveResult<Vec<f64>> {
        if let Self::NelsonSiegel = self {
            return match (market_rates.first(), market_rates.last()) {
                (Some(&first), Some(&last)) => Ok(vec![last, first - last, 0.0, 1.0]),
                _ => Err(CurveError::InsufficientNodes {
                    required: 1,
                    got: 0,
                }),
            };
        }

        let expected = self.parameter_count();
        if market_rates.len() != expected {
            return Err(CurveError::parameter_count_mismatch(expected, market_rates.len()));
        }
        match self {
            Self::InterpolatedDiscount { nodes, .. } => Ok(nodes
                .as_slice()
                .iter()
                .zip(market_rates)
                .map(|(t, r)| (-t * r).exp())
                .collect()),
            Self::AnchoredDiscount { nodes, .. } => Ok(nodes
                .nodes()
                .iter()
                .zip(market_rates)
                .map(|(t, r)| (-t * r).exp())
                .collect()),
            Self::AdditiveStack { members, .. } => {
                let mut guess = Vec::with_capacity(expected);
                for (member, rates) in members.iter().zip(split(members, market_rates)) {
                    guess.extend(member.initial_guess(rates)?);
                }
                Ok(guess)
            }
            Self::SpreadOverExisting { .. } | Self::SpreadOverFixed { .. } => {
                Ok(vec![0.0; expected])
            }
            _ => Ok(market_rates.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::ConstantCurve;
    use crate::traits::Curve;
    use approx::assert_relative_eq;

    fn zero_2y() -> BoundShape {
        BoundShape::interpolated_zero(vec![1.0, 5.0], Interpolation::linear()).unwrap()
    }

    #[test]
    fn test_parameter_count_check() {
        let shape = zero_2y();
        assert_eq!(
            shape.generate("z", &[0.02]).err(),
            Some(CurveError::parameter_count_mismatch(2, 1))
        );
    }

    #[test]
    fn test_stack_names_members() {
        let stack =
            BoundShape::additive_stack(vec![BoundShape::Constant, zero_2y()], false).unwrap();
        let curve = stack.generate("stack", &[0.01, 0.02, 0.03]).unwrap();
        assert_eq!(curve.name(), "stack");
        assert_eq!(curve.underlying_curve_names(), vec!["stack-0", "stack-1"]);
        assert_relative_eq!(curve.zero_rate(3.0).unwrap(), 0.035, epsilon = 1e-15);
    }

    #[test]
    fn test_subtracting_stack() {
        let stack =
            BoundShape::additive_stack(vec![zero_2y(), BoundShape::Constant], true).unwrap();
        let curve = stack.generate("s", &[0.02, 0.03, 0.005]).unwrap();
        assert_relative_eq!(curve.zero_rate(1.0).unwrap(), 0.015, epsilon = 1e-15);
        assert_eq!(
            curve.zero_rate_parameter_sensitivity(1.0).unwrap(),
            vec![1.0, 0.0, -1.0]
        );
    }

    #[test]
    fn test_spread_over_existing_needs_lookup() {
        let shape = BoundShape::spread_over_existing(BoundShape::Constant, false, "base");
        let err = shape.generate("s", &[0.001]).unwrap_err();
        assert!(matches!(err, CurveError::UnsupportedOperation { .. }));

        let lookup: std::collections::HashMap<String, CurveRef> = std::collections::HashMap::new();
        let err = shape.generate_with("s", &[0.001], Some(&lookup)).unwrap_err();
        assert!(matches!(err, CurveError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_spread_over_fixed_subtract() {
        let fixed: CurveRef = Arc::new(ConstantCurve::new("fixed", 0.01));
        let shape = BoundShape::spread_over_fixed(zero_2y(), true, fixed);
        let curve = shape.generate("s", &[0.02, 0.03]).unwrap();
        assert_relative_eq!(curve.zero_rate(5.0).unwrap(), 0.02, epsilon = 1e-15);
        assert_eq!(curve.number_of_parameters(), 2);
        assert_eq!(curve.underlying_curve_names(), vec!["s-0", "fixed"]);
    }

    #[test]
    fn test_initial_guesses() {
        let df = BoundShape::interpolated_discount(vec![1.0, 2.0], Interpolation::log_linear())
            .unwrap();
        let guess = df.initial_guess(&[0.02, 0.03]).unwrap();
        assert_relative_eq!(guess[0], (-0.02_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(guess[1], (-0.06_f64).exp(), epsilon = 1e-15);

        let ns = BoundShape::NelsonSiegel.initial_guess(&[0.01, 0.02, 0.04]).unwrap();
        assert_eq!(ns, vec![0.04, 0.01 - 0.04, 0.0, 1.0]);

        let spread = BoundShape::spread_over_existing(zero_2y(), false, "base");
        assert_eq!(spread.initial_guess(&[0.02, 0.03]).unwrap(), vec![0.0, 0.0]);

        let stack = BoundShape::additive_stack(vec![df, BoundShape::Constant], false).unwrap();
        let guess = stack.initial_guess(&[0.02, 0.03, 0.01]).unwrap();
        assert_eq!(guess.len(), 3);
        assert_eq!(guess[2], 0.01);
    }

    #[test]
    fn test_anchored_discount_generates_unit_factor_at_anchor() {
        let shape =
            BoundShape::anchored_discount(0.5, vec![1.0, 2.0], Interpolation::log_linear())
                .unwrap();
        assert_eq!(shape.kind(), "anchored_discount");
        assert_eq!(shape.parameter_count(), 2);

        let guess = shape.initial_guess(&[0.02, 0.03]).unwrap();
        assert_relative_eq!(guess[1], (-0.06_f64).exp(), epsilon = 1e-15);

        let curve = shape.generate("turn", &guess).unwrap();
        assert_relative_eq!(curve.discount_factor(0.5).unwrap(), 1.0, epsilon = 1e-15);
        assert_eq!(curve.number_of_parameters(), 2);
        assert!(BoundShape::anchored_discount(1.0, vec![1.0], Interpolation::linear()).is_err());
    }

    #[test]
    fn test_generate_batch() {
        let shape = zero_2y();
        let sets = vec![vec![0.01, 0.02], vec![0.02, 0.03], vec![0.03, 0.04]];
        let curves = shape.generate_batch("z", &sets, None).unwrap();
        assert_eq!(curves.len(), 3);
        assert_relative_eq!(curves[1].zero_rate(3.0).unwrap(), 0.025, epsilon = 1e-15);

        let bad = vec![vec![0.01]];
        assert!(shape.generate_batch("z", &bad, None).is_err());
    }
}
