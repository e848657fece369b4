//! Spread curves: signed sums of other curves' zero rates.
//!
//! A [`SpreadCurve`] owns its component curves. Components produced by a
//! generator carry parameters; components taken from an existing registry or
//! supplied at construction are frozen and contribute only their value.

use std::fmt;

use crate::error::{CurveError, CurveResult};
use crate::traits::{Curve, CurveRef};

/// How a component enters the sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpreadSign {
    /// z(t) += z_i(t)
    #[default]
    Add,
    /// z(t) -= z_i(t)
    Subtract,
}

impl SpreadSign {
    /// Sign of the first component followed by `subtract` for the rest.
    ///
    /// Stacks add their first member and add or subtract all others.
    #[must_use]
    pub fn for_position(position: usize, subtract: bool) -> Self {
        if position > 0 && subtract {
            Self::Subtract
        } else {
            Self::Add
        }
    }

    /// Returns +1 or -1.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Add => 1.0,
            Self::Subtract => -1.0,
        }
    }
}

impl fmt::Display for SpreadSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Subtract => write!(f, "-"),
        }
    }
}

/// One term of a spread curve.
#[derive(Debug, Clone)]
pub struct SpreadComponent {
    curve: CurveRef,
    sign: SpreadSign,
    frozen: bool,
}

impl SpreadComponent {
    /// A component whose parameters belong to the spread curve.
    #[must_use]
    pub fn generated(curve: CurveRef, sign: SpreadSign) -> Self {
        Self {
            curve,
            sign,
            frozen: false,
        }
    }

    /// A component that contributes its value but no parameters.
    #[must_use]
    pub fn frozen(curve: CurveRef, sign: SpreadSign) -> Self {
        Self {
            curve,
            sign,
            frozen: true,
        }
    }

    /// Returns the component curve.
    #[must_use]
    pub fn curve(&self) -> &CurveRef {
        &self.curve
    }

    /// Returns the sign.
    #[must_use]
    pub fn sign(&self) -> SpreadSign {
        self.sign
    }

    /// Returns true if the component carries no parameters.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

/// Curve whose zero rate is the signed sum of its components' zero rates.
///
/// Parameters are the concatenation of the non-frozen components'
/// parameters, in component order.
#[derive(Debug, Clone)]
pub struct SpreadCurve {
    name: String,
    components: Vec<SpreadComponent>,
}

impl SpreadCurve {
    /// Creates a spread curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is empty.
    pub fn new(name: impl Into<String>, components: Vec<SpreadComponent>) -> CurveResult<Self> {
        if components.is_empty() {
            return Err(CurveError::invalid_input(
                "a spread curve needs at least one component",
            ));
        }
        Ok(Self {
            name: name.into(),
            components,
        })
    }

    /// Returns the components.
    #[must_use]
    pub fn components(&self) -> &[SpreadComponent] {
        &self.components
    }
}

impl Curve for SpreadCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        self.components.iter().try_fold(0.0, |acc, c| {
            Ok(acc + c.sign.factor() * c.curve.zero_rate(t)?)
        })
    }

    fn number_of_parameters(&self) -> usize {
        self.components
            .iter()
            .filter(|c| !c.frozen)
            .map(|c| c.curve.number_of_parameters())
            .sum()
    }

    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        let mut sens = Vec::with_capacity(self.number_of_parameters());
        for component in self.components.iter().filter(|c| !c.frozen) {
            let factor = component.sign.factor();
            sens.extend(
                component
                    .curve
                    .zero_rate_parameter_sensitivity(t)?
                    .into_iter()
                    .map(|s| factor * s),
            );
        }
        Ok(sens)
    }

    /// Names of all component curves, frozen ones included.
    fn underlying_curve_names(&self) -> Vec<String> {
        self.components
            .iter()
            .map(|c| c.curve.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::curves::{ConstantCurve, InterpolatedZeroCurve};
    use approx::assert_relative_eq;
    use curvestack_math::interpolation::Interpolation;

    fn zero_curve(name: &str) -> CurveRef {
        Arc::new(
            InterpolatedZeroCurve::new(name, vec![1.0, 5.0], vec![0.02, 0.03], Interpolation::linear())
                .unwrap(),
        )
    }

    #[test]
    fn test_sum_and_difference() {
        let fixed: CurveRef = Arc::new(ConstantCurve::new("fixed", 0.01));

        let sum = SpreadCurve::new(
            "sum",
            vec![
                SpreadComponent::generated(zero_curve("sum-0"), SpreadSign::Add),
                SpreadComponent::frozen(fixed.clone(), SpreadSign::Add),
            ],
        )
        .unwrap();
        assert_relative_eq!(sum.zero_rate(1.0).unwrap(), 0.03, epsilon = 1e-15);

        let diff = SpreadCurve::new(
            "diff",
            vec![
                SpreadComponent::generated(zero_curve("diff-0"), SpreadSign::Add),
                SpreadComponent::frozen(fixed, SpreadSign::Subtract),
            ],
        )
        .unwrap();
        assert_relative_eq!(diff.zero_rate(1.0).unwrap(), 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_frozen_components_have_no_parameters() {
        let curve = SpreadCurve::new(
            "s",
            vec![
                SpreadComponent::frozen(zero_curve("base"), SpreadSign::Add),
                SpreadComponent::generated(Arc::new(ConstantCurve::new("s-0", 0.001)), SpreadSign::Subtract),
            ],
        )
        .unwrap();
        assert_eq!(curve.number_of_parameters(), 1);
        assert_eq!(curve.zero_rate_parameter_sensitivity(3.0).unwrap(), vec![-1.0]);
        assert_eq!(curve.underlying_curve_names(), vec!["base", "s-0"]);
    }

    #[test]
    fn test_discount_factor_is_product() {
        let a = zero_curve("a");
        let b: CurveRef = Arc::new(ConstantCurve::new("b", 0.005));
        let curve = SpreadCurve::new(
            "s",
            vec![
                SpreadComponent::generated(a.clone(), SpreadSign::Add),
                SpreadComponent::generated(b.clone(), SpreadSign::Add),
            ],
        )
        .unwrap();
        let t = 2.5;
        assert_relative_eq!(
            curve.discount_factor(t).unwrap(),
            a.discount_factor(t).unwrap() * b.discount_factor(t).unwrap(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(SpreadCurve::new("s", Vec::new()).is_err());
    }

    #[test]
    fn test_sign_for_position() {
        assert_eq!(SpreadSign::for_position(0, true), SpreadSign::Add);
        assert_eq!(SpreadSign::for_position(1, true), SpreadSign::Subtract);
        assert_eq!(SpreadSign::for_position(1, false), SpreadSign::Add);
    }
}
