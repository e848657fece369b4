//! Nelson-Siegel curve.

use curvestack_math::parametric::NelsonSiegel;
use curvestack_math::MathError;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Curve defined by the Nelson-Siegel zero-rate function.
///
/// Parameters are `[β₀, β₁, β₂, τ]`; sensitivities are analytic.
#[derive(Debug, Clone, PartialEq)]
pub struct NelsonSiegelCurve {
    name: String,
    function: NelsonSiegel,
}

impl NelsonSiegelCurve {
    /// Creates a curve from a Nelson-Siegel function.
    #[must_use]
    pub fn new(name: impl Into<String>, function: NelsonSiegel) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    /// Creates a curve from `[β₀, β₁, β₂, τ]`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidInput`] if `τ <= 0` or the slice does not
    /// hold exactly four values.
    pub fn from_parameters(name: impl Into<String>, parameters: &[f64]) -> CurveResult<Self> {
        let function = NelsonSiegel::from_parameters(parameters).map_err(|err| match err {
            MathError::InvalidInput { reason } => CurveError::InvalidInput { reason },
            other => other.into(),
        })?;
        Ok(Self::new(name, function))
    }

    /// Returns the underlying function.
    #[must_use]
    pub fn function(&self) -> &NelsonSiegel {
        &self.function
    }
}

impl Curve for NelsonSiegelCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.function.zero_rate(t))
    }

    fn number_of_parameters(&self) -> usize {
        NelsonSiegel::PARAMETER_COUNT
    }

    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        Ok(self.function.parameter_gradient(t).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_and_long_end() {
        let curve = NelsonSiegelCurve::from_parameters("ns", &[0.04, -0.01, 0.0, 2.0]).unwrap();
        assert_relative_eq!(curve.zero_rate(0.0).unwrap(), 0.03, epsilon = 1e-15);
        assert!(curve.zero_rate(30.0).unwrap() > curve.zero_rate(1.0).unwrap());
        assert_eq!(curve.number_of_parameters(), 4);
        assert_eq!(curve.zero_rate_parameter_sensitivity(5.0).unwrap().len(), 4);
    }

    #[test]
    fn test_invalid_tau() {
        let result = NelsonSiegelCurve::from_parameters("ns", &[0.04, -0.01, 0.0, 0.0]);
        assert!(matches!(result, Err(CurveError::InvalidInput { .. })));
    }
}
