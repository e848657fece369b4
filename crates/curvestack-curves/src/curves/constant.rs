//! Constant-rate curve.

use crate::error::CurveResult;
use crate::traits::Curve;

/// A curve with one continuously-compounded zero rate for all times.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCurve {
    name: String,
    rate: f64,
}

impl ConstantCurve {
    /// Creates a constant curve.
    #[must_use]
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }

    /// Returns the rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Curve for ConstantCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, _t: f64) -> CurveResult<f64> {
        Ok(self.rate)
    }

    fn number_of_parameters(&self) -> usize {
        1
    }

    fn zero_rate_parameter_sensitivity(&self, _t: f64) -> CurveResult<Vec<f64>> {
        Ok(vec![1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_curve() {
        let curve = ConstantCurve::new("c", 0.01);
        assert_eq!(curve.zero_rate(0.0).unwrap(), 0.01);
        assert_eq!(curve.zero_rate(50.0).unwrap(), 0.01);
        assert_relative_eq!(
            curve.discount_factor(3.0).unwrap(),
            (-0.03_f64).exp(),
            epsilon = 1e-15
        );
        assert_eq!(curve.zero_rate_parameter_sensitivity(7.0).unwrap(), vec![1.0]);
    }
}
