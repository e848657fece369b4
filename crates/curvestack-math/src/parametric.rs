//! Parametric zero-rate functions.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Below this `t/τ` the loadings are evaluated by their Taylor expansion.
const SMALL_X: f64 = 1e-10;

/// Nelson-Siegel zero-rate function.
///
/// ```text
/// z(t) = β₀ + β₁ f₁(t/τ) + β₂ (f₁(t/τ) - e^(-t/τ)),   f₁(x) = (1 - e^(-x)) / x
/// ```
///
/// - β₀: long-term level
/// - β₀ + β₁: instantaneous short rate
/// - β₂: hump (β₂ > 0) or trough (β₂ < 0)
/// - τ: decay, must be positive
///
/// # Example
///
/// ```rust
/// use curvestack_math::parametric::NelsonSiegel;
///
/// let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
/// assert!(ns.zero_rate(0.25) < ns.zero_rate(30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelsonSiegel {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    tau: f64,
}

impl NelsonSiegel {
    /// Number of parameters `[β₀, β₁, β₂, τ]`.
    pub const PARAMETER_COUNT: usize = 4;

    /// Creates a Nelson-Siegel function.
    ///
    /// # Errors
    ///
    /// Returns an error if tau is not positive or any parameter is not finite.
    pub fn new(beta0: f64, beta1: f64, beta2: f64, tau: f64) -> MathResult<Self> {
        if ![beta0, beta1, beta2, tau].iter().all(|p| p.is_finite()) {
            return Err(MathError::invalid_input(
                "Nelson-Siegel parameters must be finite",
            ));
        }
        if tau <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "tau must be positive, got {tau}"
            )));
        }
        Ok(Self {
            beta0,
            beta1,
            beta2,
            tau,
        })
    }

    /// Creates the function from a `[β₀, β₁, β₂, τ]` slice.
    pub fn from_parameters(parameters: &[f64]) -> MathResult<Self> {
        match *parameters {
            [beta0, beta1, beta2, tau] => Self::new(beta0, beta1, beta2, tau),
            _ => Err(MathError::invalid_input(format!(
                "Nelson-Siegel needs {} parameters, got {}",
                Self::PARAMETER_COUNT,
                parameters.len()
            ))),
        }
    }

    /// Returns the parameters as `[β₀, β₁, β₂, τ]`.
    pub fn parameters(&self) -> [f64; 4] {
        [self.beta0, self.beta1, self.beta2, self.tau]
    }

    /// Zero rate at time t. For `t <= 0` this is the short rate `β₀ + β₁`.
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x = t / self.tau;
        self.beta0 + self.beta1 * loading_1(x) + self.beta2 * loading_2(x)
    }

    /// Instantaneous forward rate `β₀ + β₁ e^(-x) + β₂ x e^(-x)`.
    pub fn forward_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x = t / self.tau;
        let exp_x = (-x).exp();
        self.beta0 + self.beta1 * exp_x + self.beta2 * x * exp_x
    }

    /// Gradient of the zero rate at `t` with respect to `[β₀, β₁, β₂, τ]`.
    pub fn parameter_gradient(&self, t: f64) -> [f64; 4] {
        if t <= 0.0 {
            return [1.0, 1.0, 0.0, 0.0];
        }
        let x = t / self.tau;
        if x < SMALL_X {
            return [1.0, loading_1(x), loading_2(x), 0.0];
        }
        let exp_x = (-x).exp();
        let f1 = loading_1(x);
        let df1_dx = exp_x / x - f1 / x;
        let dx_dtau = -x / self.tau;
        let dz_dtau = (self.beta1 * df1_dx + self.beta2 * (df1_dx + exp_x)) * dx_dtau;
        [1.0, f1, f1 - exp_x, dz_dtau]
    }
}

/// `(1 - e^(-x)) / x`
fn loading_1(x: f64) -> f64 {
    if x.abs() < SMALL_X {
        1.0 - x / 2.0
    } else {
        (1.0 - (-x).exp()) / x
    }
}

/// `(1 - e^(-x)) / x - e^(-x)`
fn loading_2(x: f64) -> f64 {
    if x.abs() < SMALL_X {
        x / 2.0
    } else {
        loading_1(x) - (-x).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_limits() {
        let ns = NelsonSiegel::new(0.04, -0.02, 0.01, 1.5).unwrap();
        assert_relative_eq!(ns.zero_rate(0.0), 0.02, epsilon = 1e-15);
        assert_relative_eq!(ns.zero_rate(1e-12), 0.02, epsilon = 1e-10);
        assert_relative_eq!(ns.zero_rate(1e4), 0.04, epsilon = 1e-3);
    }

    #[test]
    fn test_rejects_non_positive_tau() {
        assert!(NelsonSiegel::new(0.04, -0.02, 0.01, 0.0).is_err());
        assert!(NelsonSiegel::new(0.04, -0.02, 0.01, -1.0).is_err());
        assert!(NelsonSiegel::from_parameters(&[0.04, -0.02, 0.01]).is_err());
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let params = [0.035, -0.015, 0.02, 2.5];
        let ns = NelsonSiegel::from_parameters(&params).unwrap();
        let bump = 1e-7;
        for t in [0.25, 1.0, 4.0, 12.0, 30.0] {
            let grad = ns.parameter_gradient(t);
            for k in 0..4 {
                let mut up = params;
                up[k] += bump;
                let mut down = params;
                down[k] -= bump;
                let fd = (NelsonSiegel::from_parameters(&up).unwrap().zero_rate(t)
                    - NelsonSiegel::from_parameters(&down).unwrap().zero_rate(t))
                    / (2.0 * bump);
                assert_relative_eq!(grad[k], fd, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_forward_consistent_with_zero() {
        // f(t) = z(t) + t z'(t)
        let ns = NelsonSiegel::new(0.04, -0.02, 0.015, 2.0).unwrap();
        let t = 3.0;
        let h = 1e-6;
        let dz = (ns.zero_rate(t + h) - ns.zero_rate(t - h)) / (2.0 * h);
        assert_relative_eq!(ns.forward_rate(t), ns.zero_rate(t) + t * dz, epsilon = 1e-8);
    }
}
