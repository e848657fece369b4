//! Interpolation methods for curve construction.
//!
//! Every interpolator is built from sorted control points `(x_i, y_i)` and
//! exposes, besides the interpolated value, the sensitivity of that value to
//! each `y_i`. Curve generators use the latter to report parameter
//! sensitivities without finite differencing.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: piecewise linear
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, for discount factors
//! - [`CubicSpline`]: natural cubic spline
//!
//! | Method | Smoothness | Positive values | Use Case |
//! |--------|------------|-----------------|----------|
//! | Linear | C0 | No | Zero-rate curves |
//! | Log-Linear | C0 | Yes | Discount factor curves |
//! | Cubic Spline | C2 | No | Smooth zero-rate curves |
//!
//! All three accept a single control point, in which case the interpolated
//! function is the constant `y_0` with unit sensitivity.

mod cubic_spline;
mod linear;
mod log_linear;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync + fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns `d interpolate(x) / d y_i` for every control point.
    ///
    /// The returned vector has one entry per control point.
    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns the extrapolation rule applied outside `[min_x, max_x]`.
    fn extrapolation(&self) -> ExtrapolationMethod;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        self.extrapolation() != ExtrapolationMethod::None
    }

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Extrapolation rule outside the control-point range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationMethod {
    /// Return an error outside the range.
    None,
    /// Hold the boundary value.
    #[default]
    Flat,
    /// Continue with the boundary slope.
    Linear,
}

impl fmt::Display for ExtrapolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtrapolationMethod::None => "None",
            ExtrapolationMethod::Flat => "Flat",
            ExtrapolationMethod::Linear => "Linear",
        };
        write!(f, "{name}")
    }
}

/// Interpolation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Piecewise linear.
    #[default]
    Linear,
    /// Linear on the logarithm of the values. Values must be positive.
    LogLinear,
    /// Natural cubic spline.
    CubicSpline,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpolationMethod::Linear => "Linear",
            InterpolationMethod::LogLinear => "Log-Linear",
            InterpolationMethod::CubicSpline => "Cubic Spline",
        };
        write!(f, "{name}")
    }
}

/// Interpolation configuration: algorithm plus extrapolation rule.
///
/// Generators carry one of these and build a fresh interpolator for every
/// parameter vector they are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Interpolation {
    /// Interpolation algorithm.
    pub method: InterpolationMethod,
    /// Extrapolation rule.
    #[serde(default)]
    pub extrapolation: ExtrapolationMethod,
}

impl Interpolation {
    /// Creates a configuration.
    #[must_use]
    pub fn new(method: InterpolationMethod, extrapolation: ExtrapolationMethod) -> Self {
        Self {
            method,
            extrapolation,
        }
    }

    /// Linear interpolation with flat extrapolation.
    #[must_use]
    pub fn linear() -> Self {
        Self::new(InterpolationMethod::Linear, ExtrapolationMethod::Flat)
    }

    /// Log-linear interpolation with linear (log-space) extrapolation.
    #[must_use]
    pub fn log_linear() -> Self {
        Self::new(InterpolationMethod::LogLinear, ExtrapolationMethod::Linear)
    }

    /// Natural cubic spline with flat extrapolation.
    #[must_use]
    pub fn cubic_spline() -> Self {
        Self::new(InterpolationMethod::CubicSpline, ExtrapolationMethod::Flat)
    }

    /// Returns a copy with a different extrapolation rule.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Builds an interpolator over the given control points.
    pub fn build(&self, xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Box<dyn Interpolator>> {
        Ok(match self.method {
            InterpolationMethod::Linear => Box::new(
                LinearInterpolator::new(xs, ys)?.with_extrapolation(self.extrapolation),
            ),
            InterpolationMethod::LogLinear => Box::new(
                LogLinearInterpolator::new(xs, ys)?.with_extrapolation(self.extrapolation),
            ),
            InterpolationMethod::CubicSpline => {
                Box::new(CubicSpline::new(xs, ys)?.with_extrapolation(self.extrapolation))
            }
        })
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} extrapolation)", self.method, self.extrapolation)
    }
}

/// Where a query point falls relative to the control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// Only one control point exists.
    Single,
    /// Left of the first point.
    Below,
    /// Inside segment `[x_i, x_{i+1}]`.
    Inside(usize),
    /// Right of the last point.
    Above,
}

/// Validated control points shared by the interpolators.
#[derive(Debug, Clone)]
pub(crate) struct ControlPoints {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
}

impl ControlPoints {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("control points must be finite"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
        Ok(Self { xs, ys })
    }

    pub(crate) fn len(&self) -> usize {
        self.xs.len()
    }

    pub(crate) fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Locates `x`, failing if it lies outside the range and extrapolation
    /// is forbidden.
    pub(crate) fn locate(&self, x: f64, extrapolation: ExtrapolationMethod) -> MathResult<Location> {
        let n = self.xs.len();
        let outside = x < self.min_x() || x > self.max_x();
        if outside && extrapolation == ExtrapolationMethod::None {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        if n == 1 {
            return Ok(Location::Single);
        }
        if x < self.min_x() {
            return Ok(Location::Below);
        }
        if x > self.max_x() {
            return Ok(Location::Above);
        }
        let i = match self
            .xs
            .binary_search_by(|node| node.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(n - 2),
            Err(i) => i.saturating_sub(1).min(n - 2),
        };
        Ok(Location::Inside(i))
    }

    /// Relative position of `x` in segment `i`; may lie outside `[0, 1]`
    /// when extrapolating along a boundary segment.
    pub(crate) fn weight(&self, i: usize, x: f64) -> f64 {
        (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

/// Unit vector of length `n` with a one at `i`.
pub(crate) fn unit(n: usize, i: usize) -> Vec<f64> {
    let mut v = vec![0.0; n];
    v[i] = 1.0;
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_interpolators_through_points() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::CubicSpline,
        ] {
            let interp = Interpolation::new(method, ExtrapolationMethod::Flat)
                .build(times.clone(), rates.clone())
                .unwrap();
            for (t, r) in times.iter().zip(rates.iter()) {
                assert_relative_eq!(interp.interpolate(*t).unwrap(), *r, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_sensitivities_at_nodes_are_unit_vectors() {
        let xs = vec![1.0, 2.0, 4.0, 7.0];
        let ys = vec![0.01, 0.015, 0.02, 0.022];

        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::CubicSpline,
        ] {
            let interp = Interpolation::new(method, ExtrapolationMethod::Flat)
                .build(xs.clone(), ys.clone())
                .unwrap();
            for (i, x) in xs.iter().enumerate() {
                let sens = interp.node_sensitivity(*x).unwrap();
                for (j, s) in sens.iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(*s, expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_sensitivity_matches_finite_difference() {
        let xs = vec![0.5, 1.0, 3.0, 6.0, 10.0];
        let ys = vec![0.98, 0.96, 0.90, 0.80, 0.70];
        let bump = 1e-7;

        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::CubicSpline,
        ] {
            for extrapolation in [ExtrapolationMethod::Flat, ExtrapolationMethod::Linear] {
                let config = Interpolation::new(method, extrapolation);
                let base = config.build(xs.clone(), ys.clone()).unwrap();
                for x in [0.2, 0.75, 2.0, 8.5, 12.0] {
                    let sens = base.node_sensitivity(x).unwrap();
                    for k in 0..ys.len() {
                        let mut bumped_ys = ys.clone();
                        bumped_ys[k] += bump;
                        let bumped = config.build(xs.clone(), bumped_ys).unwrap();
                        let fd = (bumped.interpolate(x).unwrap() - base.interpolate(x).unwrap())
                            / bump;
                        assert_relative_eq!(sens[k], fd, epsilon = 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_point_is_constant() {
        for method in [
            InterpolationMethod::Linear,
            InterpolationMethod::LogLinear,
            InterpolationMethod::CubicSpline,
        ] {
            let interp = Interpolation::new(method, ExtrapolationMethod::Flat)
                .build(vec![2.0], vec![0.5])
                .unwrap();
            assert_relative_eq!(interp.interpolate(0.1).unwrap(), 0.5);
            assert_relative_eq!(interp.interpolate(9.0).unwrap(), 0.5);
            assert_eq!(interp.derivative(9.0).unwrap(), 0.0);
            assert_eq!(interp.node_sensitivity(9.0).unwrap(), vec![1.0]);
        }
    }

    #[test]
    fn test_no_extrapolation() {
        let interp = Interpolation::linear()
            .with_extrapolation(ExtrapolationMethod::None)
            .build(vec![1.0, 2.0], vec![1.0, 2.0])
            .unwrap();
        assert!(!interp.allows_extrapolation());
        assert!(matches!(
            interp.interpolate(3.0),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert!(interp.node_sensitivity(0.5).is_err());
    }

    #[test]
    fn test_rejects_bad_control_points() {
        let config = Interpolation::linear();
        assert!(config.build(vec![], vec![]).is_err());
        assert!(config.build(vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
        assert!(config.build(vec![1.0, 2.0], vec![0.0]).is_err());
        assert!(config.build(vec![1.0, 2.0], vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_interpolation_serde() {
        let config = Interpolation::log_linear();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"method":"log_linear","extrapolation":"linear"}"#);

        let parsed: Interpolation = serde_json::from_str(r#"{"method":"cubic_spline"}"#).unwrap();
        assert_eq!(parsed, Interpolation::cubic_spline());
    }
}
