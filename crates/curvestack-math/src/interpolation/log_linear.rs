//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values, which keeps discount factors positive
//! and gives piecewise constant forward rates.

use crate::error::{MathError, MathResult};
use crate::interpolation::{ControlPoints, ExtrapolationMethod, Interpolator, Location};

/// Log-linear interpolation between data points.
///
/// ```text
/// y(x) = exp((1 - w) ln y_i + w ln y_{i+1}),  w = (x - x_i) / (x_{i+1} - x_i)
/// ```
///
/// so `dy/dy_i = y (1 - w) / y_i` and `dy/dy_{i+1} = y w / y_{i+1}`.
///
/// # Example
///
/// ```rust
/// use curvestack_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let interp = LogLinearInterpolator::new(
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.97, 0.94, 0.91],
/// ).unwrap();
/// assert!(interp.interpolate(1.5).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    points: ControlPoints,
    /// Precomputed ln(y) values
    log_ys: Vec<f64>,
    extrapolation: ExtrapolationMethod,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator with flat extrapolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the control points are invalid or any y value is
    /// non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let points = ControlPoints::new(xs, ys)?;
        if let Some(bad) = points.ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {bad}"
            )));
        }
        let log_ys = points.ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            points,
            log_ys,
            extrapolation: ExtrapolationMethod::default(),
        })
    }

    /// Sets the extrapolation rule. Linear extrapolation is linear in log space.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    fn resolve(&self, x: f64) -> MathResult<Resolved> {
        let n = self.points.len();
        let linear = self.extrapolation == ExtrapolationMethod::Linear;
        let segment = |i: usize| Resolved::Segment(i, self.points.weight(i, x));
        Ok(match self.points.locate(x, self.extrapolation)? {
            Location::Single => Resolved::Node(0),
            Location::Inside(i) => segment(i),
            Location::Below if linear => segment(0),
            Location::Below => Resolved::Node(0),
            Location::Above if linear => segment(n - 2),
            Location::Above => Resolved::Node(n - 1),
        })
    }

    fn log_value(&self, i: usize, w: f64) -> f64 {
        (1.0 - w) * self.log_ys[i] + w * self.log_ys[i + 1]
    }
}

/// Segment with weight, or the node held flat.
enum Resolved {
    Node(usize),
    Segment(usize, f64),
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(match self.resolve(x)? {
            Resolved::Node(node) => self.points.ys[node],
            Resolved::Segment(i, w) => self.log_value(i, w).exp(),
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(match self.resolve(x)? {
            Resolved::Node(_) => 0.0,
            Resolved::Segment(i, w) => {
                let y = self.log_value(i, w).exp();
                let h = self.points.xs[i + 1] - self.points.xs[i];
                y * (self.log_ys[i + 1] - self.log_ys[i]) / h
            }
        })
    }

    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let mut sens = vec![0.0; self.points.len()];
        match self.resolve(x)? {
            Resolved::Node(node) => sens[node] = 1.0,
            Resolved::Segment(i, w) => {
                let y = self.log_value(i, w).exp();
                sens[i] = y * (1.0 - w) / self.points.ys[i];
                sens[i + 1] = y * w / self.points.ys[i + 1];
            }
        }
        Ok(sens)
    }

    fn extrapolation(&self) -> ExtrapolationMethod {
        self.extrapolation
    }

    fn min_x(&self) -> f64 {
        self.points.min_x()
    }

    fn max_x(&self) -> f64 {
        self.points.max_x()
    }
}
