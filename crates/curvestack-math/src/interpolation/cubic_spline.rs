//! Natural cubic spline interpolation.

use crate::error::MathResult;
use crate::interpolation::{unit, ControlPoints, ExtrapolationMethod, Interpolator, Location};

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second derivatives;
/// the second derivative vanishes at both ends. The spline is linear in the
/// y values, so node sensitivities are the splines through the unit vectors.
/// Their second derivatives are computed once at construction.
///
/// With two points the spline is a straight line; with one it is constant.
///
/// # Example
///
/// ```rust
/// use curvestack_math::interpolation::{CubicSpline, Interpolator};
///
/// let spline = CubicSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap();
/// assert!((spline.interpolate(2.0).unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    points: ControlPoints,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    /// Second derivatives of the spline through each unit vector
    basis_y2s: Vec<Vec<f64>>,
    extrapolation: ExtrapolationMethod,
}

impl CubicSpline {
    /// Creates a natural cubic spline with flat extrapolation.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, if lengths differ or if the
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let points = ControlPoints::new(xs, ys)?;
        let n = points.len();
        let y2s = second_derivatives(&points.xs, &points.ys);
        let basis_y2s = (0..n)
            .map(|k| second_derivatives(&points.xs, &unit(n, k)))
            .collect();
        Ok(Self {
            points,
            y2s,
            basis_y2s,
            extrapolation: ExtrapolationMethod::default(),
        })
    }

    /// Sets the extrapolation rule.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Value and first derivative of the spline through `ys` (second
    /// derivatives `y2s`) at `x`, extrapolation applied.
    fn evaluate(&self, ys: &[f64], y2s: &[f64], x: f64) -> MathResult<(f64, f64)> {
        let xs = &self.points.xs;
        let n = xs.len();
        let boundary = |node: usize, segment: usize| {
            let (value, slope) = segment_value(xs, ys, y2s, segment, xs[node]);
            match self.extrapolation {
                ExtrapolationMethod::Linear => (value + slope * (x - xs[node]), slope),
                _ => (value, 0.0),
            }
        };
        Ok(match self.points.locate(x, self.extrapolation)? {
            Location::Single => (ys[0], 0.0),
            Location::Inside(i) => segment_value(xs, ys, y2s, i, x),
            Location::Below => boundary(0, 0),
            Location::Above => boundary(n - 1, n - 2),
        })
    }
}

/// Value and slope on segment `i`.
fn segment_value(xs: &[f64], ys: &[f64], y2s: &[f64], i: usize, x: f64) -> (f64, f64) {
    let h = xs[i + 1] - xs[i];
    let a = (xs[i + 1] - x) / h;
    let b = (x - xs[i]) / h;

    let value =
        a * ys[i] + b * ys[i + 1] + ((a * a * a - a) * y2s[i] + (b * b * b - b) * y2s[i + 1]) * (h * h) / 6.0;
    let slope = (ys[i + 1] - ys[i]) / h - (3.0 * a * a - 1.0) / 6.0 * h * y2s[i]
        + (3.0 * b * b - 1.0) / 6.0 * h * y2s[i + 1];
    (value, slope)
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(self.evaluate(&self.points.ys, &self.y2s, x)?.0)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(self.evaluate(&self.points.ys, &self.y2s, x)?.1)
    }

    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let n = self.points.len();
        let mut e = vec![0.0; n];
        let mut sens = Vec::with_capacity(n);
        for k in 0..n {
            e[k] = 1.0;
            sens.push(self.evaluate(&e, &self.basis_y2s[k], x)?.0);
            e[k] = 0.0;
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

/// Second derivatives of the natural cubic spline (tridiagonal sweep).
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    if n < 3 {
        return y2s;
    }
    let mut u = vec![0.0; n - 1];

    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let slope_change =
            (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * slope_change / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    y2s[n - 1] = 0.0;
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }
    y2s
}
