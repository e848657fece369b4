//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{ControlPoints, ExtrapolationMethod, Interpolator, Location};

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use curvestack_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    points: ControlPoints,
    extrapolation: ExtrapolationMethod,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator with flat extrapolation.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, if lengths differ or if the
    /// x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            points: ControlPoints::new(xs, ys)?,
            extrapolation: ExtrapolationMethod::default(),
        })
    }

    /// Sets the extrapolation rule.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Segment used for evaluation, or the node held flat.
    fn resolve(&self, x: f64) -> MathResult<Resolved> {
        let n = self.points.len();
        Ok(match self.points.locate(x, self.extrapolation)? {
            Location::Single => Resolved::Node(0),
            Location::Inside(i) => Resolved::Segment(i),
            Location::Below => match self.extrapolation {
                ExtrapolationMethod::Linear => Resolved::Segment(0),
                _ => Resolved::Node(0),
            },
            Location::Above => match self.extrapolation {
                ExtrapolationMethod::Linear => Resolved::Segment(n - 2),
                _ => Resolved::Node(n - 1),
            },
        })
    }
}

enum Resolved {
    Node(usize),
    Segment(usize),
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let ys = &self.points.ys;
        Ok(match self.resolve(x)? {
            Resolved::Node(i) => ys[i],
            Resolved::Segment(i) => {
                let w = self.points.weight(i, x);
                ys[i] + w * (ys[i + 1] - ys[i])
            }
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let (xs, ys) = (&self.points.xs, &self.points.ys);
        Ok(match self.resolve(x)? {
            Resolved::Node(_) => 0.0,
            Resolved::Segment(i) => (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]),
        })
    }

    fn node_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        let mut sens = vec![0.0; self.points.len()];
        match self.resolve(x)? {
            Resolved::Node(i) => sens[i] = 1.0,
            Resolved::Segment(i) => {
                let w = self.points.weight(i, x);
                sens[i] = 1.0 - w;
                sens[i + 1] = w;
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_midpoint() {
        let interp = LinearInterpolator::new(vec![1.0, 5.0], vec![0.02, 0.03]).unwrap();
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 0.025, epsilon = 1e-15);
        assert_relative_eq!(interp.derivative(3.0).unwrap(), 0.0025, epsilon = 1e-15);
    }

    #[test]
    fn test_flat_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![1.0, 3.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 1.0);
        assert_relative_eq!(interp.interpolate(10.0).unwrap(), 3.0);
        assert_eq!(interp.derivative(10.0).unwrap(), 0.0);
        assert_eq!(interp.node_sensitivity(10.0).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_linear_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![1.0, 3.0])
            .unwrap()
            .with_extrapolation(ExtrapolationMethod::Linear);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), -1.0, epsilon = 1e-12);

        let sens = interp.node_sensitivity(3.0).unwrap();
        assert_relative_eq!(sens[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(sens[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sensitivity_sums_to_one() {
        let interp =
            LinearInterpolator::new(vec![0.5, 1.0, 2.0, 5.0], vec![0.01, 0.02, 0.025, 0.03])
                .unwrap();
        for x in [0.6, 1.5, 4.2] {
            let total: f64 = interp.node_sensitivity(x).unwrap().iter().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-14);
        }
    }
}
