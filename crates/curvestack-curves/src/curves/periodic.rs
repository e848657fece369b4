//! Periodically-compounded zero-rate curve.

use curvestack_math::interpolation::{Interpolation, Interpolator};

use super::{check_lengths, validate_node_times};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Curve whose node values are zero rates compounded `m` times per year.
///
/// For an interpolated periodic rate `r`:
///
/// ```text
/// DF(t)          = (1 + r/m)^(-m t)
/// zero_rate(t)   = m ln(1 + r/m)
/// d zero / d r   = 1 / (1 + r/m)
/// ```
#[derive(Debug)]
pub struct PeriodicZeroCurve {
    name: String,
    times: Vec<f64>,
    rates: Vec<f64>,
    periods_per_year: u32,
    interpolator: Box<dyn Interpolator>,
}

impl PeriodicZeroCurve {
    /// Creates a curve through `(nodes[i], rates[i])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes are not strictly increasing, the lengths
    /// differ or `periods_per_year` is zero.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<f64>,
        rates: Vec<f64>,
        periods_per_year: u32,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        if periods_per_year == 0 {
            return Err(CurveError::invalid_input(
                "compounding periods per year must be at least 1",
            ));
        }
        validate_node_times(&nodes)?;
        check_lengths(&nodes, &rates)?;
        let interpolator = interpolation.build(nodes.clone(), rates.clone())?;
        Ok(Self {
            name: name.into(),
            times: nodes,
            rates,
            periods_per_year,
            interpolator,
        })
    }

    /// Returns the compounding frequency.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// Returns the node times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the node rates.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Returns `1 + r(t)/m`.
    fn growth(&self, t: f64) -> CurveResult<f64> {
        let m = f64::from(self.periods_per_year);
        let growth = 1.0 + self.interpolator.interpolate(t)? / m;
        if growth <= 0.0 {
            return Err(CurveError::invalid_input(format!(
                "periodic rate at t={t} is below -{m}"
            )));
        }
        Ok(growth)
    }
}

impl Curve for PeriodicZeroCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(f64::from(self.periods_per_year) * self.growth(t)?.ln())
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let m = f64::from(self.periods_per_year);
        Ok(self.growth(t)?.powf(-m * t))
    }

    fn number_of_parameters(&self) -> usize {
        self.times.len()
    }

    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        let growth = self.growth(t)?;
        Ok(self
            .interpolator
            .node_sensitivity(t)?
            .into_iter()
            .map(|s| s / growth)
            .collect())
    }
}
