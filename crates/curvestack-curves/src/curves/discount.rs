//! Interpolated discount-factor curve.

use curvestack_math::interpolation::{Interpolation, Interpolator};

use super::{check_lengths, insert_anchor, validate_node_times};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Zero rates at or before this time are evaluated here.
const MIN_TIME: f64 = 1e-8;

/// Curve whose parameters are discount factors at node points.
///
/// The zero rate is `-ln(DF(t)) / t`, evaluated at `max(t, 1e-8)`. An
/// anchored curve carries one extra control point with a discount factor of
/// one, which is not a parameter.
#[derive(Debug)]
pub struct InterpolatedDiscountCurve {
    name: String,
    /// Control point times, anchor included
    times: Vec<f64>,
    /// Control point discount factors, anchor included
    discount_factors: Vec<f64>,
    anchor_index: Option<usize>,
    interpolator: Box<dyn Interpolator>,
}

impl InterpolatedDiscountCurve {
    /// Creates a curve through `(nodes[i], discount_factors[i])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes are not strictly increasing, the lengths
    /// differ or a discount factor is not positive.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<f64>,
        discount_factors: Vec<f64>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        validate_node_times(&nodes)?;
        check_lengths(&nodes, &discount_factors)?;
        Self::build(name.into(), nodes, discount_factors, None, interpolation)
    }

    /// Creates a curve through the real nodes plus a node at `anchor` whose
    /// discount factor is one.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonMonotonicNodes`] if the anchor coincides with
    /// a real node, and the errors of [`new`](Self::new) otherwise.
    pub fn anchored(
        name: impl Into<String>,
        anchor: f64,
        nodes: &[f64],
        discount_factors: &[f64],
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        if nodes.len() != discount_factors.len() {
            return Err(CurveError::parameter_count_mismatch(
                nodes.len(),
                discount_factors.len(),
            ));
        }
        let (times, anchor_index) = insert_anchor(anchor, nodes)?;
        let mut values = discount_factors.to_vec();
        values.insert(anchor_index, 1.0);
        Self::build(name.into(), times, values, Some(anchor_index), interpolation)
    }

    fn build(
        name: String,
        times: Vec<f64>,
        discount_factors: Vec<f64>,
        anchor_index: Option<usize>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        if let Some(bad) = discount_factors.iter().find(|df| **df <= 0.0) {
            return Err(CurveError::invalid_input(format!(
                "discount factors must be positive, got {bad}"
            )));
        }
        let interpolator = interpolation.build(times.clone(), discount_factors.clone())?;
        Ok(Self {
            name,
            times,
            discount_factors,
            anchor_index,
            interpolator,
        })
    }

    /// Returns the control point times, anchor included.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the control point discount factors, anchor included.
    #[must_use]
    pub fn discount_factors(&self) -> &[f64] {
        &self.discount_factors
    }

    /// Returns the anchor time, if the curve is anchored.
    #[must_use]
    pub fn anchor(&self) -> Option<f64> {
        self.anchor_index.map(|i| self.times[i])
    }
}

impl Curve for InterpolatedDiscountCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        let t = t.max(MIN_TIME);
        Ok(-self.interpolator.interpolate(t)?.ln() / t)
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    fn number_of_parameters(&self) -> usize {
        self.times.len() - usize::from(self.anchor_index.is_some())
    }

    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        let t = t.max(MIN_TIME);
        let df = self.interpolator.interpolate(t)?;
        let scale = -1.0 / (t * df);
        let mut sens: Vec<f64> = self
            .interpolator
            .node_sensitivity(t)?
            .into_iter()
            .map(|s| s * scale)
            .collect();
        if let Some(i) = self.anchor_index {
            sens.remove(i);
        }
        Ok(sens)
    }
}
