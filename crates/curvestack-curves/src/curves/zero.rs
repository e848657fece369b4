//! Interpolated zero-rate curve.

use curvestack_math::interpolation::{Interpolation, Interpolator};

use super::{check_lengths, validate_node_times};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Zero-rate curve interpolated between node points.
///
/// An anchored curve carries one extra control point whose value is fixed at
/// zero. The anchor is not a parameter: it is excluded from
/// [`number_of_parameters`](Curve::number_of_parameters) and from the
/// sensitivity vector.
#[derive(Debug)]
pub struct InterpolatedZeroCurve {
    name: String,
    /// Control point times, anchor included
    times: Vec<f64>,
    /// Control point rates, anchor included
    rates: Vec<f64>,
    anchor_index: Option<usize>,
    interpolation: Interpolation,
    interpolator: Box<dyn Interpolator>,
}

impl InterpolatedZeroCurve {
    /// Creates a curve through `(nodes[i], rates[i])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes are not strictly increasing or the
    /// lengths differ.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<f64>,
        rates: Vec<f64>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        validate_node_times(&nodes)?;
        check_lengths(&nodes, &rates)?;
        Self::build(name.into(), nodes, rates, None, interpolation)
    }

    /// Creates a curve through the real nodes plus a zero-valued node at
    /// `anchor`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonMonotonicNodes`] if the anchor coincides with
    /// a real node, and the errors of [`new`](Self::new) otherwise.
    pub fn anchored(
        name: impl Into<String>,
        anchor: f64,
        nodes: &[f64],
        rates: &[f64],
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        if nodes.len() != rates.len() {
            return Err(CurveError::parameter_count_mismatch(nodes.len(), rates.len()));
        }
        let (times, anchor_index) = insert_anchor(anchor, nodes)?;
        let mut values = rates.to_vec();
        values.insert(anchor_index, 0.0);
        Self::build(name.into(), times, values, Some(anchor_index), interpolation)
    }

    fn build(
        name: String,
        times: Vec<f64>,
        rates: Vec<f64>,
        anchor_index: Option<usize>,
        interpolation: Interpolation,
    ) -> CurveResult<Self> {
        let interpolator = interpolation.build(times.clone(), rates.clone())?;
        Ok(Self {
            name,
            times,
            rates,
            anchor_index,
            interpolation,
            interpolator,
        })
    }

    /// Returns the control point times, anchor included.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the control point rates, anchor included.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Returns the anchor time, if the curve is anchored.
    #[must_use]
    pub fn anchor(&self) -> Option<f64> {
        self.anchor_index.map(|i| self.times[i])
    }

    /// Returns the interpolation configuration.
    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

impl Curve for InterpolatedZeroCurve {
    fn name(&self) -> &str {
        &self.name
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    fn number_of_parameters(&self) -> usize {
        self.times.len() - usize::from(self.anchor_index.is_some())
    }

    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>> {
        let mut sens = self.interpolator.node_sensitivity(t)?;
        if let Some(i) = self.anchor_index {
            sens.remove(i);
        }
        Ok(sens)
    }
}

/// Inserts `anchor` into sorted `nodes`, returning the merged times and the
/// anchor position.
pub(crate) fn insert_anchor(anchor: f64, nodes: &[f64]) -> CurveResult<(Vec<f64>, usize)> {
    validate_node_times(nodes)?;
    if !anchor.is_finite() {
        return Err(CurveError::invalid_input(format!(
            "anchor time must be finite, got {anchor}"
        )));
    }
    let index = nodes.partition_point(|t| *t < anchor);
    if let Some(&collision) = nodes.get(index).filter(|t| **t == anchor) {
        return Err(CurveError::NonMonotonicNodes {
            index,
            prev: anchor,
            current: collision,
        });
    }
    let mut times = nodes.to_vec();
    times.insert(index, anchor);
    Ok((times, index))
}
