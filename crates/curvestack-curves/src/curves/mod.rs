//! Concrete curve implementations.
//!
//! These are the artifacts produced by the generators:
//!
//! - [`ConstantCurve`]: a single continuously-compounded rate
//! - [`InterpolatedZeroCurve`]: interpolated zero rates, optionally pinned to
//!   zero at an anchor node
//! - [`InterpolatedDiscountCurve`]: interpolated discount factors
//! - [`PeriodicZeroCurve`]: interpolated periodically-compounded zero rates
//! - [`NelsonSiegelCurve`]: the Nelson-Siegel functional form
//! - [`SpreadCurve`]: signed sum of other curves' zero rates

mod constant;
mod discount;
mod nelson_siegel;
mod periodic;
mod spread;
mod zero;

pub use constant::ConstantCurve;
pub use discount::InterpolatedDiscountCurve;
pub use nelson_siegel::NelsonSiegelCurve;
pub use periodic::PeriodicZeroCurve;
pub use spread::{SpreadComponent, SpreadCurve, SpreadSign};
pub use zero::InterpolatedZeroCurve;

pub(crate) use zero::insert_anchor;

use crate::error::{CurveError, CurveResult};

/// Checks that node times are finite and strictly increasing.
pub(crate) fn validate_node_times(times: &[f64]) -> CurveResult<()> {
    if let Some(bad) = times.iter().find(|t| !t.is_finite()) {
        return Err(CurveError::invalid_input(format!(
            "node times must be finite, got {bad}"
        )));
    }
    for (i, pair) in times.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(CurveError::NonMonotonicNodes {
                index: i + 1,
                prev: pair[0],
                current: pair[1],
            });
        }
    }
    Ok(())
}

/// Checks that a value vector matches its node vector.
pub(crate) fn check_lengths(nodes: &[f64], values: &[f64]) -> CurveResult<()> {
    if nodes.is_empty() {
        return Err(CurveError::InsufficientNodes {
            required: 1,
            got: 0,
        });
    }
    if nodes.len() != values.len() {
        return Err(CurveError::parameter_count_mismatch(nodes.len(), values.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_node_times() {
        assert!(validate_node_times(&[]).is_ok());
        assert!(validate_node_times(&[0.5, 1.0, 2.0]).is_ok());
        assert_eq!(
            validate_node_times(&[0.5, 2.0, 1.0]),
            Err(CurveError::NonMonotonicNodes {
                index: 2,
                prev: 2.0,
                current: 1.0
            })
        );
        assert!(matches!(
            validate_node_times(&[1.0, f64::INFINITY]),
            Err(CurveError::InvalidInput { .. })
        ));
    }
}
