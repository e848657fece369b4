//! Core traits for generated curves.
//!
//! A [`Curve`] is an immutable, named function of time. Curves store
//! continuously-compounded zero rates; discount factors and simple forward
//! rates are derived from them unless a curve overrides the defaults.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use curvestack_core::Compounding;

use crate::error::{CurveError, CurveResult};

/// Shared handle to an immutable curve.
pub type CurveRef = Arc<dyn Curve>;

/// The core trait for generated curves.
///
/// # Required Methods
///
/// - [`name`](Curve::name)
/// - [`zero_rate`](Curve::zero_rate): continuously-compounded zero rate
/// - [`number_of_parameters`](Curve::number_of_parameters)
/// - [`zero_rate_parameter_sensitivity`](Curve::zero_rate_parameter_sensitivity)
pub trait Curve: Send + Sync + fmt::Debug {
    /// Returns the curve name.
    fn name(&self) -> &str;

    /// Returns the continuously-compounded zero rate at time `t`.
    fn zero_rate(&self, t: f64) -> CurveResult<f64>;

    /// Returns the discount factor at time `t`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.zero_rate(t)? * t).exp())
    }

    /// Returns the zero rate at `t` expressed in another compounding.
    fn zero_rate_compounded(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Returns the simply-compounded forward rate over `[start, end]`.
    ///
    /// `F = (DF(start) / DF(end) - 1) / accrual`
    fn forward_rate(&self, start: f64, end: f64, accrual: f64) -> CurveResult<f64> {
        if accrual <= 0.0 {
            return Err(CurveError::invalid_input(format!(
                "accrual factor must be positive, got {accrual}"
            )));
        }
        let df_start = self.discount_factor(start)?;
        let df_end = self.discount_factor(end)?;
        Ok((df_start / df_end - 1.0) / accrual)
    }

    /// Returns the number of parameters this curve was generated from.
    fn number_of_parameters(&self) -> usize;

    /// Returns `d zero_rate(t) / d p_i` for each of the curve's own parameters.
    fn zero_rate_parameter_sensitivity(&self, t: f64) -> CurveResult<Vec<f64>>;

    /// Returns the names of the curves this curve is built on.
    fn underlying_curve_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Resolves curves by name.
///
/// Spread generators built over an existing curve use this to find their
/// base curve at generation time.
pub trait CurveLookup: Send + Sync {
    /// Returns the curve registered under `name`, if any.
    fn lookup_curve(&self, name: &str) -> Option<CurveRef>;
}

impl CurveLookup for HashMap<String, CurveRef> {
    fn lookup_curve(&self, name: &str) -> Option<CurveRef> {
        self.get(name).cloned()
    }
}
