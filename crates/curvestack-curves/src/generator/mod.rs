//! Curve generators.
//!
//! A generator turns a flat parameter vector into a [`Curve`](crate::Curve).
//! Generators come in two phases:
//!
//! - [`CurveShape`]: configuration only. Shapes whose nodes are placed at
//!   calibration instrument times cannot generate until finalized.
//! - [`BoundShape`]: node times are fixed, the parameter count is known and
//!   curves can be generated.
//!
//! [`CurveGenerator::finalize`] maps the first phase onto the second.
//! Finalizing a bound shape returns a copy of it.
//!
//! # Example
//!
//! ```rust
//! use curvestack_curves::prelude::*;
//!
//! // two instruments maturing at 1y and 5y
//! let shape = CurveShape::interpolated_zero(Interpolation::linear());
//! let bound = shape.finalize(&[1.0, 5.0], |t: &f64| *t).unwrap();
//!
//! let curve = bound.generate("USD-OIS", &[0.02, 0.03]).unwrap();
//! assert!((curve.zero_rate(3.0).unwrap() - 0.025).abs() < 1e-12);
//! ```

mod bound;
mod nodes;
mod shape;

pub use bound::BoundShape;
pub use nodes::{AnchoredNodes, NodeTimes};
pub use shape::CurveShape;

use crate::error::CurveResult;
use crate::traits::{CurveLookup, CurveRef};

/// Common operations of both generator phases.
pub trait CurveGenerator {
    /// Returns the number of parameters of generated curves.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOperation`](crate::CurveError::UnsupportedOperation)
    /// if the count depends on instruments not yet bound.
    fn number_of_parameters(&self) -> CurveResult<usize>;

    /// Binds the generator to its calibration instruments.
    ///
    /// `node_time` maps an instrument to the time, in years, of the node it
    /// determines. Instruments must be sorted by that time.
    fn finalize<I, F>(&self, instruments: &[I], node_time: F) -> CurveResult<BoundShape>
    where
        F: Fn(&I) -> f64;

    /// Generates a curve, resolving spread bases through `lookup`.
    fn generate_with(
        &self,
        name: &str,
        parameters: &[f64],
        lookup: Option<&dyn CurveLookup>,
    ) -> CurveResult<CurveRef>;

    /// Generates a curve from `parameters`.
    fn generate(&self, name: &str, parameters: &[f64]) -> CurveResult<CurveRef> {
        self.generate_with(name, parameters, None)
    }

    /// Returns a starting parameter vector for calibration from market rates.
    fn initial_guess(&self, market_rates: &[f64]) -> CurveResult<Vec<f64>>;
}
