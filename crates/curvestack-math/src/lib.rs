//! # Curvestack Math
//!
//! Numerical building blocks consumed by the curve generators:
//!
//! - **Interpolation**: linear, log-linear and natural cubic spline
//!   interpolators with per-node sensitivities
//! - **Extrapolation**: flat, linear or forbidden outside the node range
//! - **Parametric**: the Nelson-Siegel zero-rate function and its gradient
//!
//! ## Example
//!
//! ```rust
//! use curvestack_math::prelude::*;
//!
//! let interp = Interpolation::linear()
//!     .build(vec![1.0, 5.0], vec![0.02, 0.03])
//!     .unwrap();
//!
//! assert!((interp.interpolate(3.0).unwrap() - 0.025).abs() < 1e-12);
//! assert_eq!(interp.node_sensitivity(3.0).unwrap(), vec![0.5, 0.5]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod interpolation;
pub mod parametric;

pub use error::{MathError, MathResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, ExtrapolationMethod, Interpolation, InterpolationMethod, Interpolator,
        LinearInterpolator, LogLinearInterpolator,
    };
    pub use crate::parametric::NelsonSiegel;
}
