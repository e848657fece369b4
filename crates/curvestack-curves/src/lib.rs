//! # Curvestack Curves
//!
//! Curve generators and the multi-curve provider.
//!
//! This crate provides:
//!
//! - **Curve Trait**: [`Curve`], an immutable named function of time with
//!   zero rates, discount factors, forward rates and parameter sensitivities
//! - **Curves**: constant, interpolated zero, interpolated discount, periodic,
//!   anchored, Nelson-Siegel and spread curves
//! - **Generators**: [`CurveShape`] and [`BoundShape`], which turn a flat
//!   parameter vector into a curve during calibration, including additive
//!   stacks and spreads over existing or fixed curves
//! - **Multi-Curve**: [`MulticurveProvider`], curves keyed by currency, rate
//!   index and issuer, with FX rates
//! - **Configuration**: [`ShapeConfig`], generator trees in JSON or TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use curvestack_curves::prelude::*;
//!
//! // OIS zero curve plus a constant basis spread
//! let basis: CurveRef = Arc::new(ConstantCurve::new("basis", 0.01));
//! let shape = CurveShape::spread_over_fixed(
//!     CurveShape::interpolated_zero(Interpolation::linear()),
//!     false,
//!     basis,
//! );
//! let bound = shape.finalize(&[1.0, 5.0], |t: &f64| *t).unwrap();
//! let curve = bound.generate("USD-3M", &[0.02, 0.03]).unwrap();
//! assert!((curve.zero_rate(1.0).unwrap() - 0.03).abs() < 1e-12);
//!
//! let mut provider = MulticurveProvider::new();
//! provider
//!     .set_curve(RateIndex::term("USD-LIBOR-3M", Currency::USD, 3), curve)
//!     .unwrap();
//! assert_eq!(provider.all_curve_names(), vec!["USD-3M".to_string()]);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: [`BoundShape::generate_batch`] runs on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod curves;
pub mod error;
pub mod generator;
pub mod provider;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{FixedCurveConfig, ShapeConfig};
    pub use crate::curves::{
        ConstantCurve, InterpolatedDiscountCurve, InterpolatedZeroCurve, NelsonSiegelCurve,
        PeriodicZeroCurve, SpreadComponent, SpreadCurve, SpreadSign,
    };
    pub use crate::error::{CurveError, CurveResult, ErrorCategory};
    pub use crate::generator::{AnchoredNodes, BoundShape, CurveGenerator, CurveShape, NodeTimes};
    pub use crate::provider::{CurveKey, IssuerCurveKey, MulticurveProvider};
    pub use crate::traits::{Curve, CurveLookup, CurveRef};
    pub use curvestack_core::{Compounding, Currency, FxMatrix, LegalEntity, RateIndex};
    pub use curvestack_math::interpolation::{ExtrapolationMethod, Interpolation, InterpolationMethod};
}

pub use config::ShapeConfig;
pub use error::{CurveError, CurveResult, ErrorCategory};
pub use generator::{BoundShape, CurveGenerator, CurveShape};
pub use provider::{CurveKey, MulticurveProvider};
pub use traits::{Curve, CurveLookup, CurveRef};
