//! # Curvestack Core
//!
//! Value types shared by every Curvestack crate:
//!
//! - **Currencies**: ISO 4217 codes keying discounting curves
//! - **Rate indices**: overnight and term indices keying forward curves
//! - **Legal entities**: issuers keying issuer-specific curves
//! - **Compounding**: continuous, periodic and simple rate conventions
//! - **FX**: a reference-currency based exchange-rate matrix
//!
//! ## Example
//!
//! ```rust
//! use curvestack_core::prelude::*;
//!
//! let mut fx = FxMatrix::new(Currency::USD);
//! fx.add_currency(Currency::EUR, Currency::USD, 1.10).unwrap();
//!
//! assert!((fx.fx_rate(Currency::EUR, Currency::USD).unwrap() - 1.10).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{Compounding, Currency, FxMatrix, IndexKind, LegalEntity, RateIndex};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Compounding, Currency, FxMatrix, IndexKind, LegalEntity, RateIndex};
}
