//! The multi-curve provider: curves keyed by currency, rate index and issuer.

mod key;
mod multicurve;

pub use key::{CurveKey, IssuerCurveKey};
pub use multicurve::MulticurveProvider;
