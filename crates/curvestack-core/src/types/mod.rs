//! Domain value types.
//!
//! - [`Currency`]: ISO currency codes
//! - [`RateIndex`]: Floating-rate index keying a forward curve
//! - [`LegalEntity`]: Issuer keying an issuer-specific curve
//! - [`Compounding`]: Interest compounding convention
//! - [`FxMatrix`]: Exchange rates relative to a reference currency

mod compounding;
mod currency;
mod fx;
mod index;
mod issuer;

pub use compounding::Compounding;
pub use currency::Currency;
pub use fx::FxMatrix;
pub use index::{IndexKind, RateIndex};
pub use issuer::LegalEntity;
