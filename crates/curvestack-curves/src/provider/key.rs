//! Registry keys of the multi-curve provider.

use std::fmt;

use curvestack_core::{Currency, LegalEntity, RateIndex};
use serde::{Deserialize, Serialize};

/// Issuer-specific discounting: an issuer together with the currency of its
/// obligations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerCurveKey {
    /// The issuing entity.
    pub issuer: LegalEntity,
    /// Currency of the issuer's obligations.
    pub currency: Currency,
}

impl IssuerCurveKey {
    /// Creates an issuer key.
    pub fn new(issuer: impl Into<LegalEntity>, currency: Currency) -> Self {
        Self {
            issuer: issuer.into(),
            currency,
        }
    }
}

impl fmt::Display for IssuerCurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.issuer, self.currency)
    }
}

/// What a curve is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveKey {
    /// Discounting of cash flows in a currency.
    Discount {
        /// The currency.
        currency: Currency,
    },
    /// Projection of a floating-rate index.
    Forward {
        /// The index.
        index: RateIndex,
    },
    /// Discounting of an issuer's obligations.
    Issuer {
        /// The issuer and currency.
        key: IssuerCurveKey,
    },
}

impl CurveKey {
    /// Discounting key for `currency`.
    #[must_use]
    pub fn discount(currency: Currency) -> Self {
        Self::Discount { currency }
    }

    /// Forward key for `index`.
    #[must_use]
    pub fn forward(index: RateIndex) -> Self {
        Self::Forward { index }
    }

    /// Issuer key.
    pub fn issuer(issuer: impl Into<LegalEntity>, currency: Currency) -> Self {
        Self::Issuer {
            key: IssuerCurveKey::new(issuer, currency),
        }
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discount { currency } => write!(f, "discount:{currency}"),
            Self::Forward { index } => write!(f, "forward:{index}"),
            Self::Issuer { key } => write!(f, "issuer:{key}"),
        }
    }
}

impl From<Currency> for CurveKey {
    fn from(currency: Currency) -> Self {
        Self::discount(currency)
    }
}

impl From<RateIndex> for CurveKey {
    fn from(index: RateIndex) -> Self {
        Self::forward(index)
    }
}

impl From<IssuerCurveKey> for CurveKey {
    fn from(key: IssuerCurveKey) -> Self {
        Self::Issuer { key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CurveKey::from(Currency::USD).to_string(), "discount:USD");
        assert_eq!(
            CurveKey::issuer("ACME", Currency::EUR).to_string(),
            "issuer:ACME/EUR"
        );
    }

    #[test]
    fn test_issuer_key_roundtrip() {
        let key = CurveKey::issuer("ACME", Currency::GBP);
        let json = serde_json::to_string(&key).unwrap();
        let back: CurveKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
