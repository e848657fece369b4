//! Floating-rate index definitions.
//!
//! An index keys a forward (projection) curve in a multi-curve provider.
//! Only identity matters here: fixing calendars, day counts and lags belong to
//! the instrument layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Currency;

/// Kind of floating-rate index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Overnight index (SOFR, ESTR, SONIA, ...).
    Overnight,
    /// Term index with a tenor in months (Euribor 3M, Term SOFR 6M, ...).
    Term {
        /// Index tenor in months.
        months: u32,
    },
}

impl IndexKind {
    /// Returns the index tenor in years, `None` for overnight indices.
    #[must_use]
    pub fn tenor_years(&self) -> Option<f64> {
        match self {
            IndexKind::Overnight => None,
            IndexKind::Term { months } => Some(f64::from(*months) / 12.0),
        }
    }
}

/// A floating-rate index.
///
/// # Example
///
/// ```rust
/// use curvestack_core::{Currency, RateIndex};
///
/// let euribor = RateIndex::term("EURIBOR3M", Currency::EUR, 3);
/// assert_eq!(euribor.currency(), Currency::EUR);
/// assert_eq!(euribor.to_string(), "EURIBOR3M");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateIndex {
    name: String,
    currency: Currency,
    kind: IndexKind,
}

impl RateIndex {
    /// Creates an index.
    #[must_use]
    pub fn new(name: impl Into<String>, currency: Currency, kind: IndexKind) -> Self {
        Self {
            name: name.into(),
            currency,
            kind,
        }
    }

    /// Creates an overnight index.
    #[must_use]
    pub fn overnight(name: impl Into<String>, currency: Currency) -> Self {
        Self::new(name, currency, IndexKind::Overnight)
    }

    /// Creates a term index with the given tenor in months.
    #[must_use]
    pub fn term(name: impl Into<String>, currency: Currency, months: u32) -> Self {
        Self::new(name, currency, IndexKind::Term { months })
    }

    /// Returns the index name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the index currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the index kind.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        self.kind
    }
}

impl fmt::Display for RateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
