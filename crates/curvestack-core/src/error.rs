//! Error types for core value types.

use thiserror::Error;

use crate::types::Currency;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core value types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Currency code could not be parsed.
    #[error("Unknown currency code: {code}")]
    UnknownCurrency {
        /// The code that failed to parse.
        code: String,
    },

    /// Currency is not present in the FX matrix.
    #[error("Currency {currency} not found in FX matrix")]
    CurrencyNotFound {
        /// The missing currency.
        currency: Currency,
    },

    /// Currency is already present in the FX matrix.
    #[error("Currency {currency} already present in FX matrix")]
    DuplicateCurrency {
        /// The duplicated currency.
        currency: Currency,
    },

    /// An FX rate or other quantity is outside its domain.
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why the value is invalid.
        reason: String,
    },
}

impl CoreError {
    /// Creates an unknown currency error.
    #[must_use]
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency { code: code.into() }
    }

    /// Creates a currency not found error.
    #[must_use]
    pub fn currency_not_found(currency: Currency) -> Self {
        Self::CurrencyNotFound { currency }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}
