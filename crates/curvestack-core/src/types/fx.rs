//! FX rates relative to a reference currency.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::Currency;

/// Exchange-rate matrix.
///
/// Every currency is stored as its value in units of the reference currency,
/// so any cross rate is derived from two entries. `fx_rate(a, b)` is the
/// number of units of `b` for one unit of `a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxMatrix {
    reference: Currency,
    /// Value of one unit of each currency in the reference currency.
    values: BTreeMap<Currency, f64>,
}

impl FxMatrix {
    /// Creates a matrix holding only the reference currency.
    #[must_use]
    pub fn new(reference: Currency) -> Self {
        let mut values = BTreeMap::new();
        values.insert(reference, 1.0);
        Self { reference, values }
    }

    /// Returns the reference currency.
    #[must_use]
    pub fn reference(&self) -> Currency {
        self.reference
    }

    /// Adds `new` given the rate `new -> existing` (units of `existing` per
    /// unit of `new`).
    pub fn add_currency(&mut self, new: Currency, existing: Currency, rate: f64) -> CoreResult<()> {
        if self.values.contains_key(&new) {
            return Err(CoreError::DuplicateCurrency { currency: new });
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::invalid_value(format!(
                "FX rate {new}/{existing} must be positive and finite, got {rate}"
            )));
        }
        let existing_value = *self
            .values
            .get(&existing)
            .ok_or_else(|| CoreError::currency_not_found(existing))?;
        debug!(%new, %existing, rate, "adding currency to FX matrix");
        self.values.insert(new, rate * existing_value);
        Ok(())
    }

    /// Units of `to` for one unit of `from`.
    pub fn fx_rate(&self, from: Currency, to: Currency) -> CoreResult<f64> {
        let from_value = self.value_of(from)?;
        let to_value = self.value_of(to)?;
        Ok(from_value / to_value)
    }

    /// Converts `amount` of `from` into `to`.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> CoreResult<f64> {
        Ok(amount * self.fx_rate(from, to)?)
    }

    /// Returns true if the currency has a rate.
    #[must_use]
    pub fn contains(&self, currency: Currency) -> bool {
        self.values.contains_key(&currency)
    }

    /// Returns the currencies in the matrix, in code order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.values.keys().copied()
    }

    /// Number of currencies, reference included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: the reference currency is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn value_of(&self, currency: Currency) -> CoreResult<f64> {
        self.values
            .get(&currency)
            .copied()
            .ok_or_else(|| CoreError::currency_not_found(currency))
    }
}
