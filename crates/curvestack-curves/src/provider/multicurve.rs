//! Multi-curve provider.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use curvestack_core::{Currency, FxMatrix, LegalEntity, RateIndex};
use tracing::debug;

use super::key::{CurveKey, IssuerCurveKey};
use crate::error::{CurveError, CurveResult};
use crate::traits::{CurveLookup, CurveRef};

/// Registry of discounting, forward and issuer curves plus FX rates.
///
/// Discounting curves are keyed by currency, forward curves by rate index and
/// issuer curves by issuer and currency. Curves are also reachable by their
/// own name, which is what parameter sensitivities and spread generators use.
///
/// A name belongs to one curve: the same curve may sit under several keys,
/// but registering a different curve under a name already in use fails with
/// [`CurveError::DuplicateCurveName`] and leaves the provider unchanged.
///
/// # Concurrency
///
/// Reads take `&self` and are safe from any number of threads. Registration
/// takes `&mut self`, so a provider has a single writer at a time. Once a
/// provider has been handed to pricing code, derive variations with
/// [`copy`](Self::copy) or [`with_curve`](Self::with_curve) instead of
/// mutating it in place. Copies share curves, which are immutable.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use curvestack_curves::prelude::*;
///
/// let mut provider = MulticurveProvider::new();
/// provider
///     .set_curve(Currency::USD, Arc::new(ConstantCurve::new("USD-OIS", 0.03)))
///     .unwrap();
///
/// let df = provider.discount_factor(Currency::USD, 2.0).unwrap();
/// assert!((df - (-0.06_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MulticurveProvider {
    discount_curves: HashMap<Currency, CurveRef>,
    forward_curves: HashMap<RateIndex, CurveRef>,
    issuer_curves: HashMap<IssuerCurveKey, CurveRef>,
    /// Every registered curve by name, rebuilt after each registry change.
    curves_by_name: HashMap<String, CurveRef>,
    fx_matrix: FxMatrix,
}

impl Default for MulticurveProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MulticurveProvider {
    /// Creates an empty provider with a USD-referenced FX matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fx_matrix(FxMatrix::new(Currency::USD))
    }

    /// Creates an empty provider with the given FX matrix.
    #[must_use]
    pub fn with_fx_matrix(fx_matrix: FxMatrix) -> Self {
        Self {
            discount_curves: HashMap::new(),
            forward_curves: HashMap::new(),
            issuer_curves: HashMap::new(),
            curves_by_name: HashMap::new(),
            fx_matrix,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the discount factor at `t` from the discounting curve of
    /// `currency`.
    pub fn discount_factor(&self, currency: Currency, t: f64) -> CurveResult<f64> {
        self.curve_for(&CurveKey::discount(currency))?
            .discount_factor(t)
    }

    /// Returns the simply-compounded forward rate of `index` over
    /// `[start, end]`.
    ///
    /// `F = (DF(start) / DF(end) - 1) / accrual`
    pub fn forward_rate(
        &self,
        index: &RateIndex,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> CurveResult<f64> {
        self.forward_curves
            .get(index)
            .ok_or_else(|| CurveError::key_not_found(CurveKey::forward(index.clone())))?
            .forward_rate(start, end, accrual)
    }

    /// Returns the discount factor at `t` for obligations of `issuer` in
    /// `currency`.
    pub fn issuer_discount_factor(
        &self,
        issuer: &LegalEntity,
        currency: Currency,
        t: f64,
    ) -> CurveResult<f64> {
        let key = IssuerCurveKey {
            issuer: issuer.clone(),
            currency,
        };
        self.issuer_curves
            .get(&key)
            .ok_or_else(|| CurveError::key_not_found(CurveKey::from(key.clone())))?
            .discount_factor(t)
    }

    /// Returns units of `to` per unit of `from`.
    pub fn fx_rate(&self, from: Currency, to: Currency) -> CurveResult<f64> {
        Ok(self.fx_matrix.fx_rate(from, to)?)
    }

    /// Returns the curve registered under `key`.
    pub fn curve_for(&self, key: &CurveKey) -> CurveResult<&CurveRef> {
        let curve = match key {
            CurveKey::Discount { currency } => self.discount_curves.get(currency),
            CurveKey::Forward { index } => self.forward_curves.get(index),
            CurveKey::Issuer { key: issuer } => self.issuer_curves.get(issuer),
        };
        curve.ok_or_else(|| CurveError::key_not_found(key))
    }

    /// Returns the name of the curve registered under `key`.
    pub fn name_for(&self, key: &CurveKey) -> CurveResult<&str> {
        Ok(self.curve_for(key)?.name())
    }

    /// Returns the curve called `name`.
    pub fn curve(&self, name: &str) -> CurveResult<&CurveRef> {
        self.curves_by_name
            .get(name)
            .ok_or_else(|| CurveError::curve_not_found(name))
    }

    /// Returns the names of all registered curves, sorted.
    #[must_use]
    pub fn all_curve_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.curves_by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of parameters of the curve called `name`.
    pub fn number_of_parameters(&self, name: &str) -> CurveResult<usize> {
        Ok(self.curve(name)?.number_of_parameters())
    }

    /// Returns the names of the curves underlying the curve called `name`.
    pub fn underlying_curve_names(&self, name: &str) -> CurveResult<Vec<String>> {
        Ok(self.curve(name)?.underlying_curve_names())
    }

    /// Currencies with a discounting curve.
    #[must_use]
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.discount_curves.keys().copied().collect();
        currencies.sort();
        currencies
    }

    /// Indices with a forward curve.
    #[must_use]
    pub fn indices(&self) -> Vec<&RateIndex> {
        self.forward_curves.keys().collect()
    }

    /// Returns the FX matrix.
    #[must_use]
    pub fn fx_matrix(&self) -> &FxMatrix {
        &self.fx_matrix
    }

    // ========================================================================
    // Sensitivities
    // ========================================================================

    /// Aggregates point sensitivities into sensitivities to the parameters of
    /// the curve called `name`.
    ///
    /// Each `(t, weight)` pair is the sensitivity of some value to the curve's
    /// zero rate at `t`. The result has one entry per parameter of that curve.
    pub fn parameter_sensitivity(
        &self,
        name: &str,
        point_sensitivities: &[(f64, f64)],
    ) -> CurveResult<Vec<f64>> {
        let curve = self.curve(name)?;
        let mut result = vec![0.0; curve.number_of_parameters()];
        for &(t, weight) in point_sensitivities {
            let sensitivity = curve.zero_rate_parameter_sensitivity(t)?;
            for (total, s) in result.iter_mut().zip(sensitivity) {
                *total += weight * s;
            }
        }
        Ok(result)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers `curve` under `key`, overwriting any existing curve.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicateCurveName`] if another key holds a
    /// different curve with the same name; the provider is left unchanged.
    pub fn set_curve(&mut self, key: impl Into<CurveKey>, curve: CurveRef) -> CurveResult<()> {
        let key = key.into();
        let name = curve.name().to_string();
        self.install(&key, curve)?;
        debug!(key = %key, curve = %name, "curve registered");
        Ok(())
    }

    /// Replaces the curve registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::KeyNotFound`] if nothing is registered under
    /// `key` and [`CurveError::DuplicateCurveName`] if the new curve's name is
    /// taken by a different curve under another key. The provider is left
    /// unchanged in both cases.
    pub fn replace_curve(&mut self, key: impl Into<CurveKey>, curve: CurveRef) -> CurveResult<()> {
        let key = key.into();
        let old = self.name_for(&key)?.to_string();
        let new = curve.name().to_string();
        self.install(&key, curve)?;
        debug!(key = %key, old = %old, new = %new, "curve replaced");
        Ok(())
    }

    /// Removes and returns the curve registered under `key`.
    pub fn remove_curve(&mut self, key: &CurveKey) -> CurveResult<CurveRef> {
        let removed = self
            .slot_remove(key)
            .ok_or_else(|| CurveError::key_not_found(key))?;
        debug!(key = %key, curve = removed.name(), "curve removed");
        // removing a curve cannot introduce a name conflict
        self.curves_by_name = self.name_index()?;
        Ok(removed)
    }

    /// Copies every curve of `other` into this provider, overwriting curves
    /// under the same keys. The FX matrix is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicateCurveName`] if the merged registry would
    /// hold two different curves with the same name; nothing is merged then.
    pub fn set_all(&mut self, other: &MulticurveProvider) -> CurveResult<()> {
        let mut merged = self.clone();
        merged.discount_curves.extend(
            other
                .discount_curves
                .iter()
                .map(|(k, c)| (*k, c.clone())),
        );
        merged.forward_curves.extend(
            other
                .forward_curves
                .iter()
                .map(|(k, c)| (k.clone(), c.clone())),
        );
        merged.issuer_curves.extend(
            other
                .issuer_curves
                .iter()
                .map(|(k, c)| (k.clone(), c.clone())),
        );
        merged.curves_by_name = merged.name_index()?;
        *self = merged;
        debug!(curves = self.curves_by_name.len(), "providers merged");
        Ok(())
    }

    /// Replaces the FX matrix.
    pub fn set_fx_matrix(&mut self, fx_matrix: FxMatrix) {
        self.fx_matrix = fx_matrix;
    }

    /// Returns an independent registry sharing the same curves.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns a copy with `curve` registered under `key`.
    ///
    /// # Errors
    ///
    /// Fails like [`set_curve`](Self::set_curve).
    pub fn with_curve(&self, key: impl Into<CurveKey>, curve: CurveRef) -> CurveResult<Self> {
        let mut copy = self.copy();
        copy.set_curve(key, curve)?;
        Ok(copy)
    }

    /// Puts `curve` under `key` and reindexes names, restoring the previous
    /// entry if the new curve's name is taken.
    fn install(&mut self, key: &CurveKey, curve: CurveRef) -> CurveResult<()> {
        let previous = self.slot_insert(key, curve);
        match self.name_index() {
            Ok(index) => {
                self.curves_by_name = index;
                Ok(())
            }
            Err(err) => {
                match previous {
                    Some(previous) => {
                        self.slot_insert(key, previous);
                    }
                    None => {
                        self.slot_remove(key);
                    }
                }
                Err(err)
            }
        }
    }

    fn slot_insert(&mut self, key: &CurveKey, curve: CurveRef) -> Option<CurveRef> {
        match key {
            CurveKey::Discount { currency } => self.discount_curves.insert(*currency, curve),
            CurveKey::Forward { index } => self.forward_curves.insert(index.clone(), curve),
            CurveKey::Issuer { key: issuer } => self.issuer_curves.insert(issuer.clone(), curve),
        }
    }

    fn slot_remove(&mut self, key: &CurveKey) -> Option<CurveRef> {
        match key {
            CurveKey::Discount { currency } => self.discount_curves.remove(currency),
            CurveKey::Forward { index } => self.forward_curves.remove(index),
            CurveKey::Issuer { key: issuer } => self.issuer_curves.remove(issuer),
        }
    }

    /// Indexes every registered curve by name. A name may map to one curve
    /// only, however many keys it sits under.
    fn name_index(&self) -> CurveResult<HashMap<String, CurveRef>> {
        let mut index: HashMap<String, CurveRef> = HashMap::new();
        let curves = self
            .discount_curves
            .values()
            .chain(self.forward_curves.values())
            .chain(self.issuer_curves.values());
        for curve in curves {
            match index.entry(curve.name().to_string()) {
                Entry::Occupied(entry) if !Arc::ptr_eq(entry.get(), curve) => {
                    return Err(CurveError::duplicate_curve_name(curve.name()));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(entry) => {
                    entry.insert(Arc::clone(curve));
                }
            }
        }
        Ok(index)
    }
}

impl CurveLookup for MulticurveProvider {
    fn lookup_curve(&self, name: &str) -> Option<CurveRef> {
        self.curves_by_name.get(name).cloned()
    }
}
