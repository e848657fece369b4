//! Interest compounding conventions.
//!
//! Curves in this framework store continuously-compounded zero rates. The
//! helpers here convert between that representation and the periodic or
//! simple conventions quoted in markets.
//!
//! # Example
//!
//! ```rust
//! use curvestack_core::Compounding;
//!
//! let df_cont = Compounding::Continuous.discount_factor(0.05, 2.0);
//! let df_annual = Compounding::Periodic(1).discount_factor(0.05, 2.0);
//! assert!(df_cont < df_annual);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Interest compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// Continuous compounding: `df = exp(-r * t)`.
    #[default]
    Continuous,
    /// Compounded `m` times per year: `df = (1 + r/m)^(-m * t)`.
    Periodic(u32),
    /// Simple interest: `df = 1 / (1 + r * t)`.
    Simple,
}

impl Compounding {
    /// Annual compounding.
    pub const ANNUAL: Compounding = Compounding::Periodic(1);
    /// Semi-annual compounding.
    pub const SEMI_ANNUAL: Compounding = Compounding::Periodic(2);
    /// Quarterly compounding.
    pub const QUARTERLY: Compounding = Compounding::Periodic(4);

    /// Discount factor for a rate quoted in this convention.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match *self {
            Compounding::Continuous => (-rate * t).exp(),
            Compounding::Periodic(m) => {
                let m = f64::from(m.max(1));
                (1.0 + rate / m).powf(-m * t)
            }
            Compounding::Simple => 1.0 / (1.0 + rate * t),
        }
    }

    /// Rate in this convention implied by a discount factor at time `t`.
    ///
    /// Returns 0 for `t <= 0`.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        match *self {
            Compounding::Continuous => -df.ln() / t,
            Compounding::Periodic(m) => {
                let m = f64::from(m.max(1));
                m * (df.powf(-1.0 / (m * t)) - 1.0)
            }
            Compounding::Simple => (1.0 / df - 1.0) / t,
        }
    }

    /// Converts a rate in this convention to its continuously-compounded
    /// equivalent over horizon `t`.
    ///
    /// Periodic rates convert independently of `t`.
    #[must_use]
    pub fn to_continuous(&self, rate: f64, t: f64) -> f64 {
        match *self {
            Compounding::Continuous => rate,
            Compounding::Periodic(m) => {
                let m = f64::from(m.max(1));
                m * (rate / m).ln_1p()
            }
            Compounding::Simple => {
                if t <= 0.0 {
                    rate
                } else {
                    (rate * t).ln_1p() / t
                }
            }
        }
    }

    /// Converts a rate from this convention to `target` over horizon `t`.
    #[must_use]
    pub fn convert_to(&self, rate: f64, target: Compounding, t: f64) -> f64 {
        if *self == target {
            return rate;
        }
        let df = self.discount_factor(rate, t);
        target.zero_rate(df, t)
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compounding::Continuous => write!(f, "Continuous"),
            Compounding::Periodic(1) => write!(f, "Annual"),
            Compounding::Periodic(2) => write!(f, "Semi-Annual"),
            Compounding::Periodic(4) => write!(f, "Quarterly"),
            Compounding::Periodic(12) => write!(f, "Monthly"),
            Compounding::Periodic(m) => write!(f, "Periodic({m})"),
            Compounding::Simple => write!(f, "Simple"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor_continuous() {
        let df = Compounding::Continuous.discount_factor(0.05, 1.0);
        assert_relative_eq!(df, (-0.05_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_discount_factor_semi_annual() {
        let df = Compounding::SEMI_ANNUAL.discount_factor(0.05, 1.0);
        assert_relative_eq!(df, 1.025_f64.powf(-2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_discount_factor_simple() {
        let df = Compounding::Simple.discount_factor(0.05, 0.5);
        assert_relative_eq!(df, 1.0 / 1.025, epsilon = 1e-12);
    }

    #[test]
    fn test_periodic_to_continuous_matches_discount_factor() {
        let rate = 0.04;
        let t = 3.0;
        let cont = Compounding::QUARTERLY.to_continuous(rate, t);
        assert_relative_eq!(
            Compounding::Continuous.discount_factor(cont, t),
            Compounding::QUARTERLY.discount_factor(rate, t),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_convert_recovers_rate() {
        for comp in [
            Compounding::Continuous,
            Compounding::ANNUAL,
            Compounding::SEMI_ANNUAL,
            Compounding::Simple,
        ] {
            let cont = comp.convert_to(0.03, Compounding::Continuous, 2.0);
            let back = Compounding::Continuous.convert_to(cont, comp, 2.0);
            assert_relative_eq!(back, 0.03, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_rate_at_zero_time() {
        assert_eq!(Compounding::Continuous.zero_rate(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Compounding::SEMI_ANNUAL.to_string(), "Semi-Annual");
        assert_eq!(Compounding::Periodic(3).to_string(), "Periodic(3)");
    }
}
