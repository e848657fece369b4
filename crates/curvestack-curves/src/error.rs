//! Error types for curve generation and the multi-curve provider.
//!
//! Every [`CurveError`] belongs to one [`ErrorCategory`], so a calibration
//! driver can tell bad input apart from a wrong call sequence or a missing
//! registry entry without matching on individual variants.

use curvestack_core::CoreError;
use curvestack_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Coarse classification of a [`CurveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Wrong parameter-vector length, unsorted nodes, mismatched counts.
    ShapeViolation,
    /// The operation is not available in the current state.
    NotReady,
    /// A curve or registry key is missing.
    NotFound,
    /// Numerical failure while evaluating a curve.
    Numerical,
}

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Parameter vector length does not match the generator.
    #[error("Parameter count mismatch: expected {expected}, got {got}")]
    ParameterCountMismatch {
        /// Number of parameters the generator declares.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },

    /// Node times are not strictly increasing.
    #[error("Non-monotonic nodes at index {index}: {prev:.6} >= {current:.6}")]
    NonMonotonicNodes {
        /// Index where monotonicity violation occurred.
        index: usize,
        /// Previous node time.
        prev: f64,
        /// Current node time.
        current: f64,
    },

    /// Instrument counts do not add up.
    #[error("Instrument count mismatch: expected {expected}, got {got}")]
    InstrumentCountMismatch {
        /// Number of instruments required.
        expected: usize,
        /// Number of instruments supplied.
        got: usize,
    },

    /// Not enough nodes to build the curve.
    #[error("Insufficient nodes: need at least {required}, got {got}")]
    InsufficientNodes {
        /// Minimum required nodes.
        required: usize,
        /// Actual number of nodes.
        got: usize,
    },

    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Generator configuration could not be parsed or built.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration problem.
        reason: String,
    },

    /// The operation needs a preceding step or a collaborator that is absent.
    #[error("Unsupported operation {operation}: {reason}")]
    UnsupportedOperation {
        /// The operation that was called.
        operation: String,
        /// Why it cannot run.
        reason: String,
    },

    /// No curve with this name.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Name of the missing curve.
        name: String,
    },

    /// No curve registered under this key.
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// Display form of the missing key.
        key: String,
    },

    /// Two different curves registered with the same name.
    #[error("Duplicate curve name: {name} is already registered to a different curve")]
    DuplicateCurveName {
        /// The contested name.
        name: String,
    },

    /// Interpolation failed.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] MathError),

    /// Core value type error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates a parameter count mismatch error.
    #[must_use]
    pub fn parameter_count_mismatch(expected: usize, got: usize) -> Self {
        Self::ParameterCountMismatch { expected, got }
    }

    /// Creates an instrument count mismatch error.
    #[must_use]
    pub fn instrument_count_mismatch(expected: usize, got: usize) -> Self {
        Self::InstrumentCountMismatch { expected, got }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }

    /// Creates a key not found error.
    #[must_use]
    pub fn key_not_found(key: impl ToString) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Creates a duplicate curve name error.
    #[must_use]
    pub fn duplicate_curve_name(name: impl Into<String>) -> Self {
        Self::DuplicateCurveName { name: name.into() }
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParameterCountMismatch { .. }
            | Self::NonMonotonicNodes { .. }
            | Self::InstrumentCountMismatch { .. }
            | Self::InsufficientNodes { .. }
            | Self::InvalidInput { .. }
            | Self::Config { .. }
            | Self::DuplicateCurveName { .. } => ErrorCategory::ShapeViolation,
            Self::UnsupportedOperation { .. } => ErrorCategory::NotReady,
            Self::CurveNotFound { .. }
            | Self::KeyNotFound { .. }
            | Self::Core(CoreError::CurrencyNotFound { .. }) => ErrorCategory::NotFound,
            Self::Interpolation(_) | Self::Core(_) => ErrorCategory::Numerical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvestack_core::Currency;

    #[test]
    fn test_error_display() {
        let err = CurveError::parameter_count_mismatch(3, 2);
        assert_eq!(err.to_string(), "Parameter count mismatch: expected 3, got 2");

        let err = CurveError::unsupported("generate", "finalize first");
        assert_eq!(err.to_string(), "Unsupported operation generate: finalize first");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CurveError::parameter_count_mismatch(1, 2).category(),
            ErrorCategory::ShapeViolation
        );
        assert_eq!(
            CurveError::unsupported("generate", "no lookup").category(),
            ErrorCategory::NotReady
        );
        assert_eq!(
            CurveError::duplicate_curve_name("USD-OIS").category(),
            ErrorCategory::ShapeViolation
        );
        assert_eq!(
            CurveError::key_not_found("discount:USD").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            CurveError::from(CoreError::currency_not_found(Currency::EUR)).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            CurveError::from(MathError::insufficient_data(1, 0)).category(),
            ErrorCategory::Numerical
        );
    }
}
