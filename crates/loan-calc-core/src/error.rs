use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Principal,
    Rate,
    Term,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputField::Principal => "principal",
            InputField::Rate => "rate",
            InputField::Term => "term",
        })
    }
}

/// Why a raw input value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidInputReason {
    /// The value could not be read as a number.
    NotANumber,
    /// The value parsed as positive or negative infinity.
    NonFinite,
    NonPositivePrincipal,
    /// Zero, negative, or fractional month count.
    NonPositiveTerm,
    /// More months than fit in a `u32`.
    TermTooLong,
    NegativeRate,
}

impl fmt::Display for InvalidInputReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvalidInputReason::NotANumber => "value is not a number",
            InvalidInputReason::NonFinite => "value must be finite",
            InvalidInputReason::NonPositivePrincipal => "principal must be greater than zero",
            InvalidInputReason::NonPositiveTerm => "term must be a whole number of months >= 1",
            InvalidInputReason::TermTooLong => "term exceeds the supported number of months",
            InvalidInputReason::NegativeRate => "annual rate must not be negative",
        })
    }
}

/// Why a formula evaluation was rejected after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationReason {
    /// Overflow or NaN somewhere in the payment figures, or a monthly
    /// payment that underflowed to zero.
    NonFiniteResult,
    /// The figure cannot be expressed as a 2-dp currency amount.
    OutOfCurrencyRange,
}

impl fmt::Display for CalculationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalculationReason::NonFiniteResult => "result is not a finite number",
            CalculationReason::OutOfCurrencyRange => "result is outside the representable currency range",
        })
    }
}

#[derive(Debug, Error)]
pub enum LoanCalcError {
    #[error("Invalid input ({field}): {reason}")]
    InvalidInput {
        field: InputField,
        reason: InvalidInputReason,
    },

    #[error("Calculation error: {reason}")]
    Calculation { reason: CalculationReason },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanCalcError {
    pub(crate) fn invalid(field: InputField, reason: InvalidInputReason) -> Self {
        LoanCalcError::InvalidInput { field, reason }
    }

    pub(crate) fn calculation(reason: CalculationReason) -> Self {
        LoanCalcError::Calculation { reason }
    }

    /// True for failures detected before any arithmetic ran.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LoanCalcError::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for LoanCalcError {
    fn from(e: serde_json::Error) -> Self {
        LoanCalcError::SerializationError(e.to_string())
    }
}
