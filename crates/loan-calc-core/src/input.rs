//! Validation of raw loan figures.
//!
//! Values arrive from a presentation surface as either JSON numbers or free
//! text. Every value is coerced to `f64` and range-checked before any
//! strategy sees it; nothing is clamped or defaulted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InputField, InvalidInputReason, LoanCalcError};
use crate::types::{Money, Percent};
use crate::LoanCalcResult;

/// A value as supplied by the caller, before coercion.
///
/// Deserialization never fails on shape: `null`, an absent field, a boolean
/// or a nested value all land here and are rejected by [`validate`] with the
/// field they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// `null`, or the field was left out.
    #[default]
    Missing,
    Unsupported(serde_json::Value),
}

impl RawValue {
    /// Coerce to `f64`. Text is trimmed; `"inf"` and `"NaN"` parse here and
    /// are rejected by the range checks.
    fn to_number(&self, field: InputField) -> LoanCalcResult<f64> {
        let not_a_number = || LoanCalcError::invalid(field, InvalidInputReason::NotANumber);
        match self {
            RawValue::Number(n) => Ok(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| not_a_number()),
            RawValue::Missing | RawValue::Unsupported(_) => Err(not_a_number()),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Number(v as f64)
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Number(f64::from(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

/// A validated loan. Fields are private so a `LoanInput` always satisfies
/// `principal > 0`, `annual_rate_percent >= 0`, `term_months >= 1`, all finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanInput {
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
}

impl LoanInput {
    /// Build a validated input from already-numeric values.
    pub fn new(principal: Money, annual_rate_percent: Percent, term_months: u32) -> LoanCalcResult<Self> {
        let principal = check_principal(principal)?;
        let annual_rate_percent = check_rate(annual_rate_percent)?;
        if term_months == 0 {
            return Err(LoanCalcError::invalid(
                InputField::Term,
                InvalidInputReason::NonPositiveTerm,
            ));
        }
        Ok(Self {
            principal,
            annual_rate_percent,
            term_months,
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> Percent {
        self.annual_rate_percent
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// Per-period rate as a fraction: 12% per year is 0.01 per month.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }
}

/// Coerce and range-check the three raw figures, in the order principal,
/// rate, term. The first failing field is reported.
pub fn validate(principal: &RawValue, rate: &RawValue, term: &RawValue) -> LoanCalcResult<LoanInput> {
    let principal = check_principal(principal.to_number(InputField::Principal)?)?;
    let annual_rate_percent = check_rate(rate.to_number(InputField::Rate)?)?;
    let term_months = check_term(term.to_number(InputField::Term)?)?;

    debug!(principal, annual_rate_percent, term_months, "validated loan input");
    Ok(LoanInput {
        principal,
        annual_rate_percent,
        term_months,
    })
}

fn check_finite(value: f64, field: InputField) -> LoanCalcResult<f64> {
    if value.is_nan() {
        Err(LoanCalcError::invalid(field, InvalidInputReason::NotANumber))
    } else if value.is_infinite() {
        Err(LoanCalcError::invalid(field, InvalidInputReason::NonFinite))
    } else {
        Ok(value)
    }
}

fn check_principal(value: f64) -> LoanCalcResult<Money> {
    let value = check_finite(value, InputField::Principal)?;
    if value <= 0.0 {
        return Err(LoanCalcError::invalid(
            InputField::Principal,
            InvalidInputReason::NonPositivePrincipal,
        ));
    }
    Ok(value)
}

fn check_rate(value: f64) -> LoanCalcResult<Percent> {
    let value = check_finite(value, InputField::Rate)?;
    if value < 0.0 {
        return Err(LoanCalcError::invalid(
            InputField::Rate,
            InvalidInputReason::NegativeRate,
        ));
    }
    // -0.0 passes the check above; store it as +0.0
    Ok(value + 0.0)
}

fn check_term(value: f64) -> LoanCalcResult<u32> {
    let value = check_finite(value, InputField::Term)?;
    if value <= 0.0 || value.fract() != 0.0 {
        return Err(LoanCalcError::invalid(
            InputField::Term,
            InvalidInputReason::NonPositiveTerm,
        ));
    }
    if value > f64::from(u32::MAX) {
        return Err(LoanCalcError::invalid(
            InputField::Term,
            InvalidInputReason::TermTooLong,
        ));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(
        principal: impl Into<RawValue>,
        rate: impl Into<RawValue>,
        term: impl Into<RawValue>,
    ) -> LoanCalcResult<LoanInput> {
        validate(&principal.into(), &rate.into(), &term.into())
    }

    fn reason_of(result: LoanCalcResult<LoanInput>) -> (InputField, InvalidInputReason) {
        match result {
            Err(LoanCalcError::InvalidInput { field, reason }) => (field, reason),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_text_and_numbers_mix() {
        let input = check(" 10000 ", 12.5, "36").unwrap();
        assert_eq!(input.principal(), 10000.0);
        assert_eq!(input.annual_rate_percent(), 12.5);
        assert_eq!(input.term_months(), 36);
    }

    #[test]
    fn test_whole_float_term_accepted() {
        let input = check(1000.0, 0.0, "12.0").unwrap();
        assert_eq!(input.term_months(), 12);
    }

    #[test]
    fn test_unparseable_principal() {
        let result = check("ten thousand", 12.0, 12u32);
        assert_eq!(
            reason_of(result),
            (InputField::Principal, InvalidInputReason::NotANumber)
        );
    }

    #[test]
    fn test_empty_rate_is_not_a_number() {
        let result = check(1000.0, "", 12u32);
        assert_eq!(
            reason_of(result),
            (InputField::Rate, InvalidInputReason::NotANumber)
        );
    }

    #[test]
    fn test_nan_text_is_not_a_number() {
        let result = check(1000.0, 5.0, "NaN");
        assert_eq!(
            reason_of(result),
            (InputField::Term, InvalidInputReason::NotANumber)
        );
    }

    #[test]
    fn test_infinite_principal_rejected() {
        let result = check("inf", 5.0, 12u32);
        assert_eq!(
            reason_of(result),
            (InputField::Principal, InvalidInputReason::NonFinite)
        );
    }

    #[test]
    fn test_zero_and_negative_principal() {
        for p in [0.0, -0.0, -500.0] {
            let result = check(p, 5.0, 12u32);
            assert_eq!(
                reason_of(result),
                (InputField::Principal, InvalidInputReason::NonPositivePrincipal)
            );
        }
    }

    #[test]
    fn test_negative_rate_not_clamped() {
        let result = check(1000.0, -0.01, 12u32);
        assert_eq!(
            reason_of(result),
            (InputField::Rate, InvalidInputReason::NegativeRate)
        );
    }

    #[test]
    fn test_negative_zero_rate_normalised() {
        let input = check(1000.0, -0.0, 12u32).unwrap();
        assert!(input.annual_rate_percent().is_sign_positive());
    }

    #[test]
    fn test_bad_terms() {
        for t in ["0", "-3", "12.5"] {
            let result = check(1000.0, 5.0, t);
            assert_eq!(
                reason_of(result),
                (InputField::Term, InvalidInputReason::NonPositiveTerm),
                "term {t}"
            );
        }
    }

    #[test]
    fn test_term_too_long() {
        let result = check(1000.0, 5.0, 1e12);
        assert_eq!(
            reason_of(result),
            (InputField::Term, InvalidInputReason::TermTooLong)
        );
    }

    #[test]
    fn test_principal_checked_before_rate() {
        let result = check(-1.0, -1.0, 0u32);
        assert_eq!(
            reason_of(result),
            (InputField::Principal, InvalidInputReason::NonPositivePrincipal)
        );
    }

    #[test]
    fn test_numeric_constructor_rejects_zero_term() {
        let result = LoanInput::new(1000.0, 5.0, 0);
        assert_eq!(
            reason_of(result),
            (InputField::Term, InvalidInputReason::NonPositiveTerm)
        );
    }

    #[test]
    fn test_monthly_rate() {
        let input = LoanInput::new(1000.0, 12.0, 12).unwrap();
        assert!((input.monthly_rate() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_raw_value_untagged() {
        let values: Vec<RawValue> = serde_json::from_str(r#"["5000", 7.5, 24]"#).unwrap();
        assert_eq!(values[0], RawValue::Text("5000".into()));
        assert_eq!(values[1], RawValue::Number(7.5));
        assert_eq!(validate(&values[0], &values[1], &values[2]).unwrap().term_months(), 24);
    }

    #[test]
    fn test_null_and_booleans_are_not_numbers() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, true, [1]]"#).unwrap();
        assert_eq!(values[0], RawValue::Missing);
        assert_eq!(values[1], RawValue::Unsupported(serde_json::json!(true)));

        assert_eq!(
            reason_of(validate(&values[0], &5.0.into(), &12u32.into())),
            (InputField::Principal, InvalidInputReason::NotANumber)
        );
        assert_eq!(
            reason_of(validate(&1000.0.into(), &values[1], &12u32.into())),
            (InputField::Rate, InvalidInputReason::NotANumber)
        );
        assert_eq!(
            reason_of(validate(&1000.0.into(), &5.0.into(), &values[2])),
            (InputField::Term, InvalidInputReason::NotANumber)
        );
    }

    #[test]
    fn test_default_is_missing() {
        assert_eq!(
            reason_of(check(RawValue::default(), 5.0, 12u32)),
            (InputField::Principal, InvalidInputReason::NotANumber)
        );
    }
}
