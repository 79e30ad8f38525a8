//! Reducing-balance annuity.
//!
//! With monthly rate `r` and `n` periods the level payment is
//!
//! ```text
//! payment = principal * x * r / (x - 1),   x = (1 + r)^n
//! ```
//!
//! `x - 1` is evaluated as `expm1(n * ln_1p(r))` so that rates too small to
//! change `1 + r` in f64 still give `principal / n` instead of dividing by zero.

use tracing::debug;

use super::{ensure_sound, LoanResult, StrategyKind};
use crate::input::LoanInput;
use crate::LoanCalcResult;

/// Level monthly payment and totals for a reducing-balance loan.
pub fn compute(input: &LoanInput) -> LoanCalcResult<LoanResult> {
    let principal = input.principal();
    let n = f64::from(input.term_months());
    let r = input.monthly_rate();

    let result = if r == 0.0 {
        // Zero-interest loan: the annuity formula degenerates to 0/0.
        LoanResult {
            monthly_payment: principal / n,
            total_payment: principal,
            total_interest: 0.0,
            breakdown: None,
        }
    } else {
        let growth_minus_one = (n * r.ln_1p()).exp_m1();
        let growth = growth_minus_one + 1.0;
        let monthly_payment = principal * growth * r / growth_minus_one;
        let total_payment = monthly_payment * n;
        LoanResult {
            monthly_payment,
            total_payment,
            // r > 0 means interest >= 0; near-zero rates can land a few ULPs below
            total_interest: (total_payment - principal).max(0.0),
            breakdown: None,
        }
    };

    debug!(
        monthly_payment = result.monthly_payment,
        total_payment = result.total_payment,
        "annuity payment computed"
    );
    ensure_sound(StrategyKind::AmortizingAnnuity, input, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalculationReason, LoanCalcError};

    fn assert_close(actual: f64, expected: f64, tol: f64, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn run(principal: f64, rate: f64, term: u32) -> LoanCalcResult<LoanResult> {
        compute(&LoanInput::new(principal, rate, term).unwrap())
    }

    #[test]
    fn test_twelve_percent_one_year() {
        let r = run(10_000.0, 12.0, 12).unwrap();
        assert_close(r.monthly_payment, 888.487_886_783_4, 1e-6, "monthly payment");
        assert_close(r.total_payment, 10_661.854_641_4, 1e-6, "total payment");
        assert_close(r.total_interest, 661.854_641_4, 1e-6, "total interest");
        assert!(r.breakdown.is_none());
    }

    #[test]
    fn test_thirty_year_mortgage() {
        // 250k at 6.5% over 360 months, standard amortisation tables give 1580.17
        let r = run(250_000.0, 6.5, 360).unwrap();
        assert_close(r.monthly_payment, 1580.17, 0.005, "monthly payment");
        assert_close(r.total_interest, 318_861.22, 0.01, "total interest");
    }

    #[test]
    fn test_total_is_payment_times_term() {
        let r = run(7_345.67, 9.25, 47).unwrap();
        let expected = r.monthly_payment * 47.0;
        assert!(((r.total_payment - expected) / expected).abs() < 1e-9);
        assert_eq!(r.total_interest, r.total_payment - 7_345.67);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let r = run(10_000.0, 0.0, 3).unwrap();
        assert_eq!(r.monthly_payment, 10_000.0 / 3.0);
        assert_eq!(r.total_payment, 10_000.0);
        assert_eq!(r.total_interest, 0.0);
    }

    #[test]
    fn test_vanishing_rate_matches_zero_rate() {
        // 1 + r == 1 in f64, yet the payment must stay finite
        let r = run(12_000.0, 1e-15, 12).unwrap();
        assert_close(r.monthly_payment, 1000.0, 1e-9, "monthly payment");
    }

    #[test]
    fn test_tiny_rate_interest_never_negative() {
        // payment * 3 rounds to just under 333.33 here
        let r = run(333.33, 1e-13, 3).unwrap();
        assert!(r.total_interest >= 0.0);
        assert_close(r.total_payment, 333.33, 1e-9, "total payment");
    }

    #[test]
    fn test_single_period_repays_principal_plus_one_month() {
        let r = run(1000.0, 12.0, 1).unwrap();
        assert_close(r.monthly_payment, 1010.0, 1e-9, "monthly payment");
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = run(1e300, 500.0, 600).unwrap_err();
        assert!(matches!(
            err,
            LoanCalcError::Calculation {
                reason: CalculationReason::NonFiniteResult
            }
        ));
    }

    #[test]
    fn test_underflow_is_rejected() {
        let err = run(f64::MIN_POSITIVE * 1e-10, 0.0, 1_000_000).unwrap_err();
        assert!(matches!(
            err,
            LoanCalcError::Calculation {
                reason: CalculationReason::NonFiniteResult
            }
        ));
    }
}
