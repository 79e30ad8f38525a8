//! Simple annualized interest.
//!
//! Interest is charged once on the original principal and spread evenly
//! over the term; it is never recomputed against the declining balance.

use tracing::debug;

use super::{ensure_sound, LoanResult, PaymentBreakdown, StrategyKind};
use crate::input::LoanInput;
use crate::LoanCalcResult;

pub fn compute(input: &LoanInput) -> LoanCalcResult<LoanResult> {
    let principal = input.principal();
    let n = f64::from(input.term_months());

    let monthly_interest = principal * (input.annual_rate_percent() / 100.0) / 12.0;
    let monthly_capital = principal / n;
    let total_interest = monthly_interest * n;

    let result = LoanResult {
        monthly_payment: monthly_capital + monthly_interest,
        total_payment: principal + total_interest,
        total_interest,
        breakdown: Some(PaymentBreakdown {
            monthly_capital,
            monthly_interest,
        }),
    };

    debug!(
        monthly_capital,
        monthly_interest,
        "simple annualized payment computed"
    );
    ensure_sound(StrategyKind::SimpleAnnualized, input, result)
}
