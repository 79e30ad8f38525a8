//! Repayment models.
//!
//! Both models share one contract: a validated [`LoanInput`] goes in, a
//! [`LoanResult`] or a [`LoanCalcError::Calculation`] comes out. Which model
//! runs is decided by a [`StrategyKind`] in [`crate::calculator`]; nothing
//! else computes a payment.

pub mod annuity;
pub mod simple_annualized;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{CalculationReason, LoanCalcError};
use crate::input::LoanInput;
use crate::types::Money;
use crate::LoanCalcResult;

/// The repayment model a calculator is configured with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Reducing-balance annuity: constant payment, interest on the
    /// outstanding balance.
    AmortizingAnnuity,
    /// Constant capital installment plus a fixed interest charge computed once
    /// on the original principal. This is the model the live loan page runs.
    #[default]
    SimpleAnnualized,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::AmortizingAnnuity, StrategyKind::SimpleAnnualized];

    /// Methodology label used in computation envelopes.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::AmortizingAnnuity => "Reducing-Balance Annuity",
            StrategyKind::SimpleAnnualized => "Simple Annualized Interest",
        }
    }

    /// Plain-language explanation of the model for presentation surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::AmortizingAnnuity => {
                "Every payment is the same amount. Interest is charged each month on the \
                 balance still owed, so the interest share of each payment falls over the term."
            }
            StrategyKind::SimpleAnnualized => {
                "Every payment is a fixed capital installment (principal / term) plus a fixed \
                 monthly interest charge. The interest is computed once on the original amount \
                 and stays constant for the whole term."
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::AmortizingAnnuity => "amortizing_annuity",
            StrategyKind::SimpleAnnualized => "simple_annualized",
        })
    }
}

/// Per-payment components of the simple-annualized model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    /// Portion of each payment that repays principal.
    pub monthly_capital: Money,
    /// Fixed interest charged every month.
    pub monthly_interest: Money,
}

/// Summary repayment figures, un-rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Present only for [`StrategyKind::SimpleAnnualized`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PaymentBreakdown>,
}

/// Reject results that overflowed or collapsed to zero.
pub(crate) fn ensure_sound(kind: StrategyKind, input: &LoanInput, result: LoanResult) -> LoanCalcResult<LoanResult> {
    let breakdown_finite = result
        .breakdown
        .map_or(true, |b| b.monthly_capital.is_finite() && b.monthly_interest.is_finite());

    let sound = result.monthly_payment.is_finite()
        && result.total_payment.is_finite()
        && result.total_interest.is_finite()
        && breakdown_finite
        && result.monthly_payment > 0.0;
    if sound {
        return Ok(result);
    }

    let reason = CalculationReason::NonFiniteResult;
    warn!(
        strategy = %kind,
        principal = input.principal(),
        annual_rate_percent = input.annual_rate_percent(),
        term_months = input.term_months(),
        monthly_payment = result.monthly_payment,
        %reason,
        "rejected calculation result"
    );
    Err(LoanCalcError::calculation(reason))
}
