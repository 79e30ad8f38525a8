//! Currency rounding for presentation.
//!
//! Strategies never round. Surfaces that display figures convert a
//! [`LoanResult`] here, once, to 2-dp decimals (midpoints away from zero).

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CalculationReason, LoanCalcError};
use crate::strategy::{LoanResult, PaymentBreakdown};
use crate::types::Money;
use crate::LoanCalcResult;

/// Decimal places of the currency unit.
pub const CURRENCY_DP: u32 = 2;

/// Round one amount to currency precision.
///
/// Amounts beyond the `Decimal` range (about 7.9e28) are rejected rather than
/// saturated.
pub fn to_currency(value: Money) -> LoanCalcResult<Decimal> {
    let mut amount = Decimal::from_f64(value)
        .ok_or_else(|| LoanCalcError::calculation(CalculationReason::OutOfCurrencyRange))?
        .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    // always render two places: "100.00", not "100"
    amount.rescale(CURRENCY_DP);
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedBreakdown {
    pub monthly_capital: Decimal,
    pub monthly_interest: Decimal,
}

/// [`LoanResult`] rounded for display. Each field is rounded on its own, so
/// `total_payment` may differ from `monthly_payment * term` by a few cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedLoanResult {
    pub monthly_payment: Decimal,
    pub total_payment: Decimal,
    pub total_interest: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<RoundedBreakdown>,
}

impl PaymentBreakdown {
    pub fn rounded(&self) -> LoanCalcResult<RoundedBreakdown> {
        Ok(RoundedBreakdown {
            monthly_capital: to_currency(self.monthly_capital)?,
            monthly_interest: to_currency(self.monthly_interest)?,
        })
    }
}

impl LoanResult {
    pub fn rounded(&self) -> LoanCalcResult<RoundedLoanResult> {
        Ok(RoundedLoanResult {
            monthly_payment: to_currency(self.monthly_payment)?,
            total_payment: to_currency(self.total_payment)?,
            total_interest: to_currency(self.total_interest)?,
            breakdown: self.breakdown.map(|b| b.rounded()).transpose()?,
        })
    }
}
