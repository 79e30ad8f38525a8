pub mod calculator;
pub mod error;
pub mod input;
pub mod rounding;
pub mod strategy;
pub mod types;

pub use calculator::{calculate_loan, compute, LoanCalculator, LoanRequest};
pub use error::LoanCalcError;
pub use input::{validate, LoanInput, RawValue};
pub use strategy::{LoanResult, PaymentBreakdown, StrategyKind};
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
