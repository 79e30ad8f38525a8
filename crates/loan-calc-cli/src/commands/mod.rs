pub mod batch;
pub mod loan;

use clap::ValueEnum;
use loan_calc_core::StrategyKind;

/// Command-line spelling of [`StrategyKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Reducing-balance annuity (constant payment)
    AmortizingAnnuity,
    /// Fixed capital installment plus fixed interest on the original principal
    SimpleAnnualized,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::AmortizingAnnuity => StrategyKind::AmortizingAnnuity,
            StrategyArg::SimpleAnnualized => StrategyKind::SimpleAnnualized,
        }
    }
}
