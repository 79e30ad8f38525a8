use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use loan_calc_core::calculator::{self, ModelComparison};
use loan_calc_core::rounding::{to_currency, RoundedLoanResult};
use loan_calc_core::{LoanCalcResult, LoanCalculator, LoanRequest, StrategyKind};

use crate::input;

/// Arguments shared by `calculate` and `compare`
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<String>,

    /// Annual interest rate as a percentage (12.5 = 12.5%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Term in months
    #[arg(long, allow_hyphen_values = true)]
    pub term: Option<String>,
}

/// Build the request from, in order: the input file, piped stdin, or flags.
/// Values stay raw text so the core validator sees exactly what was typed.
fn read_request(args: LoanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let term = args.term.ok_or("--term is required (or provide --input)")?;
    Ok(LoanRequest::new(principal, rate, term))
}

pub fn run_calculate(
    args: LoanArgs,
    configured: StrategyKind,
    exact: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(args)?;
    let kind = request.resolve_strategy(configured);
    let output = LoanCalculator::new(kind).calculate(
        &request.principal,
        &request.annual_rate_percent,
        &request.term_months,
    )?;

    let mut value = if exact {
        serde_json::to_value(output)?
    } else {
        serde_json::to_value(output.try_map_result(|r| r.rounded())?)?
    };
    if let Value::Object(map) = &mut value {
        map.insert("model_description".into(), Value::from(kind.description()));
    }
    Ok(value)
}

/// Both models, rounded for display.
#[derive(Serialize)]
struct RoundedComparison {
    amortizing_annuity: RoundedLoanResult,
    simple_annualized: RoundedLoanResult,
    interest_difference: Decimal,
    monthly_payment_difference: Decimal,
}

fn round_comparison(c: ModelComparison) -> LoanCalcResult<RoundedComparison> {
    Ok(RoundedComparison {
        amortizing_annuity: c.amortizing_annuity.rounded()?,
        simple_annualized: c.simple_annualized.rounded()?,
        interest_difference: to_currency(c.interest_difference)?,
        monthly_payment_difference: to_currency(c.monthly_payment_difference)?,
    })
}

pub fn run_compare(args: LoanArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let request = read_request(args)?;
    let output = calculator::compare_models(&request)?;
    if exact {
        Ok(serde_json::to_value(output)?)
    } else {
        Ok(serde_json::to_value(output.try_map_result(round_comparison)?)?)
    }
}
