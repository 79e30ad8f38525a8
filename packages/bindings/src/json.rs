//! JSON-string entry points behind the Node exports.

use loan_calc_core::calculator::{self, LoanRequest};
use loan_calc_core::{LoanCalcResult, StrategyKind};

pub fn calculate_loan(input_json: &str) -> LoanCalcResult<String> {
    let request: LoanRequest = serde_json::from_str(input_json)?;
    let output = calculator::calculate_loan(&request)?.try_map_result(|r| r.rounded())?;
    Ok(serde_json::to_string(&output)?)
}

pub fn compare_loan_models(input_json: &str) -> LoanCalcResult<String> {
    let request: LoanRequest = serde_json::from_str(input_json)?;
    let output = calculator::compare_models(&request)?;
    Ok(serde_json::to_string(&output)?)
}

pub fn calculate_loan_batch(input_json: &str, default_strategy: Option<&str>) -> LoanCalcResult<String> {
    let requests: Vec<LoanRequest> = serde_json::from_str(input_json)?;
    let configured = match default_strategy {
        Some(name) => parse_strategy(name)?,
        None => StrategyKind::default(),
    };
    let output = calculator::calculate_batch(&requests, configured);
    Ok(serde_json::to_string(&output)?)
}

/// Accepts both the JSON spelling (`simple_annualized`) and the CLI spelling
/// (`simple-annualized`).
fn parse_strategy(name: &str) -> LoanCalcResult<StrategyKind> {
    let normalised = name.trim().replace('-', "_");
    Ok(serde_json::from_value(serde_json::Value::String(normalised))?)
}
