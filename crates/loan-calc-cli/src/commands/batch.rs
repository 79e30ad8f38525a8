use clap::Args;
use serde_json::{json, Map, Value};

use loan_calc_core::calculator::{self, BatchEntry, BatchOutput};
use loan_calc_core::rounding::to_currency;
use loan_calc_core::{LoanCalcResult, LoanRequest, Money, StrategyKind};

use crate::input;

/// Arguments for batch recalculation
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON array of loans (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_batch(
    args: BatchArgs,
    configured: StrategyKind,
    exact: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let requests: Vec<LoanRequest> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <loans.json> or stdin required for batch".into());
    };

    let output = calculator::calculate_batch(&requests, configured);
    Ok(serde_json::to_value(output.map_result(|b| flatten(b, exact)))?)
}

/// One row per loan so table and CSV output line up. Failed loans keep their
/// columns empty and carry the error text; a loan whose figures cannot be
/// rounded to currency fails on its own row.
fn flatten(batch: BatchOutput, exact: bool) -> Value {
    let rows: Vec<Value> = batch.entries.iter().map(|entry| row(entry, exact)).collect();
    let failed = rows.iter().filter(|r| !r["error"].is_null()).count();

    json!({
        "succeeded": rows.len() - failed,
        "failed": failed,
        "loans": rows,
    })
}

const AMOUNT_COLUMNS: [&str; 5] = [
    "monthly_payment",
    "total_payment",
    "total_interest",
    "monthly_capital",
    "monthly_interest",
];

fn row(entry: &BatchEntry, exact: bool) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), json!(entry.id));
    map.insert("strategy".into(), json!(entry.strategy));

    let error = match amounts(entry, exact) {
        Ok(values) => {
            for (column, value) in AMOUNT_COLUMNS.iter().zip(values) {
                map.insert((*column).into(), value);
            }
            entry.error.clone()
        }
        Err(e) => {
            for column in AMOUNT_COLUMNS {
                map.insert(column.into(), Value::Null);
            }
            Some(e.to_string())
        }
    };
    map.insert("error".into(), json!(error));
    Value::Object(map)
}

/// Amount columns of one loan in [`AMOUNT_COLUMNS`] order.
fn amounts(entry: &BatchEntry, exact: bool) -> LoanCalcResult<Vec<Value>> {
    let amount = |v: Option<Money>| -> LoanCalcResult<Value> {
        match v {
            None => Ok(Value::Null),
            Some(v) if exact => Ok(json!(v)),
            Some(v) => Ok(json!(to_currency(v)?)),
        }
    };

    let result = entry.result.as_ref();
    let breakdown = result.and_then(|r| r.breakdown);
    [
        result.map(|r| r.monthly_payment),
        result.map(|r| r.total_payment),
        result.map(|r| r.total_interest),
        breakdown.map(|b| b.monthly_capital),
        breakdown.map(|b| b.monthly_interest),
    ]
    .into_iter()
    .map(amount)
    .collect()
}
