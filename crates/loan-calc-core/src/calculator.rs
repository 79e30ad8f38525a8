//! Strategy selection and the top-level loan operations.
//!
//! [`compute`] is the only place a [`StrategyKind`] is turned into a
//! formula. Everything else (the configured [`LoanCalculator`], model
//! comparison, batch recalculation) goes through it.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::input::{self, LoanInput, RawValue};
use crate::strategy::{annuity, simple_annualized, LoanResult, StrategyKind};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

/// Rates above this (percent per year) are flagged as likely entry errors.
const HIGH_RATE_WARNING_PERCENT: f64 = 100.0;

/// Terms above this many months (50 years) are flagged.
const LONG_TERM_WARNING_MONTHS: u32 = 600;

/// Dispatch a validated loan to the selected repayment model.
pub fn compute(kind: StrategyKind, input: &LoanInput) -> LoanCalcResult<LoanResult> {
    debug!(strategy = %kind, "dispatching loan calculation");
    match kind {
        StrategyKind::AmortizingAnnuity => annuity::compute(input),
        StrategyKind::SimpleAnnualized => simple_annualized::compute(input),
    }
}

/// A calculator bound to one repayment model for its whole lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanCalculator {
    kind: StrategyKind,
}

impl LoanCalculator {
    pub fn new(kind: StrategyKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn compute(&self, input: &LoanInput) -> LoanCalcResult<LoanResult> {
        compute(self.kind, input)
    }

    /// Validate raw figures, compute, and wrap the result in an envelope.
    pub fn calculate(
        &self,
        principal: &RawValue,
        annual_rate_percent: &RawValue,
        term_months: &RawValue,
    ) -> LoanCalcResult<ComputationOutput<LoanResult>> {
        let start = Instant::now();
        let input = input::validate(principal, annual_rate_percent, term_months)?;
        let result = self.compute(&input)?;
        Ok(with_metadata(
            self.kind.name(),
            &assumptions(self.kind, &input),
            input_warnings(&input),
            start,
            result,
        ))
    }
}

/// One loan as submitted by a presentation surface or a batch file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Caller's reference, echoed back in batch output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Overrides the configured model for this loan only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    /// Absent figures parse as [`RawValue::Missing`] and fail validation,
    /// so one incomplete loan cannot break a batch file.
    #[serde(default)]
    pub principal: RawValue,
    #[serde(default, alias = "rate")]
    pub annual_rate_percent: RawValue,
    #[serde(default, alias = "term")]
    pub term_months: RawValue,
}

impl LoanRequest {
    pub fn new(
        principal: impl Into<RawValue>,
        annual_rate_percent: impl Into<RawValue>,
        term_months: impl Into<RawValue>,
    ) -> Self {
        Self {
            id: None,
            strategy: None,
            principal: principal.into(),
            annual_rate_percent: annual_rate_percent.into(),
            term_months: term_months.into(),
        }
    }

    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy = Some(kind);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The model this request runs under when `configured` is the default.
    pub fn resolve_strategy(&self, configured: StrategyKind) -> StrategyKind {
        self.strategy.unwrap_or(configured)
    }

    pub fn validate(&self) -> LoanCalcResult<LoanInput> {
        input::validate(&self.principal, &self.annual_rate_percent, &self.term_months)
    }
}

/// Compute a single loan request; a request without a `strategy` runs under
/// [`StrategyKind::default`].
pub fn calculate_loan(request: &LoanRequest) -> LoanCalcResult<ComputationOutput<LoanResult>> {
    LoanCalculator::new(request.resolve_strategy(StrategyKind::default())).calculate(
        &request.principal,
        &request.annual_rate_percent,
        &request.term_months,
    )
}

// ---------------------------------------------------------------------------
// Model comparison
// ---------------------------------------------------------------------------

/// Both repayment models evaluated on the same loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub amortizing_annuity: LoanResult,
    pub simple_annualized: LoanResult,
    /// Simple-annualized total interest minus annuity total interest.
    pub interest_difference: Money,
    /// Simple-annualized monthly payment minus annuity monthly payment.
    pub monthly_payment_difference: Money,
}

/// Run both models on one loan. The request's own `strategy` is ignored.
pub fn compare_models(request: &LoanRequest) -> LoanCalcResult<ComputationOutput<ModelComparison>> {
    let start = Instant::now();
    let input = request.validate()?;

    let amortizing_annuity = compute(StrategyKind::AmortizingAnnuity, &input)?;
    let simple_annualized = compute(StrategyKind::SimpleAnnualized, &input)?;

    let comparison = ModelComparison {
        interest_difference: simple_annualized.total_interest - amortizing_annuity.total_interest,
        monthly_payment_difference: simple_annualized.monthly_payment - amortizing_annuity.monthly_payment,
        amortizing_annuity,
        simple_annualized,
    };

    Ok(with_metadata(
        "Repayment Model Comparison",
        &serde_json::json!({
            "principal": input.principal(),
            "annual_rate_percent": input.annual_rate_percent(),
            "term_months": input.term_months(),
        }),
        input_warnings(&input),
        start,
        comparison,
    ))
}

// ---------------------------------------------------------------------------
// Batch recalculation
// ---------------------------------------------------------------------------

/// Outcome for one loan of a batch: either a result or the error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub id: Option<String>,
    pub strategy: StrategyKind,
    pub result: Option<LoanResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub entries: Vec<BatchEntry>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Recompute a set of loans. A failing loan is recorded and the batch
/// continues; the batch itself never fails.
pub fn calculate_batch(
    requests: &[LoanRequest],
    configured: StrategyKind,
) -> ComputationOutput<BatchOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let entries: Vec<BatchEntry> = requests
        .iter()
        .enumerate()
        .map(|(idx, request)| {
            let kind = request.resolve_strategy(configured);
            let outcome = request.validate().and_then(|input| {
                for w in input_warnings(&input) {
                    warnings.push(format!("{}: {w}", entry_label(request, idx)));
                }
                compute(kind, &input)
            });
            match outcome {
                Ok(result) => BatchEntry {
                    id: request.id.clone(),
                    strategy: kind,
                    result: Some(result),
                    error: None,
                },
                Err(e) => BatchEntry {
                    id: request.id.clone(),
                    strategy: kind,
                    result: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    debug!(total = entries.len(), failed, "batch recalculated");

    with_metadata(
        "Batch Loan Recalculation",
        &serde_json::json!({
            "configured_strategy": configured,
            "loans": requests.len(),
        }),
        warnings,
        start,
        BatchOutput {
            succeeded: entries.len() - failed,
            failed,
            entries,
        },
    )
}

fn entry_label(request: &LoanRequest, idx: usize) -> String {
    match &request.id {
        Some(id) => format!("loan {id}"),
        None => format!("loan #{}", idx + 1),
    }
}

fn assumptions(kind: StrategyKind, input: &LoanInput) -> serde_json::Value {
    serde_json::json!({
        "strategy": kind,
        "principal": input.principal(),
        "annual_rate_percent": input.annual_rate_percent(),
        "term_months": input.term_months(),
    })
}

fn input_warnings(input: &LoanInput) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.annual_rate_percent() > HIGH_RATE_WARNING_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% exceeds {}%; rates are entered as percentages (12.5 = 12.5%)",
            input.annual_rate_percent(),
            HIGH_RATE_WARNING_PERCENT
        ));
    }
    if input.term_months() > LONG_TERM_WARNING_MONTHS {
        warnings.push(format!(
            "Term of {} months exceeds {} months (50 years)",
            input.term_months(),
            LONG_TERM_WARNING_MONTHS
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputField, InvalidInputReason, LoanCalcError};

    fn input(principal: f64, rate: f64, term: u32) -> LoanInput {
        LoanInput::new(principal, rate, term).unwrap()
    }

    #[test]
    fn test_dispatch_matches_strategy_modules() {
        let loan = input(10_000.0, 12.0, 12);
        assert_eq!(
            compute(StrategyKind::AmortizingAnnuity, &loan).unwrap(),
            annuity::compute(&loan).unwrap()
        );
        assert_eq!(
            compute(StrategyKind::SimpleAnnualized, &loan).unwrap(),
            simple_annualized::compute(&loan).unwrap()
        );
    }

    #[test]
    fn test_calculator_keeps_its_kind() {
        let calc = LoanCalculator::new(StrategyKind::AmortizingAnnuity);
        assert_eq!(calc.kind(), StrategyKind::AmortizingAnnuity);
        assert!(calc.compute(&input(1000.0, 6.0, 10)).unwrap().breakdown.is_none());
        assert_eq!(LoanCalculator::default().kind(), StrategyKind::SimpleAnnualized);
    }

    #[test]
    fn test_calculate_envelope() {
        let out = LoanCalculator::new(StrategyKind::SimpleAnnualized)
            .calculate(&"10000".into(), &"12".into(), &"12".into())
            .unwrap();
        assert_eq!(out.methodology, "Simple Annualized Interest");
        assert_eq!(out.assumptions["strategy"], "simple_annualized");
        assert_eq!(out.assumptions["term_months"], 12);
        assert!(out.warnings.is_empty());
        assert!(out.result.breakdown.is_some());
    }

    #[test]
    fn test_calculate_rejects_before_computing() {
        let err = LoanCalculator::default()
            .calculate(&0.0.into(), &5.0.into(), &12u32.into())
            .unwrap_err();
        assert!(matches!(
            err,
            LoanCalcError::InvalidInput {
                field: InputField::Principal,
                reason: InvalidInputReason::NonPositivePrincipal
            }
        ));
    }

    #[test]
    fn test_request_strategy_overrides_default() {
        let req = LoanRequest::new(10_000.0, 12.0, 12u32).with_strategy(StrategyKind::AmortizingAnnuity);
        let out = calculate_loan(&req).unwrap();
        assert_eq!(out.methodology, "Reducing-Balance Annuity");
        assert_eq!(req.resolve_strategy(StrategyKind::SimpleAnnualized), StrategyKind::AmortizingAnnuity);
    }

    #[test]
    fn test_request_without_strategy_uses_default() {
        let out = calculate_loan(&LoanRequest::new(10_000.0, 12.0, 12u32)).unwrap();
        assert_eq!(out.methodology, StrategyKind::default().name());
    }

    #[test]
    fn test_request_json_shape() {
        let req: LoanRequest = serde_json::from_str(
            r#"{"id": "L-7", "strategy": "amortizing_annuity", "principal": "5000", "rate": 7.5, "term": 24}"#,
        )
        .unwrap();
        assert_eq!(req.id.as_deref(), Some("L-7"));
        assert_eq!(req.strategy, Some(StrategyKind::AmortizingAnnuity));
        assert_eq!(req.validate().unwrap().term_months(), 24);
    }

    #[test]
    fn test_request_with_absent_fields_still_parses() {
        let req: LoanRequest = serde_json::from_str(r#"{"principal": null, "rate": 12}"#).unwrap();
        assert_eq!(req.principal, RawValue::Missing);
        assert_eq!(req.term_months, RawValue::Missing);
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            LoanCalcError::InvalidInput {
                field: InputField::Principal,
                reason: InvalidInputReason::NotANumber
            }
        ));
    }

    #[test]
    fn test_warnings_for_unusual_inputs() {
        let out = calculate_loan(&LoanRequest::new(1000.0, 150.0, 720u32)).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].contains("150%"));
        assert!(out.warnings[1].contains("720 months"));
    }

    #[test]
    fn test_compare_models() {
        let out = compare_models(&LoanRequest::new(10_000.0, 12.0, 12u32)).unwrap();
        let c = &out.result;
        assert!((c.interest_difference - (1200.0 - 661.854_641_4)).abs() < 1e-6);
        assert!(c.monthly_payment_difference > 0.0);
        assert!(c.simple_annualized.breakdown.is_some());
        assert!(c.amortizing_annuity.breakdown.is_none());
    }

    #[test]
    fn test_compare_zero_rate_has_no_difference() {
        let out = compare_models(&LoanRequest::new(1200.0, 0.0, 12u32)).unwrap();
        assert_eq!(out.result.interest_difference, 0.0);
        assert_eq!(out.result.monthly_payment_difference, 0.0);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let requests = vec![
            LoanRequest::new(10_000.0, 12.0, 12u32).with_id("a"),
            LoanRequest::new(-5.0, 12.0, 12u32).with_id("b"),
            LoanRequest::new(1e300, 500.0, 720u32).with_strategy(StrategyKind::AmortizingAnnuity),
            LoanRequest::new(6_000.0, 0.0, "6").with_id("d"),
        ];
        let out = calculate_batch(&requests, StrategyKind::SimpleAnnualized);
        let batch = &out.result;
        assert_eq!(batch.entries.len(), 4);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed, 2);

        assert_eq!(batch.entries[0].strategy, StrategyKind::SimpleAnnualized);
        assert!(batch.entries[0].result.is_some());
        assert!(batch.entries[1].error.as_deref().unwrap().contains("principal"));
        assert_eq!(batch.entries[2].strategy, StrategyKind::AmortizingAnnuity);
        assert!(batch.entries[2].error.as_deref().unwrap().contains("finite"));
        assert_eq!(batch.entries[3].result.unwrap().monthly_payment, 1000.0);

        // loan #3 triggers both unusual-input warnings before failing
        assert_eq!(out.warnings.len(), 2);
        assert!(out.warnings[0].starts_with("loan #3"));
    }

    #[test]
    fn test_empty_batch() {
        let out = calculate_batch(&[], StrategyKind::AmortizingAnnuity);
        assert_eq!(out.result.succeeded, 0);
        assert_eq!(out.result.failed, 0);
        assert_eq!(out.assumptions["configured_strategy"], "amortizing_annuity");
    }
}
