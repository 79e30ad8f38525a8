use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Monetary amounts inside the core. Un-rounded IEEE-754 doubles; rounding to
/// currency precision happens only in [`crate::rounding`].
pub type Money = f64;

/// Annual rates as entered by the user: 12.5 means 12.5% per year.
pub type Percent = f64;

const PRECISION_LABEL: &str = "f64_ieee754";

/// Envelope returned by every top-level operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    /// Human-readable name of the repayment model (or operation) used.
    pub methodology: String,
    /// Echo of the validated input the result was computed from.
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    pub fn map_result<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }

    /// Replace the result while keeping methodology, assumptions, warnings
    /// and metadata. Used by presentation surfaces to swap in rounded figures.
    pub fn try_map_result<U: Serialize, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<ComputationOutput<U>, E> {
        Ok(ComputationOutput {
            result: f(self.result)?,
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        })
    }
}

/// Wrap a result in the envelope, timing it from `started`.
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    started: Instant,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: started.elapsed().as_micros() as u64,
            precision: PRECISION_LABEL.to_string(),
        },
    }
}
