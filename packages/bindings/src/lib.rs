mod json;

#[cfg(not(test))]
mod exports {
    use napi::Result as NapiResult;
    use napi_derive::napi;

    use crate::json;

    /// Convert any Display error into a napi::Error.
    fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
        napi::Error::from_reason(e.to_string())
    }

    /// `{"principal": .., "rate": .., "term": .., "strategy"?: ..}` in, rounded
    /// result envelope out. Figures may be numbers or the text of a form field.
    #[napi]
    pub fn calculate_loan(input_json: String) -> NapiResult<String> {
        json::calculate_loan(&input_json).map_err(to_napi_error)
    }

    /// Both models on the same loan, un-rounded.
    #[napi]
    pub fn compare_loan_models(input_json: String) -> NapiResult<String> {
        json::compare_loan_models(&input_json).map_err(to_napi_error)
    }

    /// A JSON array of loans. `default_strategy` applies to loans that do not
    /// name one; omitted, the library default is used.
    #[napi]
    pub fn calculate_loan_batch(
        input_json: String,
        default_strategy: Option<String>,
    ) -> NapiResult<String> {
        json::calculate_loan_batch(&input_json, default_strategy.as_deref()).map_err(to_napi_error)
    }
}
