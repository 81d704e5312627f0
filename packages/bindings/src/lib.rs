//! Node bindings for the EMI calculator.
//!
//! Each function takes a JSON string matching the corresponding emi-core
//! input type and returns the serialized computation envelope. Validation
//! failures surface as the canonical user-facing message, matching the
//! behaviour of the original browser form.

use napi::Result as NapiResult;
use napi_derive::napi;

use emi_core::EmiError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_user_error(e: EmiError) -> napi::Error {
    napi::Error::from_reason(e.user_message())
}

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    let input: emi_core::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::emi::calculate_emi(&input).map_err(to_user_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_schedule(input_json: String) -> NapiResult<String> {
    let input: emi_core::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::schedule::build_schedule(&input).map_err(to_user_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn rate_sensitivity(input_json: String) -> NapiResult<String> {
    let input: emi_core::sensitivity::RateSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::sensitivity::rate_sensitivity(&input).map_err(to_user_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
