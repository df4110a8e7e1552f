use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use finico_core::{ComputationOutput, FinicoResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Decode a JSON request, run `op`, and encode the envelope back to JSON.
fn call_json<I, O>(
    input_json: &str,
    op: impl FnOnce(&I) -> FinicoResult<ComputationOutput<O>>,
) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = op(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[napi]
pub fn project_balances(input_json: String) -> NapiResult<String> {
    call_json(&input_json, finico_core::forecast::projection::project_balances)
}

// ---------------------------------------------------------------------------
// Monte Carlo and goals
// ---------------------------------------------------------------------------

#[napi]
pub fn run_wealth_simulation(input_json: String) -> NapiResult<String> {
    call_json(
        &input_json,
        finico_core::monte_carlo::simulation::run_wealth_simulation,
    )
}

#[napi]
pub fn solve_required_contribution(input_json: String) -> NapiResult<String> {
    call_json(
        &input_json,
        finico_core::goal::solver::solve_required_contribution,
    )
}

#[napi]
pub fn solve_deterministic_contribution(input_json: String) -> NapiResult<String> {
    call_json(
        &input_json,
        finico_core::goal::deterministic::solve_deterministic_contribution,
    )
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    call_json(&input_json, finico_core::loan::amortization::amortize_loan)
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_budget(input_json: String) -> NapiResult<String> {
    call_json(&input_json, finico_core::budget::summary::summarize_budget)
}

#[napi]
pub fn net_worth(input_json: String) -> NapiResult<String> {
    call_json(&input_json, finico_core::budget::summary::net_worth)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[napi]
pub fn annual_to_monthly_rate(annual_pct: f64) -> f64 {
    finico_core::rates::annual_to_monthly_rate(annual_pct)
}

#[napi]
pub fn monthly_to_annual_rate(monthly_pct: f64) -> f64 {
    finico_core::rates::monthly_to_annual_rate(monthly_pct)
}

#[napi]
pub fn annual_to_monthly_sigma(sigma_annual_pct: f64) -> f64 {
    finico_core::rates::annual_to_monthly_sigma(sigma_annual_pct)
}

#[napi]
pub fn monthly_sigma_to_annual(sigma_monthly_pct: f64) -> f64 {
    finico_core::rates::monthly_sigma_to_annual(sigma_monthly_pct)
}
