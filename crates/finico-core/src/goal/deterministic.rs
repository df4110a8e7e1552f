use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinicoError;
use crate::forecast::projection::horizon_months;
use crate::rates::monthly_fraction_from_annual;
use crate::time_value::{future_value, growing_annuity_factor};
use crate::types::{
    require_finite, require_non_negative, with_metadata, ComputationOutput, Money, Percent,
};
use crate::FinicoResult;

/// Input for the closed-form required-contribution calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterministicGoalInput {
    #[serde(alias = "initial")]
    pub initial_balance: Money,
    /// Goal in real (today's) money.
    #[serde(alias = "target_amount")]
    pub target: Money,
    #[serde(alias = "years")]
    pub horizon_years: f64,
    #[serde(default)]
    pub annual_return_pct: Percent,
    #[serde(default)]
    pub annual_inflation_pct: Percent,
    #[serde(default)]
    pub annual_fee_pct: Percent,
    #[serde(default, alias = "contrib_escalation_pct")]
    pub contribution_escalation_pct: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeterministicGoalOutput {
    /// First-month contribution; later months escalate from it.
    pub required_monthly_contribution: Money,
    pub nominal_target: Money,
    pub future_value_of_initial: Money,
    pub shortfall_to_fund: Money,
}

/// Solve for the first monthly contribution that, escalating every month,
/// lands a deterministic projection exactly on the real target.
pub fn solve_deterministic_contribution(
    input: &DeterministicGoalInput,
) -> FinicoResult<ComputationOutput<DeterministicGoalOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    require_non_negative("initial_balance", input.initial_balance)?;
    require_finite("target", input.target)?;
    require_finite("annual_return_pct", input.annual_return_pct)?;
    require_non_negative("annual_inflation_pct", input.annual_inflation_pct)?;
    require_non_negative("annual_fee_pct", input.annual_fee_pct)?;
    require_non_negative(
        "contribution_escalation_pct",
        input.contribution_escalation_pct,
    )?;
    let n = horizon_months("horizon_years", input.horizon_years)?;

    let r_eff = monthly_fraction_from_annual(input.annual_return_pct)
        - monthly_fraction_from_annual(input.annual_fee_pct);
    let i_m = monthly_fraction_from_annual(input.annual_inflation_pct);
    let esc_m = monthly_fraction_from_annual(input.contribution_escalation_pct);

    let nominal_target = future_value(input.target, i_m, n);
    let future_value_of_initial = future_value(input.initial_balance, r_eff, n);
    let shortfall_to_fund = (nominal_target - future_value_of_initial).max(0.0);

    let factor = growing_annuity_factor(r_eff, esc_m, n);
    if !factor.is_finite() || factor <= 0.0 {
        return Err(FinicoError::invalid(
            "annual_return_pct",
            "Net return too low to accumulate contributions",
        ));
    }
    let required = shortfall_to_fund / factor;

    let output = DeterministicGoalOutput {
        required_monthly_contribution: required,
        nominal_target,
        future_value_of_initial,
        shortfall_to_fund,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deterministic Required Contribution (growing annuity)",
        &serde_json::json!({
            "horizon_months": n,
            "r_eff_month": r_eff,
            "i_month": i_m,
            "esc_month": esc_m,
        }),
        warnings,
        elapsed,
        output,
    ))
}
