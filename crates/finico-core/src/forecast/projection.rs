use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinicoError;
use crate::rates::{monthly_fraction_from_annual, RateSpec};
use crate::types::{
    flag_numeric_instability, require_finite, require_non_negative, require_positive,
    with_metadata, ComputationOutput, Fraction, Money, Percent, MAX_HORIZON_YEARS,
};
use crate::FinicoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which representation of the return/inflation assumption is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMode {
    #[default]
    Annual,
    /// Use `monthly_return_pct` / `monthly_inflation_pct` exactly as given.
    Monthly,
}

/// Input for a deterministic monthly projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    #[serde(alias = "initial")]
    pub initial_balance: Money,
    #[serde(alias = "monthly", alias = "monthly_contrib")]
    pub monthly_contribution: Money,
    /// Horizon in years; may be fractional as long as it is a whole number of months.
    #[serde(alias = "years")]
    pub horizon_years: f64,
    /// Required when `rate_mode` is annual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_return_pct: Option<Percent>,
    #[serde(default)]
    pub annual_inflation_pct: Percent,
    #[serde(default)]
    pub annual_fee_pct: Percent,
    #[serde(default, alias = "contrib_escalation_pct")]
    pub contribution_escalation_pct: Percent,
    #[serde(default)]
    pub rate_mode: RateMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_return_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_inflation_pct: Option<Percent>,
}

/// Monthly-equivalent rates actually applied, as decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMeta {
    pub r_month: Fraction,
    pub i_month: Fraction,
    pub fee_month: Fraction,
    pub esc_month: Fraction,
}

/// Month-by-month nominal and real balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub months: Vec<u32>,
    pub balances_nominal: Vec<Money>,
    pub balances_real: Vec<Money>,
    pub ending_nominal: Money,
    pub ending_real: Money,
    pub total_contributions: Money,
    pub meta: ProjectionMeta,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a horizon in years to a whole, positive number of months.
pub(crate) fn horizon_months(field: &str, years: f64) -> FinicoResult<u32> {
    require_positive(field, years)?;
    if years > f64::from(MAX_HORIZON_YEARS) {
        return Err(FinicoError::invalid(
            field,
            format!("Must not exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    let months = years * 12.0;
    let whole = months.round();
    if (months - whole).abs() > 1e-9 || whole < 1.0 {
        return Err(FinicoError::invalid(
            field,
            "Must cover a whole number of months (at least one)",
        ));
    }
    Ok(whole as u32)
}

impl ProjectionInput {
    fn validate(&self) -> FinicoResult<u32> {
        require_non_negative("initial_balance", self.initial_balance)?;
        require_non_negative("monthly_contribution", self.monthly_contribution)?;
        require_non_negative("annual_inflation_pct", self.annual_inflation_pct)?;
        require_non_negative("annual_fee_pct", self.annual_fee_pct)?;
        require_non_negative(
            "contribution_escalation_pct",
            self.contribution_escalation_pct,
        )?;
        horizon_months("horizon_years", self.horizon_years)
    }

    /// Resolve the monthly return and inflation specs honouring `rate_mode`.
    fn rate_specs(&self) -> FinicoResult<(RateSpec, RateSpec)> {
        match self.rate_mode {
            RateMode::Annual => {
                let r = self.annual_return_pct.ok_or_else(|| {
                    FinicoError::invalid("annual_return_pct", "Required when rate_mode is annual")
                })?;
                require_finite("annual_return_pct", r)?;
                Ok((
                    RateSpec::Annual(r),
                    RateSpec::Annual(self.annual_inflation_pct),
                ))
            }
            RateMode::Monthly => {
                let r = self.monthly_return_pct.ok_or_else(|| {
                    FinicoError::invalid(
                        "monthly_return_pct",
                        "Required when rate_mode is monthly",
                    )
                })?;
                let i = self.monthly_inflation_pct.ok_or_else(|| {
                    FinicoError::invalid(
                        "monthly_inflation_pct",
                        "Required when rate_mode is monthly",
                    )
                })?;
                require_finite("monthly_return_pct", r)?;
                require_non_negative("monthly_inflation_pct", i)?;
                Ok((RateSpec::Monthly(r), RateSpec::Monthly(i)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project a balance month by month under deterministic growth, fee drag,
/// inflation and geometric contribution escalation.
pub fn project_balances(
    input: &ProjectionInput,
) -> FinicoResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let n_months = input.validate()?;
    let (return_spec, inflation_spec) = input.rate_specs()?;

    let meta = ProjectionMeta {
        r_month: return_spec.monthly_fraction(),
        i_month: inflation_spec.monthly_fraction(),
        fee_month: monthly_fraction_from_annual(input.annual_fee_pct),
        esc_month: monthly_fraction_from_annual(input.contribution_escalation_pct),
    };
    let growth = 1.0 + (meta.r_month - meta.fee_month);

    tracing::debug!(
        months = n_months,
        r_eff = meta.r_month - meta.fee_month,
        "deterministic projection"
    );

    let len = n_months as usize + 1;
    let mut balances_nominal = Vec::with_capacity(len);
    let mut balances_real = Vec::with_capacity(len);
    balances_nominal.push(input.initial_balance);
    balances_real.push(input.initial_balance);

    let mut balance = input.initial_balance;
    let mut contribution = input.monthly_contribution;
    let mut price_index = 1.0_f64;
    let mut total_contributions = 0.0_f64;

    for _ in 1..=n_months {
        balance = balance * growth + contribution;
        total_contributions += contribution;
        price_index *= 1.0 + meta.i_month;
        contribution *= 1.0 + meta.esc_month;

        balances_nominal.push(balance);
        balances_real.push(balance / price_index);
    }

    flag_numeric_instability("balances_nominal", &balances_nominal, &mut warnings);

    let output = ProjectionOutput {
        months: (0..=n_months).collect(),
        ending_nominal: balance,
        ending_real: balance / price_index,
        total_contributions,
        balances_nominal,
        balances_real,
        meta,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deterministic Monthly Compound Projection",
        &serde_json::json!({
            "horizon_months": n_months,
            "rate_mode": input.rate_mode,
            "annual_fee_pct": input.annual_fee_pct,
            "contribution_escalation_pct": input.contribution_escalation_pct,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
