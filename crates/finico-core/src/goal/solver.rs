use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinicoError;
use crate::monte_carlo::paths::{resolve_base_seed, MonthlyDynamics, ReturnSampler, TerminalFactors};
use crate::types::{
    require_finite, require_horizon_years, require_non_negative, require_positive, with_metadata,
    ComputationOutput, Money, Percent,
};
use crate::FinicoResult;

/// Slack applied when comparing a measured success rate with the target.
const PROBABILITY_EPSILON: f64 = 1e-12;

/// Default ceiling on the monthly contribution, as a multiple of the target.
const DEFAULT_CAP_MULTIPLE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the Monte Carlo required-contribution solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionSolveInput {
    #[serde(alias = "initial")]
    pub initial_balance: Money,
    /// Goal in real (today's) money.
    #[serde(alias = "target_amount")]
    pub target: Money,
    #[serde(alias = "years")]
    pub horizon_years: u32,
    pub simulations: u32,
    #[serde(alias = "annual_return_pct")]
    pub mean_annual_return_pct: Percent,
    pub stdev_annual_return_pct: Percent,
    pub annual_inflation_pct: Percent,
    #[serde(default)]
    pub annual_fee_pct: Percent,
    /// Required share of paths meeting the target, strictly between 0 and 1.
    #[serde(alias = "target_prob")]
    pub target_success_probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Stop once the bracket is narrower than this many currency units.
    #[serde(default = "default_tolerance")]
    pub tolerance: Money,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Largest monthly contribution the bracket may expand to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_contribution: Option<Money>,
}

fn default_tolerance() -> Money {
    1.0
}

fn default_max_iterations() -> u32 {
    40
}

/// One bisection step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveIteration {
    pub iteration: u32,
    pub lower_bound: Money,
    pub upper_bound: Money,
    pub candidate: Money,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSolveOutput {
    pub required_monthly_contribution: Money,
    pub used_simulations: u32,
    /// Success rate measured at `required_monthly_contribution`.
    pub achieved_probability: f64,
    pub converged: bool,
    pub bracket_expansions: u32,
    pub iterations: Vec<SolveIteration>,
}

impl ContributionSolveInput {
    fn validate(&self) -> FinicoResult<()> {
        if self.simulations == 0 {
            return Err(FinicoError::invalid("simulations", "Must be at least 1"));
        }
        require_horizon_years("horizon_years", self.horizon_years)?;
        require_non_negative("initial_balance", self.initial_balance)?;
        require_finite("target", self.target)?;
        require_finite("mean_annual_return_pct", self.mean_annual_return_pct)?;
        require_non_negative("stdev_annual_return_pct", self.stdev_annual_return_pct)?;
        require_finite("annual_inflation_pct", self.annual_inflation_pct)?;
        require_non_negative("annual_fee_pct", self.annual_fee_pct)?;
        require_finite("target_success_probability", self.target_success_probability)?;
        if self.target_success_probability <= 0.0 || self.target_success_probability >= 1.0 {
            return Err(FinicoError::invalid(
                "target_success_probability",
                "Must be strictly between 0 and 1",
            ));
        }
        require_positive("tolerance", self.tolerance)?;
        if self.max_iterations == 0 {
            return Err(FinicoError::invalid("max_iterations", "Must be > 0"));
        }
        if let Some(cap) = self.max_contribution {
            require_positive("max_contribution", cap)?;
        }
        Ok(())
    }

    fn contribution_cap(&self) -> Money {
        self.max_contribution
            .unwrap_or(DEFAULT_CAP_MULTIPLE * self.target.max(1.0))
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Find the smallest monthly contribution whose simulated success rate at the
/// horizon reaches `target_success_probability`.
///
/// All trials share one set of return paths (common random numbers), which
/// makes the success rate monotone in the contribution and the bisection
/// stable. Returns the upper end of the final bracket, so the reported
/// contribution always meets the target.
pub fn solve_required_contribution(
    input: &ContributionSolveInput,
) -> FinicoResult<ComputationOutput<ContributionSolveOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    input.validate()?;

    let dynamics = MonthlyDynamics::from_annual(
        input.mean_annual_return_pct,
        input.stdev_annual_return_pct,
        input.annual_inflation_pct,
        input.annual_fee_pct,
    );
    let sampler = ReturnSampler::new(&dynamics)?;
    let base_seed = resolve_base_seed(input.seed);
    let factors = TerminalFactors::generate(
        &sampler,
        dynamics.inflation,
        input.horizon_years,
        input.simulations as usize,
        base_seed,
    );

    let p_target = input.target_success_probability;
    let meets = |rate: f64| rate + PROBABILITY_EPSILON >= p_target;
    let success = |contribution: Money| {
        factors.success_rate(input.initial_balance, contribution, input.target)
    };

    let mut iterations = Vec::with_capacity(input.max_iterations as usize);
    let mut bracket_expansions = 0_u32;

    let at_zero = success(0.0);
    let (required, achieved, converged) = if meets(at_zero) {
        tracing::debug!(rate = at_zero, "goal already met without contributions");
        (0.0, at_zero, true)
    } else {
        let cap = input.contribution_cap();
        let months = f64::from(input.horizon_years * 12);
        let mut lo = 0.0_f64;
        let mut hi = (input.target / months).max(1.0).min(cap);
        let mut hi_rate = success(hi);

        while !meets(hi_rate) {
            if hi >= cap {
                return Err(FinicoError::GoalUnreachableWithinBounds {
                    target_probability: p_target,
                    best_probability: hi_rate,
                    max_contribution: cap,
                });
            }
            lo = hi;
            hi = (hi * 2.0).min(cap);
            hi_rate = success(hi);
            bracket_expansions += 1;
        }

        let mut converged = false;
        for it in 1..=input.max_iterations {
            if hi - lo < input.tolerance {
                converged = true;
                break;
            }
            let mid = (lo + hi) * 0.5;
            let rate = success(mid);
            tracing::debug!(iteration = it, lo, hi, mid, rate, "bisection step");
            iterations.push(SolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate: mid,
                success_rate: rate,
            });
            if meets(rate) {
                hi = mid;
                hi_rate = rate;
            } else {
                lo = mid;
            }
        }
        if hi - lo < input.tolerance {
            converged = true;
        }
        (hi, hi_rate, converged)
    };

    let output = ContributionSolveOutput {
        required_monthly_contribution: required,
        used_simulations: input.simulations,
        achieved_probability: achieved,
        converged,
        bracket_expansions,
        iterations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Required Contribution (bisection, common random numbers)",
        &serde_json::json!({
            "target_real": input.target,
            "target_success_probability": p_target,
            "horizon_months": input.horizon_years * 12,
            "simulations": input.simulations,
            "tolerance": input.tolerance,
            "seed": base_seed,
        }),
        warnings,
        elapsed,
        output,
    ))
}
