use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinicoError;
use crate::monte_carlo::paths::{
    resolve_base_seed, simulate_real_grid, year_deflators, MonthlyDynamics, ReturnSampler,
};
use crate::types::{
    flag_numeric_instability, require_finite, require_horizon_years, require_non_negative,
    with_metadata, ComputationOutput, Money, Percent,
};
use crate::FinicoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Goal to score at a given year of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalCheck {
    /// Target in real (today's) money.
    #[serde(alias = "goal_target")]
    pub target: Money,
    /// Year at which the target is tested, between 1 and the horizon.
    #[serde(alias = "goal_year")]
    pub year: u32,
}

/// Input for a Monte Carlo wealth simulation.
///
/// The goal may arrive nested as `goal: {target, year}` or flat as a
/// top-level `goal_target`/`goal_year` pair; both halves of the flat pair are
/// required together.
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloInput {
    pub initial_balance: Money,
    /// Held constant for the whole horizon.
    pub monthly_contribution: Money,
    pub horizon_years: u32,
    pub simulations: u32,
    pub mean_annual_return_pct: Percent,
    pub stdev_annual_return_pct: Percent,
    pub annual_inflation_pct: Percent,
    pub annual_fee_pct: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalCheck>,
    /// Optional seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_simulations() -> u32 {
    1_000
}

// Custom Deserialize implementation folding the flat goal pair into `goal`
impl<'de> Deserialize<'de> for MonteCarloInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct MonteCarloInputData {
            #[serde(alias = "initial")]
            initial_balance: Money,
            #[serde(alias = "monthly", alias = "monthly_contrib")]
            monthly_contribution: Money,
            #[serde(alias = "years")]
            horizon_years: u32,
            #[serde(default = "default_simulations")]
            simulations: u32,
            mean_annual_return_pct: Percent,
            stdev_annual_return_pct: Percent,
            annual_inflation_pct: Percent,
            #[serde(default)]
            annual_fee_pct: Percent,
            #[serde(default)]
            goal: Option<GoalCheck>,
            #[serde(default)]
            goal_target: Option<Money>,
            #[serde(default)]
            goal_year: Option<u32>,
            #[serde(default)]
            seed: Option<u64>,
        }

        let data = MonteCarloInputData::deserialize(deserializer)?;
        let flat = match (data.goal_target, data.goal_year) {
            (Some(target), Some(year)) => Some(GoalCheck { target, year }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(serde::de::Error::custom(
                    "goal_target requires goal_year",
                ))
            }
            (None, Some(_)) => {
                return Err(serde::de::Error::custom(
                    "goal_year requires goal_target",
                ))
            }
        };
        let goal = match (data.goal, flat) {
            (Some(_), Some(_)) => {
                return Err(serde::de::Error::custom(
                    "goal given both nested and as goal_target/goal_year",
                ))
            }
            (nested, flat) => nested.or(flat),
        };

        Ok(MonteCarloInput {
            initial_balance: data.initial_balance,
            monthly_contribution: data.monthly_contribution,
            horizon_years: data.horizon_years,
            simulations: data.simulations,
            mean_annual_return_pct: data.mean_annual_return_pct,
            stdev_annual_return_pct: data.stdev_annual_return_pct,
            annual_inflation_pct: data.annual_inflation_pct,
            annual_fee_pct: data.annual_fee_pct,
            goal,
            seed: data.seed,
        })
    }
}

/// Percentile band of real balances at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub p5: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
}

/// Goal statistics at the goal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalOutcome {
    pub target: Money,
    pub year: u32,
    pub success_probability: f64,
    /// Mean deficit over failing paths only; 0 when no path fails.
    pub expected_shortfall: Money,
}

/// Output of a Monte Carlo wealth simulation. All balances are real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloOutput {
    pub years: Vec<u32>,
    pub yearly_percentiles: Vec<PercentileBand>,
    pub ending: PercentileBand,
    pub simulations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalOutcome>,
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Compute the percentile value from a **sorted** slice using linear interpolation.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        let (lo, hi) = (sorted[lower], sorted[upper]);
        // Kept inside [lo, hi] so bands stay ordered under rounding.
        (lo + (hi - lo) * frac).max(lo).min(hi)
    }
}

fn band_from_sorted(sorted: &[f64]) -> PercentileBand {
    PercentileBand {
        p5: percentile_sorted(sorted, 5.0),
        p10: percentile_sorted(sorted, 10.0),
        p50: percentile_sorted(sorted, 50.0),
        p90: percentile_sorted(sorted, 90.0),
        p95: percentile_sorted(sorted, 95.0),
    }
}

/// Success probability and expected shortfall of `balances` against `target`.
pub fn score_goal(balances: &[f64], target: Money) -> (f64, Money) {
    if balances.is_empty() {
        return (0.0, 0.0);
    }
    // A non-positive wealth target is met by construction.
    if target <= 0.0 {
        return (1.0, 0.0);
    }

    let mut successes = 0_usize;
    let mut deficit_sum = 0.0_f64;
    for &balance in balances {
        if balance >= target {
            successes += 1;
        } else {
            deficit_sum += target - balance;
        }
    }

    let failures = balances.len() - successes;
    let shortfall = if failures == 0 {
        0.0
    } else {
        deficit_sum / failures as f64
    };
    (successes as f64 / balances.len() as f64, shortfall)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl MonteCarloInput {
    fn validate(&self) -> FinicoResult<()> {
        if self.simulations == 0 {
            return Err(FinicoError::invalid("simulations", "Must be at least 1"));
        }
        require_horizon_years("horizon_years", self.horizon_years)?;
        require_finite("initial_balance", self.initial_balance)?;
        require_finite("monthly_contribution", self.monthly_contribution)?;
        require_finite("mean_annual_return_pct", self.mean_annual_return_pct)?;
        require_non_negative("stdev_annual_return_pct", self.stdev_annual_return_pct)?;
        require_finite("annual_inflation_pct", self.annual_inflation_pct)?;
        require_non_negative("annual_fee_pct", self.annual_fee_pct)?;
        if let Some(goal) = &self.goal {
            require_finite("goal.target", goal.target)?;
            if goal.year == 0 || goal.year > self.horizon_years {
                return Err(FinicoError::invalid(
                    "goal.year",
                    format!("Must be between 1 and {}", self.horizon_years),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate wealth paths under normally distributed monthly returns.
///
/// Each path compounds a random monthly return and adds a fixed monthly
/// contribution; balances are deflated by a deterministic inflation index and
/// summarised per year as p5/p10/p50/p90/p95. When a goal is supplied the
/// share of paths meeting it and the mean shortfall of the rest are reported.
pub fn run_wealth_simulation(
    input: &MonteCarloInput,
) -> FinicoResult<ComputationOutput<MonteCarloOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;

    let dynamics = MonthlyDynamics::from_annual(
        input.mean_annual_return_pct,
        input.stdev_annual_return_pct,
        input.annual_inflation_pct,
        input.annual_fee_pct,
    );
    let sampler = ReturnSampler::new(&dynamics)?;
    let base_seed = resolve_base_seed(input.seed);
    let deflators = year_deflators(dynamics.inflation, input.horizon_years);
    let sims = input.simulations as usize;
    let width = deflators.len();

    tracing::debug!(
        simulations = sims,
        months = input.horizon_years * 12,
        mu = dynamics.mu,
        sigma = dynamics.sigma,
        "monte carlo simulation"
    );

    let grid = simulate_real_grid(
        &sampler,
        &deflators,
        input.initial_balance,
        input.monthly_contribution,
        sims,
        base_seed,
    );

    let mut yearly_percentiles = Vec::with_capacity(width);
    let mut goal = None;
    let mut column = vec![0.0_f64; sims];

    for year in 0..width {
        for (path, slot) in column.iter_mut().enumerate() {
            *slot = grid[path * width + year];
        }

        if let Some(check) = input.goal.filter(|g| g.year as usize == year) {
            let (success_probability, expected_shortfall) = score_goal(&column, check.target);
            goal = Some(GoalOutcome {
                target: check.target,
                year: check.year,
                success_probability,
                expected_shortfall,
            });
        }

        column.sort_by(|a, b| a.total_cmp(b));
        yearly_percentiles.push(band_from_sorted(&column));
    }

    flag_numeric_instability("terminal real balances", &column, &mut warnings);

    let ending = yearly_percentiles
        .last()
        .copied()
        .unwrap_or_else(|| band_from_sorted(&[input.initial_balance]));

    let output = MonteCarloOutput {
        years: (0..=input.horizon_years).collect(),
        yearly_percentiles,
        ending,
        simulations: input.simulations,
        goal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Wealth Simulation (normal monthly returns)",
        &serde_json::json!({
            "simulations": input.simulations,
            "horizon_months": input.horizon_years * 12,
            "mu_month": dynamics.mu,
            "sigma_month": dynamics.sigma,
            "i_month": dynamics.inflation,
            "seed": base_seed,
            "percentile_method": "linear_interpolation",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
