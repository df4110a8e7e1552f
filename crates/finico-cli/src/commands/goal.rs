use clap::Args;
use serde_json::Value;

use finico_core::goal::deterministic::{self, DeterministicGoalInput};
use finico_core::goal::solver::{self, ContributionSolveInput};

use crate::config::CliConfig;
use crate::input;

/// Arguments for the Monte Carlo required-contribution solver
#[derive(Args)]
pub struct SolveContributionArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the RNG seed for a reproducible solve
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the closed-form deterministic goal
#[derive(Args)]
pub struct GoalDeterministicArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_solve_contribution(
    args: SolveContributionArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: ContributionSolveInput =
        input::require_request(args.input.as_deref(), "the contribution solver")?;
    if args.seed.is_some() {
        request.seed = args.seed;
    }
    config.check_simulations(request.simulations)?;
    tracing::debug!(
        simulations = request.simulations,
        probability = request.target_success_probability,
        "solving required contribution"
    );

    let result = solver::solve_required_contribution(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_goal_deterministic(
    args: GoalDeterministicArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: DeterministicGoalInput =
        input::require_request(args.input.as_deref(), "a deterministic goal")?;
    let result = deterministic::solve_deterministic_contribution(&request)?;
    Ok(serde_json::to_value(result)?)
}
