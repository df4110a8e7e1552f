use clap::Args;
use serde_json::Value;

use finico_core::monte_carlo::simulation::{self, MonteCarloInput};

use crate::config::CliConfig;
use crate::input;

/// Arguments for a Monte Carlo wealth simulation
#[derive(Args)]
pub struct MonteCarloArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the number of simulated paths
    #[arg(long)]
    pub simulations: Option<u32>,

    /// Override the RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_monte_carlo(
    args: MonteCarloArgs,
    config: &CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: MonteCarloInput =
        input::require_request(args.input.as_deref(), "Monte Carlo simulation")?;
    if let Some(sims) = args.simulations {
        request.simulations = sims;
    }
    if args.seed.is_some() {
        request.seed = args.seed;
    }
    config.check_simulations(request.simulations)?;
    tracing::debug!(
        simulations = request.simulations,
        seed = ?request.seed,
        "running wealth simulation"
    );

    let result = simulation::run_wealth_simulation(&request)?;
    Ok(serde_json::to_value(result)?)
}
