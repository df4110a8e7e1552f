use clap::Args;
use serde_json::Value;

use finico_core::forecast::projection::{self, ProjectionInput};

use crate::input;

/// Arguments for a deterministic projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ProjectionInput =
        input::require_request(args.input.as_deref(), "a projection")?;
    let result = projection::project_balances(&request)?;
    Ok(serde_json::to_value(result)?)
}
