use clap::Args;
use serde_json::Value;

use finico_core::budget::summary::{self, BudgetInput, NetWorthInput};

use crate::input;

/// Arguments for a budget summary
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for net-worth totals
#[derive(Args)]
pub struct NetWorthArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: BudgetInput = input::require_request(args.input.as_deref(), "a budget")?;
    let result = summary::summarize_budget(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_net_worth(args: NetWorthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: NetWorthInput =
        input::require_request(args.input.as_deref(), "net worth")?;
    let result = summary::net_worth(&request)?;
    Ok(serde_json::to_value(result)?)
}
