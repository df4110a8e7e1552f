use clap::Args;
use serde_json::Value;

use finico_core::loan::amortization::{self, LoanInput, LoanTerms};

use crate::input;

/// Arguments for a loan amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<f64>,

    /// Annual percentage rate, e.g. 6.5
    #[arg(long, alias = "rate")]
    pub apr: Option<f64>,

    /// Term in years; solves for the payment
    #[arg(long, conflicts_with = "desired_payment")]
    pub years: Option<f64>,

    /// Payment per period; solves for the term
    #[arg(long)]
    pub desired_payment: Option<f64>,

    /// Payments per year (12 monthly, 26 bi-weekly, 1 yearly)
    #[arg(long, default_value_t = 12)]
    pub periods_per_year: u32,

    /// Extra principal paid every period
    #[arg(long, default_value_t = 0.0)]
    pub extra: f64,
}

fn from_flags(args: &AmortizeArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let terms = match (args.years, args.desired_payment) {
        (Some(years), None) => LoanTerms::SolvePayment { years },
        (None, Some(desired_payment)) => LoanTerms::SolveTerm { desired_payment },
        _ => return Err("one of --years or --desired-payment is required (or provide --input)".into()),
    };
    Ok(LoanInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args.apr.ok_or("--apr is required (or provide --input)")?,
        periods_per_year: args.periods_per_year,
        extra_payment_per_period: args.extra,
        terms,
    })
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LoanInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => from_flags(&args)?,
    };
    let result = amortization::amortize_loan(&request)?;
    Ok(serde_json::to_value(result)?)
}
