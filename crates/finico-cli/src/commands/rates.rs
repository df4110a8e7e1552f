use clap::Args;
use serde_json::{json, Value};

use finico_core::rates::{self, RateSpec};

/// Arguments for converting a rate between annual and monthly terms
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ConvertRateArgs {
    /// Annual rate in percent
    #[arg(long, conflicts_with = "monthly", required_unless_present = "monthly")]
    pub annual: Option<f64>,

    /// Monthly rate in percent
    #[arg(long)]
    pub monthly: Option<f64>,

    /// Volatility in percent, scaled alongside the rate
    #[arg(long)]
    pub sigma: Option<f64>,
}

pub fn run_convert_rate(args: ConvertRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spec = match (args.annual, args.monthly) {
        (Some(annual), _) => RateSpec::Annual(annual),
        (None, Some(monthly)) => RateSpec::Monthly(monthly),
        (None, None) => return Err("--annual or --monthly is required".into()),
    };
    if !spec.annual_pct().is_finite() || !spec.monthly_pct().is_finite() {
        return Err("rate must be a finite number".into());
    }

    let mut result = json!({
        "input": spec,
        "annual_pct": spec.annual_pct(),
        "monthly_pct": spec.monthly_pct(),
    });
    if let Some(sigma) = args.sigma {
        let (annual_sigma, monthly_sigma) = match spec {
            RateSpec::Annual(_) => (sigma, rates::annual_to_monthly_sigma(sigma)),
            RateSpec::Monthly(_) => (rates::monthly_sigma_to_annual(sigma), sigma),
        };
        result["annual_sigma_pct"] = json!(annual_sigma);
        result["monthly_sigma_pct"] = json!(monthly_sigma);
    }
    Ok(json!({ "result": result }))
}
