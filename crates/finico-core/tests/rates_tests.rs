use finico_core::rates::{
    annual_to_monthly_rate, annual_to_monthly_sigma, monthly_sigma_to_annual,
    monthly_to_annual_rate, RateSpec,
};

// ---------------------------------------------------------------------------
// Rate conversion
// ---------------------------------------------------------------------------

#[test]
fn test_rate_spec_mirrors() {
    let annual = RateSpec::Annual(12.0);
    assert!((annual.monthly_pct() - annual_to_monthly_rate(12.0)).abs() < 1e-15);
    let monthly = RateSpec::Monthly(1.0);
    assert!((monthly.annual_pct() - 12.682503013196977).abs() < 1e-9);
}

#[test]
fn test_sigma_scaling() {
    assert!((annual_to_monthly_sigma(12.0) - 12.0 / 12f64.sqrt()).abs() < 1e-12);
    assert!((monthly_sigma_to_annual(annual_to_monthly_sigma(18.0)) - 18.0).abs() < 1e-12);
}

#[test]
fn test_seven_percent_matches_projection_rate() {
    // The projector's monthly growth for 7% a year compounds back to 7%.
    let monthly = annual_to_monthly_rate(7.0);
    assert!((monthly_to_annual_rate(monthly) - 7.0).abs() < 1e-9);
    let grown = (1.0 + monthly / 100.0).powi(12);
    assert!((grown - 1.07).abs() < 1e-12);
}
