use finico_core::forecast::projection::{project_balances, ProjectionInput, RateMode};
use finico_core::rates::{annual_to_monthly_rate, monthly_fraction_from_annual, monthly_to_annual_rate};
use finico_core::time_value::{future_value, future_value_annuity};

// ===========================================================================
// Deterministic projection tests
// ===========================================================================

fn scenario() -> ProjectionInput {
    ProjectionInput {
        initial_balance: 10_000.0,
        monthly_contribution: 300.0,
        horizon_years: 20.0,
        annual_return_pct: Some(7.0),
        annual_inflation_pct: 2.5,
        annual_fee_pct: 0.0,
        contribution_escalation_pct: 0.0,
        rate_mode: RateMode::Annual,
        monthly_return_pct: None,
        monthly_inflation_pct: None,
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

#[test]
fn test_twenty_year_projection_has_241_points() {
    let out = project_balances(&scenario()).unwrap().result;
    assert_eq!(out.months.len(), 241);
    assert_eq!(out.balances_nominal.len(), 241);
    assert_eq!(out.balances_real.len(), 241);
    assert_eq!(out.balances_nominal[0], 10_000.0);
    assert_eq!(out.balances_real[0], 10_000.0);
}

#[test]
fn test_ending_matches_closed_form() {
    let out = project_balances(&scenario()).unwrap().result;
    let r = monthly_fraction_from_annual(7.0);
    let expected = future_value(10_000.0, r, 240) + future_value_annuity(300.0, r, 240);
    let rel = (out.ending_nominal - expected).abs() / expected;
    assert!(rel < 0.005, "ending={} closed form={expected}", out.ending_nominal);
}

#[test]
fn test_real_ending_deflated_by_cumulative_inflation() {
    let out = project_balances(&scenario()).unwrap().result;
    // Twenty years of 2.5% annual inflation compounded monthly.
    let deflator = 1.025_f64.powi(20);
    assert!((out.ending_real - out.ending_nominal / deflator).abs() < 1e-6 * out.ending_real);
    assert!(out.ending_real < out.ending_nominal);
}

#[test]
fn test_total_contributions_without_escalation() {
    let out = project_balances(&scenario()).unwrap().result;
    assert!((out.total_contributions - 72_000.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Frictions
// ---------------------------------------------------------------------------

#[test]
fn test_fee_lowers_ending_balance() {
    let base = project_balances(&scenario()).unwrap().result;
    let mut input = scenario();
    input.annual_fee_pct = 1.0;
    let with_fee = project_balances(&input).unwrap().result;
    assert!(with_fee.ending_nominal < base.ending_nominal);
}

#[test]
fn test_escalation_raises_contributions() {
    let base = project_balances(&scenario()).unwrap().result;
    let mut input = scenario();
    input.contribution_escalation_pct = 3.0;
    let escalated = project_balances(&input).unwrap().result;
    assert!(escalated.total_contributions > base.total_contributions);
    assert!(escalated.ending_nominal > base.ending_nominal);
}

#[test]
fn test_monthly_mode_matches_equivalent_annual() {
    let annual = project_balances(&scenario()).unwrap().result;
    let mut input = scenario();
    input.rate_mode = RateMode::Monthly;
    input.monthly_return_pct = Some(annual_to_monthly_rate(7.0));
    input.monthly_inflation_pct = Some(annual_to_monthly_rate(2.5));
    let monthly = project_balances(&input).unwrap().result;
    let rel = (monthly.ending_real - annual.ending_real).abs() / annual.ending_real;
    assert!(rel < 1e-10);
}

#[test]
fn test_monthly_literal_is_not_reconverted() {
    let mut input = scenario();
    input.rate_mode = RateMode::Monthly;
    input.monthly_return_pct = Some(0.5);
    input.monthly_inflation_pct = Some(0.0);
    let out = project_balances(&input).unwrap().result;
    assert!((out.meta.r_month - 0.005).abs() < 1e-15);
    // The annualized figure implied by the literal monthly rate.
    assert!((monthly_to_annual_rate(0.5) - 6.1678).abs() < 1e-3);
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[test]
fn test_envelope_metadata() {
    let out = project_balances(&scenario()).unwrap();
    assert_eq!(out.metadata.precision, "ieee754_f64");
    assert!(out.warnings.is_empty());
    assert_eq!(out.assumptions["horizon_months"], 240);
}

#[test]
fn test_json_round_trip_of_output() {
    let out = project_balances(&scenario()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["months"].as_array().unwrap().len(), 241);
    assert!(json["result"]["meta"]["r_month"].as_f64().unwrap() > 0.0);
}
