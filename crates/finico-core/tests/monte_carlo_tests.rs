use finico_core::monte_carlo::simulation::{
    percentile_sorted, run_wealth_simulation, GoalCheck, MonteCarloInput,
};
use finico_core::MAX_HORIZON_YEARS;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SEED: u64 = 42;

fn basic_input() -> MonteCarloInput {
    MonteCarloInput {
        initial_balance: 25_000.0,
        monthly_contribution: 500.0,
        horizon_years: 15,
        simulations: 2_000,
        mean_annual_return_pct: 7.0,
        stdev_annual_return_pct: 15.0,
        annual_inflation_pct: 2.5,
        annual_fee_pct: 0.0,
        goal: Some(GoalCheck {
            target: 150_000.0,
            year: 15,
        }),
        seed: Some(SEED),
    }
}

// ---------------------------------------------------------------------------
// Reproducibility
// ---------------------------------------------------------------------------

#[test]
fn test_fixed_seed_reproduces_output() {
    let a = run_wealth_simulation(&basic_input()).unwrap().result;
    let b = run_wealth_simulation(&basic_input()).unwrap().result;
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_differ() {
    let a = run_wealth_simulation(&basic_input()).unwrap().result;
    let mut input = basic_input();
    input.seed = Some(SEED + 1);
    let b = run_wealth_simulation(&input).unwrap().result;
    assert_ne!(a.ending.p50, b.ending.p50);
}

#[test]
fn test_seed_reported_in_assumptions() {
    let out = run_wealth_simulation(&basic_input()).unwrap();
    assert_eq!(out.assumptions["seed"], SEED);
}

// ---------------------------------------------------------------------------
// Distribution shape
// ---------------------------------------------------------------------------

#[test]
fn test_percentiles_ordered_every_year() {
    let out = run_wealth_simulation(&basic_input()).unwrap().result;
    assert_eq!(out.years, (0..=15).collect::<Vec<u32>>());
    for band in &out.yearly_percentiles {
        assert!(band.p5 <= band.p10);
        assert!(band.p10 <= band.p50);
        assert!(band.p50 <= band.p90);
        assert!(band.p90 <= band.p95);
    }
}

#[test]
fn test_band_widens_with_horizon() {
    let out = run_wealth_simulation(&basic_input()).unwrap().result;
    let early = out.yearly_percentiles[1];
    let late = out.yearly_percentiles[15];
    assert!(late.p95 - late.p5 > early.p95 - early.p5);
}

#[test]
fn test_fee_drag_lowers_median() {
    let base = run_wealth_simulation(&basic_input()).unwrap().result;
    let mut input = basic_input();
    input.annual_fee_pct = 1.0;
    let with_fee = run_wealth_simulation(&input).unwrap().result;
    assert!(with_fee.ending.p50 < base.ending.p50);
}

#[test]
fn test_median_near_deterministic_real_path() {
    let mut input = basic_input();
    input.stdev_annual_return_pct = 0.0;
    input.simulations = 10;
    let out = run_wealth_simulation(&input).unwrap().result;
    let band = out.ending;
    assert_eq!(band.p5, band.p95);
    assert!(band.p50 > 25_000.0);
}

// ---------------------------------------------------------------------------
// Goal statistics
// ---------------------------------------------------------------------------

#[test]
fn test_goal_probability_bounded() {
    let out = run_wealth_simulation(&basic_input()).unwrap().result;
    let goal = out.goal.unwrap();
    assert!((0.0..=1.0).contains(&goal.success_probability));
    assert!(goal.expected_shortfall >= 0.0);
}

#[test]
fn test_non_positive_goal_always_met() {
    let mut input = basic_input();
    input.goal = Some(GoalCheck {
        target: 0.0,
        year: 5,
    });
    let goal = run_wealth_simulation(&input).unwrap().result.goal.unwrap();
    assert_eq!(goal.success_probability, 1.0);
    assert_eq!(goal.expected_shortfall, 0.0);
}

#[test]
fn test_higher_contribution_raises_success() {
    let low = run_wealth_simulation(&basic_input()).unwrap().result;
    let mut input = basic_input();
    input.monthly_contribution = 1_500.0;
    let high = run_wealth_simulation(&input).unwrap().result;
    assert!(
        high.goal.unwrap().success_probability >= low.goal.unwrap().success_probability
    );
}

#[test]
fn test_nested_goal_deserializes() {
    let input: MonteCarloInput = serde_json::from_value(serde_json::json!({
        "initial": 1_000.0,
        "monthly": 100.0,
        "years": 5,
        "mean_annual_return_pct": 6.0,
        "stdev_annual_return_pct": 12.0,
        "annual_inflation_pct": 2.0,
        "goal": { "goal_target": 10_000.0, "goal_year": 5 },
    }))
    .unwrap();
    assert_eq!(input.simulations, 1_000);
    assert_eq!(
        input.goal,
        Some(GoalCheck {
            target: 10_000.0,
            year: 5
        })
    );
}

#[test]
fn test_flat_goal_fields_deserialize() {
    let input: MonteCarloInput = serde_json::from_value(serde_json::json!({
        "initial_balance": 1_000.0,
        "monthly_contribution": 100.0,
        "horizon_years": 5,
        "simulations": 100,
        "mean_annual_return_pct": 6.0,
        "stdev_annual_return_pct": 12.0,
        "annual_inflation_pct": 2.0,
        "goal_target": 1e9,
        "goal_year": 5,
        "seed": 1,
    }))
    .unwrap();
    assert_eq!(
        input.goal,
        Some(GoalCheck {
            target: 1e9,
            year: 5
        })
    );

    let goal = run_wealth_simulation(&input).unwrap().result.goal.unwrap();
    assert_eq!(goal.year, 5);
    assert_eq!(goal.success_probability, 0.0);
    assert!(goal.expected_shortfall > 0.0);
}

#[test]
fn test_half_a_flat_goal_rejected() {
    let base = serde_json::json!({
        "initial_balance": 1_000.0,
        "monthly_contribution": 100.0,
        "horizon_years": 5,
        "mean_annual_return_pct": 6.0,
        "stdev_annual_return_pct": 12.0,
        "annual_inflation_pct": 2.0,
    });

    let mut target_only = base.clone();
    target_only["goal_target"] = serde_json::json!(10_000.0);
    let err = serde_json::from_value::<MonteCarloInput>(target_only).unwrap_err();
    assert!(err.to_string().contains("goal_year"));

    let mut year_only = base.clone();
    year_only["goal_year"] = serde_json::json!(5);
    assert!(serde_json::from_value::<MonteCarloInput>(year_only).is_err());

    let mut both_shapes = base;
    both_shapes["goal_target"] = serde_json::json!(10_000.0);
    both_shapes["goal_year"] = serde_json::json!(5);
    both_shapes["goal"] = serde_json::json!({ "target": 10_000.0, "year": 5 });
    assert!(serde_json::from_value::<MonteCarloInput>(both_shapes).is_err());
}

#[test]
fn test_serialized_input_reads_back() {
    let input = basic_input();
    let back: MonteCarloInput =
        serde_json::from_value(serde_json::to_value(&input).unwrap()).unwrap();
    assert_eq!(back.goal, input.goal);
    assert_eq!(back.seed, input.seed);
}

#[test]
fn test_horizon_beyond_limit_rejected() {
    let mut input = basic_input();
    input.goal = None;
    input.horizon_years = MAX_HORIZON_YEARS + 1;
    let err = run_wealth_simulation(&input).unwrap_err();
    assert!(err.to_string().contains("horizon_years"));

    input.horizon_years = u32::MAX;
    assert!(run_wealth_simulation(&input).is_err());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_percentiles_monotone(mut values in prop::collection::vec(-1e9f64..1e9, 1..200)) {
        values.sort_by(|a, b| a.total_cmp(b));
        let p5 = percentile_sorted(&values, 5.0);
        let p50 = percentile_sorted(&values, 50.0);
        let p95 = percentile_sorted(&values, 95.0);
        prop_assert!(p5 <= p50);
        prop_assert!(p50 <= p95);
        prop_assert!(values[0] <= p5);
        prop_assert!(p95 <= values[values.len() - 1]);
    }
}
