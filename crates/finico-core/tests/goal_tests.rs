use finico_core::goal::deterministic::{solve_deterministic_contribution, DeterministicGoalInput};
use finico_core::goal::solver::{solve_required_contribution, ContributionSolveInput};
use finico_core::monte_carlo::simulation::{run_wealth_simulation, GoalCheck, MonteCarloInput};
use finico_core::{FinicoError, MAX_HORIZON_YEARS};

const SEED: u64 = 42;

fn solve_input(probability: f64) -> ContributionSolveInput {
    ContributionSolveInput {
        initial_balance: 20_000.0,
        target: 400_000.0,
        horizon_years: 20,
        simulations: 2_000,
        mean_annual_return_pct: 7.0,
        stdev_annual_return_pct: 15.0,
        annual_inflation_pct: 2.5,
        annual_fee_pct: 0.25,
        target_success_probability: probability,
        seed: Some(SEED),
        tolerance: 1.0,
        max_iterations: 40,
        max_contribution: None,
    }
}

// ---------------------------------------------------------------------------
// Monte Carlo solver
// ---------------------------------------------------------------------------

#[test]
fn test_higher_probability_needs_more() {
    let median = solve_required_contribution(&solve_input(0.5)).unwrap().result;
    let cautious = solve_required_contribution(&solve_input(0.9)).unwrap().result;
    assert!(median.converged && cautious.converged);
    assert!(
        cautious.required_monthly_contribution > median.required_monthly_contribution,
        "p90={} p50={}",
        cautious.required_monthly_contribution,
        median.required_monthly_contribution
    );
}

#[test]
fn test_achieved_probability_meets_target() {
    let out = solve_required_contribution(&solve_input(0.75)).unwrap().result;
    assert!(out.achieved_probability >= 0.75);
    assert_eq!(out.used_simulations, 2_000);
}

#[test]
fn test_result_agrees_with_simulator() {
    let input = solve_input(0.8);
    let solved = solve_required_contribution(&input).unwrap().result;

    let sim = run_wealth_simulation(&MonteCarloInput {
        initial_balance: input.initial_balance,
        monthly_contribution: solved.required_monthly_contribution,
        horizon_years: input.horizon_years,
        simulations: input.simulations,
        mean_annual_return_pct: input.mean_annual_return_pct,
        stdev_annual_return_pct: input.stdev_annual_return_pct,
        annual_inflation_pct: input.annual_inflation_pct,
        annual_fee_pct: input.annual_fee_pct,
        goal: Some(GoalCheck {
            target: input.target,
            year: input.horizon_years,
        }),
        seed: input.seed,
    })
    .unwrap()
    .result;

    let rate = sim.goal.unwrap().success_probability;
    // Same streams, so only paths sitting exactly on the target may differ.
    assert!(rate >= 0.8 - 1.0 / 2_000.0, "simulated rate {rate}");
}

#[test]
fn test_bisection_trace_narrows() {
    let out = solve_required_contribution(&solve_input(0.6)).unwrap().result;
    assert!(!out.iterations.is_empty());
    for pair in out.iterations.windows(2) {
        let width_before = pair[0].upper_bound - pair[0].lower_bound;
        let width_after = pair[1].upper_bound - pair[1].lower_bound;
        assert!(width_after < width_before);
    }
}

#[test]
fn test_initial_balance_already_sufficient() {
    let mut input = solve_input(0.9);
    input.initial_balance = 5_000_000.0;
    let out = solve_required_contribution(&input).unwrap().result;
    assert_eq!(out.required_monthly_contribution, 0.0);
}

#[test]
fn test_unreachable_goal_reports_bounds() {
    let mut input = solve_input(0.9);
    input.max_contribution = Some(10.0);
    match solve_required_contribution(&input) {
        Err(FinicoError::GoalUnreachableWithinBounds {
            target_probability,
            max_contribution,
            best_probability,
        }) => {
            assert_eq!(target_probability, 0.9);
            assert_eq!(max_contribution, 10.0);
            assert!(best_probability < 0.9);
        }
        other => panic!("expected unreachable goal, got {other:?}"),
    }
}

#[test]
fn test_horizon_beyond_limit_rejected() {
    let mut input = solve_input(0.5);
    input.horizon_years = MAX_HORIZON_YEARS + 1;
    let err = solve_required_contribution(&input).unwrap_err();
    assert!(err.to_string().contains("horizon_years"));

    input.horizon_years = u32::MAX;
    assert!(solve_required_contribution(&input).is_err());
}

#[test]
fn test_invalid_probability_rejected() {
    let err = solve_required_contribution(&solve_input(1.5)).unwrap_err();
    assert!(matches!(err, FinicoError::InvalidInput { .. }));
}

// ---------------------------------------------------------------------------
// Deterministic goal
// ---------------------------------------------------------------------------

#[test]
fn test_deterministic_goal_below_monte_carlo_p90() {
    // Without volatility the median-like answer needs less than a 90% guarantee.
    let deterministic = solve_deterministic_contribution(&DeterministicGoalInput {
        initial_balance: 20_000.0,
        target: 400_000.0,
        horizon_years: 20.0,
        annual_return_pct: 7.0,
        annual_inflation_pct: 2.5,
        annual_fee_pct: 0.25,
        contribution_escalation_pct: 0.0,
    })
    .unwrap()
    .result;
    let cautious = solve_required_contribution(&solve_input(0.9)).unwrap().result;
    assert!(
        deterministic.required_monthly_contribution < cautious.required_monthly_contribution
    );
}

#[test]
fn test_deterministic_goal_wire_aliases() {
    let input: DeterministicGoalInput = serde_json::from_value(serde_json::json!({
        "initial": 0.0,
        "target_amount": 12_000.0,
        "years": 10,
    }))
    .unwrap();
    let out = solve_deterministic_contribution(&input).unwrap().result;
    assert!((out.required_monthly_contribution - 100.0).abs() < 1e-9);
}
