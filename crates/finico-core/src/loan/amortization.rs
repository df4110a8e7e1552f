//! Level-payment loan amortization with optional extra principal.
//!
//! Two modes: solve the payment for a given term, or run a given payment
//! until the balance is retired. A payment that never covers interest is a
//! reported state, not an error.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinicoError;
use crate::time_value::annuity_payment;
use crate::types::{
    require_finite, require_non_negative, require_positive, with_metadata, ComputationOutput,
    Money, Percent,
};
use crate::FinicoResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Absolute ceiling on schedule length.
pub const MAX_PERIODS: u32 = 72_000;

/// A loan whose payment never covers interest is cut off after this many periods.
pub const NEGATIVE_AMORTIZATION_PERIODS: u32 = 600;

/// Balances within this amount of the principal portion are paid off outright.
const PAYOFF_THRESHOLD: Money = 0.01;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the schedule solves for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoanTerms {
    /// Level payment that retires the loan in `years`.
    SolvePayment { years: f64 },
    /// Run `desired_payment` until the loan is retired.
    SolveTerm {
        #[serde(alias = "desiredPayment")]
        desired_payment: Money,
    },
}

/// Input for a loan amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    #[serde(alias = "apr")]
    pub annual_rate_pct: Percent,
    #[serde(default = "default_periods_per_year", alias = "freq")]
    pub periods_per_year: u32,
    #[serde(default, alias = "extra")]
    pub extra_payment_per_period: Money,
    #[serde(flatten)]
    pub terms: LoanTerms,
}

fn default_periods_per_year() -> u32 {
    12
}

/// One period of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period_index: u32,
    /// Amount actually paid this period, extra included.
    pub payment: Money,
    pub interest_portion: Money,
    /// Negative when unpaid interest is capitalized.
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    /// Scheduled periodic payment including any extra.
    pub payment: Money,
    /// Scheduled periodic payment before extra.
    pub base_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub periods: u32,
    /// `None` when the loan is not retired within the schedule.
    pub years_to_payoff: Option<f64>,
    pub schedule: Vec<AmortizationRow>,
    pub never_amortizes: bool,
    pub hit_iteration_cap: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl LoanInput {
    fn validate(&self) -> FinicoResult<()> {
        require_positive("principal", self.principal)?;
        require_non_negative("annual_rate_pct", self.annual_rate_pct)?;
        require_non_negative("extra_payment_per_period", self.extra_payment_per_period)?;
        if self.periods_per_year == 0 {
            return Err(FinicoError::invalid("periods_per_year", "Must be at least 1"));
        }
        match self.terms {
            LoanTerms::SolvePayment { years } => require_positive("years", years),
            LoanTerms::SolveTerm { desired_payment } => {
                require_positive("desired_payment", desired_payment)
            }
        }
    }

    fn periodic_rate(&self) -> f64 {
        self.annual_rate_pct / 100.0 / f64::from(self.periods_per_year)
    }

    fn base_payment(&self) -> FinicoResult<Money> {
        match self.terms {
            LoanTerms::SolvePayment { years } => {
                let n = (years * f64::from(self.periods_per_year)).round().max(1.0);
                require_finite("years", n)?;
                if n > f64::from(MAX_PERIODS) {
                    return Err(FinicoError::invalid(
                        "years",
                        format!("Term exceeds {MAX_PERIODS} periods"),
                    ));
                }
                annuity_payment(self.principal, self.periodic_rate(), n as u32)
            }
            LoanTerms::SolveTerm { desired_payment } => Ok(desired_payment),
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Build a full amortization schedule.
pub fn amortize_loan(input: &LoanInput) -> FinicoResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;

    let r = input.periodic_rate();
    let base_payment = input.base_payment()?;
    let payment = base_payment + input.extra_payment_per_period;

    tracing::debug!(
        principal = input.principal,
        rate = r,
        payment,
        "amortizing loan"
    );

    let mut schedule: Vec<AmortizationRow> = Vec::new();
    let mut balance = input.principal;
    let mut never_amortizes = false;
    let mut period = 0_u32;

    while balance > 0.0 && period < MAX_PERIODS {
        let interest = r * balance;
        let mut principal_portion = payment - interest;

        if principal_portion <= 0.0 && r > 0.0 {
            if !never_amortizes {
                tracing::warn!(payment, interest, "payment does not cover interest");
            }
            never_amortizes = true;
            if period >= NEGATIVE_AMORTIZATION_PERIODS {
                break;
            }
        } else if balance - principal_portion <= PAYOFF_THRESHOLD {
            principal_portion = balance;
        }

        period += 1;
        balance = (balance - principal_portion).max(0.0);
        schedule.push(AmortizationRow {
            period_index: period,
            payment: interest + principal_portion,
            interest_portion: interest,
            principal_portion,
            remaining_balance: balance,
        });
    }

    let retired = balance == 0.0;
    let hit_iteration_cap = !retired && !never_amortizes && period >= MAX_PERIODS;

    if never_amortizes {
        warnings.push(format!(
            "Payment {payment:.2} does not cover periodic interest; schedule stopped after \
             {period} periods with unpaid interest capitalized"
        ));
    }
    if hit_iteration_cap {
        warnings.push(format!(
            "Schedule reached the {MAX_PERIODS}-period cap with balance {balance:.2} outstanding"
        ));
    }

    let total_interest: Money = schedule.iter().map(|row| row.interest_portion).sum();
    let total_paid: Money = schedule.iter().map(|row| row.payment).sum();
    let years_to_payoff = retired.then(|| f64::from(period) / f64::from(input.periods_per_year));

    let output = LoanOutput {
        payment,
        base_payment,
        total_interest,
        total_paid,
        periods: period,
        years_to_payoff,
        schedule,
        never_amortizes,
        hit_iteration_cap,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Loan Amortization",
        &serde_json::json!({
            "terms": input.terms,
            "periodic_rate": r,
            "periods_per_year": input.periods_per_year,
            "extra_payment_per_period": input.extra_payment_per_period,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
