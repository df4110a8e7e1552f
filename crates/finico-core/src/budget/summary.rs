use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{
    require_finite, require_non_negative, with_metadata, ComputationOutput, Money, Percent,
};
use crate::FinicoResult;

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// Monthly income against three expense buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub fixed_expenses: Vec<Money>,
    #[serde(default)]
    pub variable_expenses: Vec<Money>,
    #[serde(default)]
    pub other_expenses: Vec<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetOutput {
    pub monthly_income: Money,
    pub fixed_total: Money,
    pub variable_total: Money,
    pub other_total: Money,
    pub total_expenses: Money,
    pub savings: Money,
    /// Savings as a share of income, rounded to two decimals; 0 without income.
    pub savings_rate_pct: Percent,
}

fn bucket_total(field: &str, items: &[Money]) -> FinicoResult<Money> {
    for amount in items {
        require_non_negative(field, *amount)?;
    }
    Ok(items.iter().sum())
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn summarize_budget(input: &BudgetInput) -> FinicoResult<ComputationOutput<BudgetOutput>> {
    let start = Instant::now();

    require_finite("monthly_income", input.monthly_income)?;
    let fixed_total = bucket_total("fixed_expenses", &input.fixed_expenses)?;
    let variable_total = bucket_total("variable_expenses", &input.variable_expenses)?;
    let other_total = bucket_total("other_expenses", &input.other_expenses)?;

    let total_expenses = fixed_total + variable_total + other_total;
    let savings = input.monthly_income - total_expenses;
    let savings_rate_pct = if input.monthly_income > 0.0 {
        round_2dp(savings / input.monthly_income * 100.0)
    } else {
        0.0
    };

    let output = BudgetOutput {
        monthly_income: input.monthly_income,
        fixed_total,
        variable_total,
        other_total,
        total_expenses,
        savings,
        savings_rate_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly Budget Summary",
        &serde_json::json!({
            "line_items": input.fixed_expenses.len()
                + input.variable_expenses.len()
                + input.other_expenses.len(),
            "savings_rate_rounding": "2dp",
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Net worth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    Asset,
    Liability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceItem {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "type")]
    pub kind: BalanceKind,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetWorthInput {
    #[serde(alias = "rows")]
    pub items: Vec<BalanceItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetWorthOutput {
    pub assets: Money,
    pub liabilities: Money,
    pub net: Money,
    /// Assets over assets plus liabilities; 0 when both are zero.
    pub asset_share: f64,
}

pub fn net_worth(input: &NetWorthInput) -> FinicoResult<ComputationOutput<NetWorthOutput>> {
    let start = Instant::now();

    let mut assets = 0.0_f64;
    let mut liabilities = 0.0_f64;
    for item in &input.items {
        require_non_negative("amount", item.amount)?;
        match item.kind {
            BalanceKind::Asset => assets += item.amount,
            BalanceKind::Liability => liabilities += item.amount,
        }
    }

    let gross = assets + liabilities;
    let output = NetWorthOutput {
        assets,
        liabilities,
        net: assets - liabilities,
        asset_share: if gross > 0.0 { assets / gross } else { 0.0 },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net Worth Totals",
        &serde_json::json!({ "items": input.items.len() }),
        Vec::new(),
        elapsed,
        output,
    ))
}
